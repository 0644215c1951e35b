//! Row normalizer — raw tabular rows to clean transaction records.
//!
//! Per row, in order:
//!   1. Resolve the client from its alias columns     (drop if missing)
//!   2. Resolve and parse the date                    (drop if unparseable)
//!   3. Resolve and coerce the amount, default 0      (drop if not numeric / negative)
//!   4. Match the tag text against the segment tags   (drop if no match)
//!   5. Compare the date against the lookback cutoff  (drop if older)
//!
//! Dropped rows are logged as rejections, never raised.

use crate::{
    config::{AnalysisParams, ColumnAliases},
    error::{RfmError, RfmResult},
    rejection::{DropReason, RowRejection},
    table::{first_present, CellValue, TabularRow},
    types::ClientId,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Day zero of spreadsheet serial dates.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial values beyond this many days are treated as garbage, not dates.
const MAX_SERIAL_DAYS: f64 = 2_958_465.0; // 9999-12-31

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub client_id:   ClientId,
    pub occurred_at: NaiveDateTime,
    pub amount:      f64,
    pub tags:        BTreeSet<String>,
}

/// Output of a normalization pass.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub transactions: Vec<Transaction>,
    pub rejections:   Vec<RowRejection>,
    pub rows_total:   usize,
    pub cutoff:       NaiveDateTime,
}

/// Normalize and filter `rows`.
///
/// `params` must already be validated. Fails with `EmptyInput` when
/// `rows` is empty and with `NoMatchingRecords` when rows existed but
/// none survived.
pub fn normalize_rows(
    rows: &[TabularRow],
    aliases: &ColumnAliases,
    params: &AnalysisParams,
    cutoff: NaiveDateTime,
) -> RfmResult<NormalizedBatch> {
    if rows.is_empty() {
        return Err(RfmError::EmptyInput);
    }

    let mut transactions = Vec::with_capacity(rows.len());
    let mut rejections = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        match normalize_row(row, aliases, &params.segments, cutoff) {
            Ok(txn) => transactions.push(txn),
            Err(reason) => rejections.push(RowRejection { row_index, reason }),
        }
    }

    log::debug!(
        "normalizer: {} rows in, {} retained, {} dropped (cutoff {cutoff})",
        rows.len(),
        transactions.len(),
        rejections.len()
    );

    if transactions.is_empty() {
        return Err(RfmError::NoMatchingRecords { rows_total: rows.len() });
    }

    Ok(NormalizedBatch {
        transactions,
        rejections,
        rows_total: rows.len(),
        cutoff,
    })
}

/// Normalize a single row, or say why it was dropped.
pub fn normalize_row(
    row: &TabularRow,
    aliases: &ColumnAliases,
    segments: &[String],
    cutoff: NaiveDateTime,
) -> Result<Transaction, DropReason> {
    let client_id = first_present(row, &aliases.client)
        .and_then(parse_client)
        .ok_or(DropReason::MissingClient)?;

    let date_cell = first_present(row, &aliases.date);
    let occurred_at = date_cell
        .and_then(parse_date)
        .ok_or_else(|| DropReason::InvalidDate {
            raw: date_cell.map(CellValue::render).unwrap_or_default(),
        })?;

    let amount = match first_present(row, &aliases.amount) {
        None => 0.0,
        Some(cell) => parse_amount(cell).ok_or_else(|| DropReason::InvalidAmount {
            raw: cell.render(),
        })?,
    };
    if amount < 0.0 {
        return Err(DropReason::NegativeAmount { amount });
    }

    let tag_text = first_present(row, &aliases.tags)
        .map(CellValue::render)
        .unwrap_or_default();
    if !matches_segment(&tag_text, segments) {
        return Err(DropReason::SegmentMismatch { tags: tag_text });
    }

    if occurred_at < cutoff {
        return Err(DropReason::OutsideLookback { occurred_at });
    }

    Ok(Transaction {
        client_id,
        occurred_at,
        amount,
        tags: split_tags(&tag_text),
    })
}

/// Case-sensitive substring match of the free tag text against any segment.
pub fn matches_segment(tag_text: &str, segments: &[String]) -> bool {
    segments.iter().any(|s| tag_text.contains(s.as_str()))
}

fn split_tags(tag_text: &str) -> BTreeSet<String> {
    tag_text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_client(cell: &CellValue) -> Option<ClientId> {
    match cell {
        CellValue::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        // Numeric account codes: 1042 rather than "1042.0"
        CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
            Some(format!("{}", *n as i64))
        }
        CellValue::Number(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a date cell. Numbers are spreadsheet day serials relative to
/// 1899-12-30; text is tried against ISO-8601 and common layouts.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Number(serial) => from_serial(*serial),
        CellValue::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Coerce an amount cell to a finite number.
pub fn parse_amount(cell: &CellValue) -> Option<f64> {
    let n = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn serial_dates_count_from_1899_12_30() {
        assert_eq!(from_serial(0.0), Some(ymd(1899, 12, 30)));
        assert_eq!(from_serial(1.0), Some(ymd(1899, 12, 31)));
        assert_eq!(from_serial(45292.0), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn fractional_serial_carries_time_of_day() {
        let dt = from_serial(45292.5).unwrap();
        assert_eq!(dt, ymd(2024, 1, 1) + TimeDelta::try_hours(12).unwrap());
    }

    #[test]
    fn absurd_serials_are_rejected() {
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(1e12), None);
    }

    #[test]
    fn text_dates_accept_common_layouts() {
        let expected = ymd(2024, 3, 15);
        for s in ["2024-03-15", "2024/03/15", "03/15/2024", "15 Mar 2024", "Mar 15, 2024"] {
            assert_eq!(parse_date_text(s), Some(expected), "layout {s}");
        }
        assert_eq!(
            parse_date_text("2024-03-15T10:30:00Z"),
            Some(expected + TimeDelta::try_minutes(630).unwrap())
        );
        assert_eq!(parse_date_text("not a date"), None);
        assert_eq!(parse_date_text("45000"), None);
    }

    #[test]
    fn amounts_coerce_like_numbers() {
        assert_eq!(parse_amount(&CellValue::Number(12.5)), Some(12.5));
        assert_eq!(parse_amount(&CellValue::Text(" 99.90 ".into())), Some(99.9));
        assert_eq!(parse_amount(&CellValue::Text("1,000".into())), None);
        assert_eq!(parse_amount(&CellValue::Text("NaN".into())), None);
        assert_eq!(parse_amount(&CellValue::Bool(true)), None);
    }

    #[test]
    fn numeric_client_ids_render_without_fraction() {
        assert_eq!(parse_client(&CellValue::Number(1042.0)), Some("1042".into()));
        assert_eq!(parse_client(&CellValue::Text("  Acme  ".into())), Some("Acme".into()));
        assert_eq!(parse_client(&CellValue::Bool(false)), None);
    }

    #[test]
    fn tags_split_on_commas() {
        let tags = split_tags("Retail, VIP,,Wholesale ");
        assert_eq!(tags.len(), 3);
        assert!(tags.contains("VIP"));
    }
}
