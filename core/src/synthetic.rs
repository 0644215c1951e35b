//! Synthetic cohort generation — realistic invoice rows for demos and
//! property tests.
//!
//! All generation is deterministic (same seed = same rows). Rows mix the
//! accepted column aliases, string and serial-number dates, and numeric
//! and text amounts the way real spreadsheet exports do.

use crate::{
    rng::{SeededRng, Stream},
    table::{CellValue, TabularRow},
};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Emma", "Noah", "Ava", "Mateo", "Sofia", "Lucas", "Mia", "Ethan",
    "Amara", "Kenji", "Priya", "Diego", "Leila", "Tomas", "Ines", "Yusuf", "Hana", "Felix",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Garcia", "Nguyen", "Patel", "Kim", "Okafor", "Rossi", "Novak", "Silva", "Cohen",
    "Murphy", "Tanaka", "Haddad", "Larsen", "Moreau", "Kowalski", "Reyes", "Chen", "Adams", "Ortiz",
];

const BUSINESS_WORDS: &[&str] = &[
    "Northwind", "Bluebird", "Summit", "Harbor", "Granite", "Copper", "Evergreen", "Beacon",
];

const BUSINESS_SUFFIXES: &[&str] = &["Trading", "Supplies", "Studio", "Holdings", "Foods", "Works"];

/// Spreadsheet serial of 1899-12-30.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct SyntheticCohort {
    pub clients:  usize,
    /// How far back activity spreads from `anchor`.
    pub months:   u32,
    pub seed:     u64,
    /// Segment tags to sprinkle over rows. Some rows get "Other" instead.
    pub segments: Vec<String>,
    /// Share of rows deliberately made defective (bad date, bad amount,
    /// missing client).
    pub defect_rate: f64,
    pub anchor:   NaiveDateTime,
}

impl SyntheticCohort {
    pub fn new(clients: usize, seed: u64, anchor: NaiveDateTime) -> Self {
        Self {
            clients,
            months: 18,
            seed,
            segments: vec!["Retail".into(), "Wholesale".into()],
            defect_rate: 0.0,
            anchor,
        }
    }

    pub fn with_segments(mut self, segments: Vec<String>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_defect_rate(mut self, rate: f64) -> Self {
        self.defect_rate = rate;
        self
    }

    pub fn generate(&self) -> Vec<TabularRow> {
        let mut names = Stream::Clients.rng(self.seed);
        let mut activity = Stream::Activity.rng(self.seed);
        let mut amounts = Stream::Amounts.rng(self.seed);
        let mut tags = Stream::Tags.rng(self.seed);

        let span_days = (self.months as u64 * 30).max(1);
        let mut rows = Vec::new();

        for i in 0..self.clients {
            let name = client_name(&mut names, i);
            let txn_count = activity.pareto(1.0, 1.3).min(40.0) as usize;
            let ticket = amounts.pareto(40.0, 2.0).min(25_000.0);
            // Most recent purchase, then earlier ones spread behind it.
            let last_seen = activity.next_u64_below(span_days);
            let segment = if self.segments.is_empty() || tags.chance(0.1) {
                "Other".to_string()
            } else {
                tags.pick(&self.segments).clone()
            };

            for k in 0..txn_count.max(1) {
                let days_ago = if k == 0 {
                    last_seen
                } else {
                    last_seen + activity.next_u64_below(span_days)
                };
                let when = self.anchor - TimeDelta::days(days_ago as i64);
                let amount = (ticket * (0.5 + amounts.next_f64())).round();
                rows.push(self.row(&name, when, amount, &segment, &mut activity));
            }
        }
        rows
    }

    fn row(
        &self,
        name: &str,
        when: NaiveDateTime,
        amount: f64,
        segment: &str,
        rng: &mut SeededRng,
    ) -> TabularRow {
        let mut row = TabularRow::new();

        let client_col = *rng.pick(&["Client (Display Name)", "Client", "Display Name"]);
        let date_col = *rng.pick(&["Issue Date (full)", "Date", "Issue Date"]);
        let amount_col = *rng.pick(&["Invoice Total", "Total", "Amount"]);

        row.insert(client_col.into(), CellValue::Text(name.to_string()));

        let date = if rng.chance(0.5) {
            let serial = (when - serial_epoch()).num_days() as f64;
            CellValue::Number(serial)
        } else {
            CellValue::Text(when.format("%Y-%m-%d").to_string())
        };
        row.insert(date_col.into(), date);

        let amount_cell = if rng.chance(0.3) {
            CellValue::Text(format!("{amount:.2}"))
        } else {
            CellValue::Number(amount)
        };
        row.insert(amount_col.into(), amount_cell);
        row.insert("Tags".into(), CellValue::Text(format!("{segment}, invoice")));

        if rng.chance(self.defect_rate) {
            match rng.next_u64_below(3) {
                0 => { row.insert(date_col.into(), CellValue::Text("pending".into())); }
                1 => { row.insert(amount_col.into(), CellValue::Text("n/a".into())); }
                _ => { row.remove(client_col); }
            }
        }
        row
    }
}

/// Personal or business display name. The index suffix keeps names unique.
fn client_name(rng: &mut SeededRng, index: usize) -> String {
    if rng.chance(0.35) {
        format!(
            "{} {} #{index}",
            rng.pick(BUSINESS_WORDS),
            rng.pick(BUSINESS_SUFFIXES)
        )
    } else {
        format!("{} {} #{index}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn same_seed_same_rows() {
        let a = SyntheticCohort::new(25, 42, anchor()).generate();
        let b = SyntheticCohort::new(25, 42, anchor()).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn every_client_gets_at_least_one_row() {
        let rows = SyntheticCohort::new(30, 9, anchor()).generate();
        assert!(rows.len() >= 30, "got {} rows", rows.len());
    }

    #[test]
    fn rows_carry_a_tags_column() {
        let rows = SyntheticCohort::new(10, 3, anchor()).generate();
        assert!(rows.iter().all(|r| r.contains_key("Tags")));
    }
}
