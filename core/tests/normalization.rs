//! Row normalization, filtering and the input-level failure modes.

use chrono::{NaiveDate, NaiveDateTime};
use rfm_core::{
    engine::RfmEngine,
    rejection::DropReason,
    table::TabularRow,
    AnalysisParams, RfmError,
};
use serde_json::json;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

fn engine() -> RfmEngine {
    RfmEngine::at(now())
}

fn rows(value: serde_json::Value) -> Vec<TabularRow> {
    serde_json::from_value(value).expect("rows")
}

fn retail(months: u32) -> AnalysisParams {
    AnalysisParams::new(months, ["Retail"])
}

// ── Failure modes ────────────────────────────────────────────────────────────

#[test]
fn empty_input_fails_with_empty_input_error() {
    let err = engine().analyze(&[], &retail(12)).unwrap_err();
    assert!(matches!(err, RfmError::EmptyInput), "got {err:?}");
    assert!(err.is_user_error());
}

#[test]
fn rows_that_all_miss_the_segment_fail_with_no_matching_records() {
    let input: Vec<TabularRow> = (0..10)
        .map(|i| {
            serde_json::from_value(json!({
                "Client": format!("Client {i}"),
                "Date": "2025-06-01",
                "Total": 100,
                "Tags": "Other",
            }))
            .unwrap()
        })
        .collect();

    let err = engine().analyze(&input, &retail(12)).unwrap_err();
    assert!(
        matches!(err, RfmError::NoMatchingRecords { rows_total: 10 }),
        "got {err:?}"
    );
}

#[test]
fn parameters_are_validated_before_rows() {
    // Empty rows would be EmptyInput; bad parameters must win.
    let no_segments = AnalysisParams::new(12, Vec::<String>::new());
    let err = engine().analyze(&[], &no_segments).unwrap_err();
    assert!(matches!(err, RfmError::ParameterValidation { .. }), "got {err:?}");

    let zero_months = AnalysisParams::new(0, ["Retail"]);
    let err = engine().analyze(&[], &zero_months).unwrap_err();
    assert!(matches!(err, RfmError::ParameterValidation { .. }), "got {err:?}");

    // An empty tag would match every row.
    let blank_segment = AnalysisParams::new(12, [""]);
    let err = engine().analyze(&[], &blank_segment).unwrap_err();
    assert!(matches!(err, RfmError::ParameterValidation { .. }), "got {err:?}");
}

// ── Column aliases ───────────────────────────────────────────────────────────

#[test]
fn every_alias_resolves_to_the_same_fields() {
    let input = rows(json!([
        { "Client (Display Name)": "A", "Issue Date (full)": "2025-06-01", "Invoice Total": 10, "Tags": "Retail" },
        { "Client": "B",                "Date": "2025-06-01",              "Total": 20,         "Tags": "Retail" },
        { "Display Name": "C",          "Issue Date": "2025-06-01",        "Amount": 30,        "Tags": "Retail" },
    ]));

    let report = engine().analyze(&input, &retail(12)).unwrap();
    let totals: Vec<(&str, f64)> = report
        .clients
        .iter()
        .map(|c| (c.raw.client_id.as_str(), c.raw.total_amount))
        .collect();
    assert_eq!(totals, vec![("A", 10.0), ("B", 20.0), ("C", 30.0)]);
}

#[test]
fn first_non_blank_alias_wins() {
    let input = rows(json!([
        { "Client (Display Name)": "  ", "Client": "Fallback", "Date": "2025-06-01", "Tags": "Retail" },
        { "Client (Display Name)": "Primary", "Client": "Ignored", "Date": "2025-06-01", "Tags": "Retail" },
    ]));

    let report = engine().analyze(&input, &retail(12)).unwrap();
    let ids: Vec<&str> = report.clients.iter().map(|c| c.raw.client_id.as_str()).collect();
    assert_eq!(ids, vec!["Fallback", "Primary"]);
}

#[test]
fn missing_amount_defaults_to_zero() {
    let input = rows(json!([
        { "Client": "NoAmount", "Date": "2025-06-01", "Tags": "Retail" },
    ]));

    let report = engine().analyze(&input, &retail(12)).unwrap();
    assert_eq!(report.clients[0].raw.total_amount, 0.0);
    assert_eq!(report.clients[0].raw.transaction_count, 1);
}

#[test]
fn serial_and_text_dates_agree() {
    // 45809 = 2025-06-01
    let input = rows(json!([
        { "Client": "Serial", "Date": 45809,        "Total": 5, "Tags": "Retail" },
        { "Client": "Text",   "Date": "2025-06-01", "Total": 5, "Tags": "Retail" },
    ]));

    let report = engine().analyze(&input, &retail(12)).unwrap();
    assert_eq!(report.clients[0].raw.last_activity, report.clients[1].raw.last_activity);
}

// ── Dropped rows ─────────────────────────────────────────────────────────────

#[test]
fn defective_rows_are_dropped_and_logged_not_raised() {
    let input = rows(json!([
        { "Client": "Good",  "Date": "2025-06-01", "Total": 10,      "Tags": "Retail" },
        {                    "Date": "2025-06-01", "Total": 10,      "Tags": "Retail" },
        { "Client": "Bad1",  "Date": "someday",    "Total": 10,      "Tags": "Retail" },
        { "Client": "Bad2",  "Date": "2025-06-01", "Total": "ten",   "Tags": "Retail" },
        { "Client": "Bad3",  "Date": "2025-06-01", "Total": -5,      "Tags": "Retail" },
        { "Client": "Bad4",  "Date": "2025-06-01", "Total": 10,      "Tags": "Wholesale" },
        { "Client": "Bad5",  "Date": "2023-01-01", "Total": 10,      "Tags": "Retail" },
    ]));

    let report = engine().analyze(&input, &retail(12)).unwrap();
    assert_eq!(report.clients.len(), 1);
    assert_eq!(report.ingest.rows_total, 7);
    assert_eq!(report.ingest.rows_retained, 1);

    let kinds: Vec<(usize, &str)> = report
        .ingest
        .rejections
        .iter()
        .map(|r| (r.row_index, r.reason.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (1, "missing_client"),
            (2, "invalid_date"),
            (3, "invalid_amount"),
            (4, "negative_amount"),
            (5, "segment_mismatch"),
            (6, "outside_lookback"),
        ]
    );
    assert_eq!(
        report.ingest.rejections[1].reason,
        DropReason::InvalidDate { raw: "someday".into() }
    );
}

#[test]
fn segment_match_is_case_sensitive_substring() {
    let input = rows(json!([
        { "Client": "Sub",   "Date": "2025-06-01", "Tags": "VIP, Retail-EU" },
        { "Client": "Lower", "Date": "2025-06-01", "Tags": "retail" },
    ]));

    let report = engine().analyze(&input, &retail(12)).unwrap();
    let ids: Vec<&str> = report.clients.iter().map(|c| c.raw.client_id.as_str()).collect();
    assert_eq!(ids, vec!["Sub"]);
}

#[test]
fn any_selected_segment_is_enough() {
    let input = rows(json!([
        { "Client": "R", "Date": "2025-06-01", "Tags": "Retail" },
        { "Client": "W", "Date": "2025-06-01", "Tags": "Wholesale" },
        { "Client": "O", "Date": "2025-06-01", "Tags": "Online" },
    ]));

    let params = AnalysisParams::new(12, ["Retail", "Wholesale"]);
    let report = engine().analyze(&input, &params).unwrap();
    assert_eq!(report.clients.len(), 2);
}

#[test]
fn lookback_cutoff_is_calendar_months_before_now() {
    // now = 2025-06-30 12:00, one month back = 2025-05-30 12:00
    let input = rows(json!([
        { "Client": "Before", "Date": "2025-05-30",          "Tags": "Retail" },
        { "Client": "After",  "Date": "2025-05-30T12:00:00", "Tags": "Retail" },
        { "Client": "Later",  "Date": "2025-05-31",          "Tags": "Retail" },
    ]));

    let report = engine().analyze(&input, &retail(1)).unwrap();
    let ids: Vec<&str> = report.clients.iter().map(|c| c.raw.client_id.as_str()).collect();
    assert_eq!(ids, vec!["After", "Later"]);
    assert_eq!(
        report.ingest.cutoff,
        NaiveDate::from_ymd_opt(2025, 5, 30).unwrap().and_hms_opt(12, 0, 0).unwrap()
    );
}
