//! Shared primitive types used across the entire engine.

/// A client identity as it appears in the source data (display name).
pub type ClientId = String;

/// A stable identifier under which report snapshots are stored.
pub type AnalysisId = String;

/// Index of a row in the caller-supplied input, zero-based.
pub type RowIndex = usize;

/// A 1–5 quintile score on a single axis.
pub type Score = u8;
