//! Snapshot serialization — a finished report plus the parameters that
//! produced it, as one JSON blob.

use crate::{config::AnalysisParams, engine::RfmReport, types::AnalysisId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Bumped whenever the serialized report layout changes.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSnapshot {
    pub analysis_id:  AnalysisId,
    pub version:      u32,
    pub format:       u32,
    pub params:       AnalysisParams,
    pub generated_at: NaiveDateTime,
    pub report:       RfmReport,
}

/// Fresh identifier for callers that do not bring their own.
pub fn new_analysis_id() -> AnalysisId {
    uuid::Uuid::new_v4().to_string()
}
