//! Rejection log — why an input row did not make it into the analysis.
//!
//! RULE: Row-level defects never raise. They are recorded here and the
//! row is skipped.

use crate::types::RowIndex;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Every reason a row can be dropped.
/// Variants are evaluated in this order by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropReason {
    MissingClient,
    InvalidDate {
        raw: String,
    },
    InvalidAmount {
        raw: String,
    },
    NegativeAmount {
        amount: f64,
    },
    SegmentMismatch {
        tags: String,
    },
    OutsideLookback {
        occurred_at: NaiveDateTime,
    },
}

impl DropReason {
    /// Stable short name, used for log lines and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingClient          => "missing_client",
            Self::InvalidDate { .. }     => "invalid_date",
            Self::InvalidAmount { .. }   => "invalid_amount",
            Self::NegativeAmount { .. }  => "negative_amount",
            Self::SegmentMismatch { .. } => "segment_mismatch",
            Self::OutsideLookback { .. } => "outside_lookback",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowRejection {
    pub row_index: RowIndex,
    pub reason:    DropReason,
}

/// Count rejections per reason kind, in first-seen order.
pub fn tally(rejections: &[RowRejection]) -> Vec<(&'static str, usize)> {
    let mut out: Vec<(&'static str, usize)> = Vec::new();
    for r in rejections {
        let kind = r.reason.kind();
        match out.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => out.push((kind, 1)),
        }
    }
    out
}
