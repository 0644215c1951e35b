use crate::error::{RfmError, RfmResult};
use serde::{Deserialize, Serialize};

// ── Column aliases ─────────────────────────────────────────────────

/// Ordered alias lists for each canonical field.
/// The first alias present in a row with a non-empty value wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnAliases {
    pub client: Vec<String>,
    pub date:   Vec<String>,
    pub amount: Vec<String>,
    pub tags:   Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            client: vec![
                "Client (Display Name)".into(),
                "Client".into(),
                "Display Name".into(),
            ],
            date: vec![
                "Issue Date (full)".into(),
                "Date".into(),
                "Issue Date".into(),
            ],
            amount: vec![
                "Invoice Total".into(),
                "Total".into(),
                "Amount".into(),
            ],
            tags: vec!["Tags".into()],
        }
    }
}

// ── Run parameters ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisDefaults {
    pub lookback_months: u32,
    pub segments:        Vec<String>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            lookback_months: 12,
            segments:        Vec::new(),
        }
    }
}

/// Per-run parameters. Together with the input rows these fully
/// determine a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisParams {
    pub lookback_months: u32,
    pub segments:        Vec<String>,
}

impl AnalysisParams {
    pub fn new(lookback_months: u32, segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lookback_months,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Reject parameters before any row is looked at.
    pub fn validate(&self) -> RfmResult<()> {
        if self.lookback_months == 0 {
            return Err(RfmError::ParameterValidation {
                reason: "lookback window must be at least one month".into(),
            });
        }
        if self.segments.is_empty() {
            return Err(RfmError::ParameterValidation {
                reason: "at least one segment tag must be selected".into(),
            });
        }
        if self.segments.iter().any(|s| s.is_empty()) {
            return Err(RfmError::ParameterValidation {
                reason: "segment tags must not be empty strings".into(),
            });
        }
        Ok(())
    }

    /// Stable key used to version stored reports per parameter set.
    pub fn storage_key(&self) -> String {
        let mut segments = self.segments.clone();
        segments.sort();
        segments.dedup();
        format!("{}m|{}", self.lookback_months, segments.join(","))
    }
}

// ── Scoring ────────────────────────────────────────────────────────

/// How a value's rank is taken when it is tied with other values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieMethod {
    /// Rank = first position of the value in the ascending population.
    /// Reproduces historical reports exactly.
    FirstOccurrence,
    /// Rank = number of cohort members the value beats or ties on the
    /// axis' own notion of "better". A sole member ranks at the top.
    ///
    /// Lower-is-better ranks are counted from the best end instead of
    /// mirroring the ascending rank. Because bucket bounds are inclusive
    /// this is not symmetric, so recency scores differ from
    /// `FirstOccurrence` even without ties whenever the cohort size is
    /// not a multiple of 5. Higher-is-better axes differ only on ties.
    #[default]
    Inclusive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub tie_method: TieMethod,
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RfmConfig {
    #[serde(default)]
    pub columns:  ColumnAliases,
    #[serde(default)]
    pub defaults: AnalysisDefaults,
    #[serde(default)]
    pub scoring:  ScoringConfig,
}

impl RfmConfig {
    /// Load config from `<data_dir>/rfm/analysis_config.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/rfm/analysis_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RfmConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!(
            "loaded config from {path}: tie_method={:?}, default lookback={}m",
            config.scoring.tie_method,
            config.defaults.lookback_months
        );
        Ok(config)
    }

    /// Parameters for a run, falling back to the configured defaults.
    pub fn params_or_defaults(
        &self,
        lookback_months: Option<u32>,
        segments: Vec<String>,
    ) -> AnalysisParams {
        AnalysisParams {
            lookback_months: lookback_months.unwrap_or(self.defaults.lookback_months),
            segments: if segments.is_empty() {
                self.defaults.segments.clone()
            } else {
                segments
            },
        }
    }
}
