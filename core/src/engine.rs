//! The RFM engine — one pure pass from raw rows to a segmentation report.
//!
//! EXECUTION ORDER (fixed, strictly forward):
//!   1. Parameter validation
//!   2. Row normalizer      (rows → transactions)
//!   3. Client aggregator   (transactions → per-client raw values)
//!   4. Quintile scorer     (raw values → R, F, M, FM scores)
//!   5. Classifier          (R, FM → category)
//!   6. Aggregate builder   (scored clients → heatmap, category counts)
//!
//! RULES:
//!   - No state survives between calls; identical inputs give identical reports.
//!   - Row-level defects are logged as rejections, never raised.
//!   - The only time source is the AnalysisClock.

use crate::{
    aggregates::{build_category_counts, build_heatmap, CategoryCount, ClientScored, HeatmapCell},
    aggregator::{aggregate_clients, ClientRaw},
    classifier::classify,
    clock::AnalysisClock,
    config::{AnalysisParams, RfmConfig, TieMethod},
    error::{RfmError, RfmResult},
    normalizer::normalize_rows,
    rejection::{tally, RowRejection},
    scorer::{fm_score, score_population, Direction},
    table::TabularRow,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What happened to the input rows on the way in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestSummary {
    pub rows_total:     usize,
    pub rows_retained:  usize,
    pub cutoff:         NaiveDateTime,
    pub reference_date: NaiveDateTime,
    #[serde(default)]
    pub rejections:     Vec<RowRejection>,
}

/// The complete result of a run. Plain data only, safe to serialize,
/// export or store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RfmReport {
    pub clients:         Vec<ClientScored>,
    pub category_counts: Vec<CategoryCount>,
    pub heatmap:         Vec<HeatmapCell>,
    pub ingest:          IngestSummary,
}

pub struct RfmEngine {
    pub config: RfmConfig,
    pub clock:  AnalysisClock,
}

impl RfmEngine {
    pub fn new(config: RfmConfig, clock: AnalysisClock) -> Self {
        Self { config, clock }
    }

    /// Build an engine from the config under `data_dir`, on the system clock.
    pub fn build(data_dir: &str) -> RfmResult<Self> {
        let config = RfmConfig::load(data_dir)?;
        Ok(Self::new(config, AnalysisClock::System))
    }

    /// Built-in defaults pinned to a fixed "now". Used by tests and replays.
    pub fn at(now: NaiveDateTime) -> Self {
        Self::new(RfmConfig::default(), AnalysisClock::Fixed(now))
    }

    pub fn with_tie_method(mut self, tie_method: TieMethod) -> Self {
        self.config.scoring.tie_method = tie_method;
        self
    }

    /// Run the full pipeline over `rows`.
    pub fn analyze(&self, rows: &[TabularRow], params: &AnalysisParams) -> RfmResult<RfmReport> {
        let result = self.run(rows, params);
        if let Err(e) = &result {
            if e.is_user_error() {
                log::warn!("analysis rejected: {e}");
            }
        }
        result
    }

    fn run(&self, rows: &[TabularRow], params: &AnalysisParams) -> RfmResult<RfmReport> {
        params.validate()?;

        let cutoff = self.clock.cutoff(params.lookback_months);
        let batch = normalize_rows(rows, &self.config.columns, params, cutoff)?;

        let aggregation = aggregate_clients(&batch.transactions).ok_or(
            RfmError::NoMatchingRecords { rows_total: batch.rows_total },
        )?;

        let clients = score_clients(aggregation.clients, self.config.scoring.tie_method);
        let heatmap = build_heatmap(&clients);
        let category_counts = build_category_counts(&clients);

        log::info!(
            "rfm: {} rows, {} retained, {} clients scored (lookback {}m, {} segments)",
            batch.rows_total,
            batch.transactions.len(),
            clients.len(),
            params.lookback_months,
            params.segments.len()
        );
        for (kind, n) in tally(&batch.rejections) {
            log::debug!("rfm: dropped {n} rows ({kind})");
        }

        Ok(RfmReport {
            clients,
            category_counts,
            heatmap,
            ingest: IngestSummary {
                rows_total:     batch.rows_total,
                rows_retained:  batch.transactions.len(),
                cutoff,
                reference_date: aggregation.reference_date,
                rejections:     batch.rejections,
            },
        })
    }
}

/// Score each axis against the cohort, then classify.
/// Output keeps the input (first-seen) order.
pub fn score_clients(raws: Vec<ClientRaw>, tie_method: TieMethod) -> Vec<ClientScored> {
    let recency: Vec<f64> = raws.iter().map(|c| c.recency_days as f64).collect();
    let frequency: Vec<f64> = raws.iter().map(|c| c.transaction_count as f64).collect();
    let monetary: Vec<f64> = raws.iter().map(|c| c.total_amount).collect();

    let r_scores = score_population(&recency, Direction::LowerIsBetter, tie_method);
    let f_scores = score_population(&frequency, Direction::HigherIsBetter, tie_method);
    let m_scores = score_population(&monetary, Direction::HigherIsBetter, tie_method);

    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let (score_r, score_f, score_m) = (r_scores[i], f_scores[i], m_scores[i]);
            let score_fm = fm_score(score_f, score_m);
            ClientScored {
                raw,
                score_r,
                score_f,
                score_m,
                score_fm,
                category: classify(score_r, score_fm),
            }
        })
        .collect()
}
