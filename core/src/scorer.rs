//! Quintile scorer — rank a population and bucket it into scores 1–5.
//!
//! Scores are relative to the whole current cohort. The same raw value
//! can score differently in a different cohort.

use crate::{config::TieMethod, types::Score};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Smaller raw values earn higher scores (recency).
    LowerIsBetter,
    /// Larger raw values earn higher scores (frequency, monetary).
    HigherIsBetter,
}

/// A sorted snapshot of one axis' population.
pub struct QuintileScorer {
    sorted:     Vec<f64>,
    direction:  Direction,
    tie_method: TieMethod,
}

impl QuintileScorer {
    pub fn new(population: &[f64], direction: Direction, tie_method: TieMethod) -> Self {
        let mut sorted = population.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self { sorted, direction, tie_method }
    }

    /// Score a value against the population. Values are expected to be
    /// members of the population; an empty population scores 1.
    pub fn score(&self, value: f64) -> Score {
        let n = self.sorted.len();
        if n == 0 {
            return 1;
        }
        // Number of elements strictly below / at-or-below `value`.
        let below = self.sorted.partition_point(|x| *x < value);
        let at_or_below = self.sorted.partition_point(|x| *x <= value);

        match (self.tie_method, self.direction) {
            (TieMethod::FirstOccurrence, Direction::HigherIsBetter) => bucket(below + 1, n),
            (TieMethod::FirstOccurrence, Direction::LowerIsBetter) => 6 - bucket(below + 1, n),
            (TieMethod::Inclusive, Direction::HigherIsBetter) => bucket(at_or_below, n),
            (TieMethod::Inclusive, Direction::LowerIsBetter) => bucket(n - below, n),
        }
    }
}

/// Score every member of `values` against `values` itself.
pub fn score_population(values: &[f64], direction: Direction, tie_method: TieMethod) -> Vec<Score> {
    let scorer = QuintileScorer::new(values, direction, tie_method);
    values.iter().map(|v| scorer.score(*v)).collect()
}

/// Quintile bucket of a 1-based rank: percentile = rank / n,
/// ≤0.2 → 1, ≤0.4 → 2, ≤0.6 → 3, ≤0.8 → 4, else 5.
/// Compared in integers so 3/5 lands exactly on the 0.6 boundary.
pub fn bucket(rank: usize, n: usize) -> Score {
    (1..=4u8)
        .find(|&q| rank * 5 <= q as usize * n)
        .unwrap_or(5)
}

/// Composite frequency-monetary score: round((f + m) / 2), halves up.
pub fn fm_score(score_f: Score, score_m: Score) -> Score {
    (score_f + score_m).div_ceil(2)
}
