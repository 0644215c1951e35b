//! Aggregate builder — heatmap grid and per-category counts.

use crate::{
    aggregator::ClientRaw,
    category::{Category, CANONICAL_ORDER},
    classifier::classify,
    types::Score,
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientScored {
    #[serde(flatten)]
    pub raw:      ClientRaw,
    pub score_r:  Score,
    pub score_f:  Score,
    pub score_m:  Score,
    pub score_fm: Score,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapCell {
    pub r:        Score,
    pub fm:       Score,
    pub category: Category,
    pub count:    usize,
    pub color:    String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: Category,
    pub label:    String,
    pub count:    usize,
    pub color:    String,
}

// ── Builders ─────────────────────────────────────────────────────────────────

/// All 25 (r, fm) cells, fm high-to-low then r low-to-high, zero counts kept.
pub fn build_heatmap(clients: &[ClientScored]) -> Vec<HeatmapCell> {
    let mut counts = [[0usize; 5]; 5];
    for c in clients {
        if let (Some(r), Some(fm)) = (grid_index(c.score_r), grid_index(c.score_fm)) {
            counts[r][fm] += 1;
        }
    }

    let mut cells = Vec::with_capacity(25);
    for fm in (1..=5u8).rev() {
        for r in 1..=5u8 {
            let category = classify(r, fm);
            cells.push(HeatmapCell {
                r,
                fm,
                category,
                count: counts[r as usize - 1][fm as usize - 1],
                color: category.color().to_string(),
            });
        }
    }
    cells
}

/// One entry per canonical category in display order, plus
/// "Uncategorized" only when some client fell through.
pub fn build_category_counts(clients: &[ClientScored]) -> Vec<CategoryCount> {
    let count_of = |cat: Category| clients.iter().filter(|c| c.category == cat).count();

    let mut out: Vec<CategoryCount> = CANONICAL_ORDER
        .iter()
        .map(|&category| entry(category, count_of(category)))
        .collect();

    let uncategorized = count_of(Category::Uncategorized);
    if uncategorized > 0 {
        log::warn!("{uncategorized} clients fell outside the segment table");
        out.push(entry(Category::Uncategorized, uncategorized));
    }
    out
}

fn entry(category: Category, count: usize) -> CategoryCount {
    CategoryCount {
        category,
        label: category.label().to_string(),
        count,
        color: category.color().to_string(),
    }
}

fn grid_index(score: Score) -> Option<usize> {
    (1..=5).contains(&score).then(|| score as usize - 1)
}
