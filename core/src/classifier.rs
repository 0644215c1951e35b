//! Classifier — (R score, FM score) → segment category.
//!
//! RULE: Clauses are evaluated top to bottom and the first match wins.
//! Several pairs satisfy more than one clause; never reorder.

use crate::{category::Category, types::Score};

pub fn classify(r: Score, fm: Score) -> Category {
    use Category::*;

    if r == 5 && fm == 5 {
        Champions
    } else if (r == 5 && fm == 4) || (r == 4 && matches!(fm, 4 | 5)) || (r == 3 && matches!(fm, 4 | 5)) {
        Loyal
    } else if r == 3 && fm == 3 {
        AtRiskWatch
    } else if r == 3 && matches!(fm, 1 | 2) {
        AboutToSleep
    } else if r == 4 && fm == 1 {
        Promising
    } else if r == 5 && fm == 1 {
        NewClients
    } else if r == 2 && fm == 2 {
        Hibernating
    } else if matches!(r, 1 | 2) && fm == 5 {
        CantLoseThem
    } else if matches!(r, 1 | 2) && matches!(fm, 3 | 4) {
        AtRisk
    } else if (r == 1 && matches!(fm, 1 | 2)) || (r == 2 && fm == 1) {
        Lost
    } else if matches!(r, 4 | 5) && matches!(fm, 2 | 3) {
        PotentialLoyalist
    } else {
        Uncategorized
    }
}
