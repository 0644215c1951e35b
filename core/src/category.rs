//! Segment categories, their display order and colours.
//!
//! The table is immutable process-wide configuration; nothing mutates it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Champions,
    Loyal,
    PotentialLoyalist,
    NewClients,
    Promising,
    AtRiskWatch,
    AboutToSleep,
    AtRisk,
    CantLoseThem,
    Hibernating,
    Lost,
    Uncategorized,
}

/// Canonical categories in display order. `Uncategorized` is not canonical.
pub const CANONICAL_ORDER: [Category; 11] = [
    Category::Champions,
    Category::Loyal,
    Category::PotentialLoyalist,
    Category::NewClients,
    Category::Promising,
    Category::AtRiskWatch,
    Category::AboutToSleep,
    Category::AtRisk,
    Category::CantLoseThem,
    Category::Hibernating,
    Category::Lost,
];

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Champions         => "Champions",
            Self::Loyal             => "Loyal",
            Self::PotentialLoyalist => "Potential Loyalist",
            Self::NewClients        => "New Clients",
            Self::Promising         => "Promising",
            Self::AtRiskWatch       => "At Risk - Watch",
            Self::AboutToSleep      => "About To Sleep",
            Self::AtRisk            => "At Risk",
            Self::CantLoseThem      => "Can't Lose Them",
            Self::Hibernating       => "Hibernating",
            Self::Lost              => "Lost",
            Self::Uncategorized     => "Uncategorized",
        }
    }

    /// Hex colour used by heatmap and chart renderers.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Champions         => "#1b5e20",
            Self::Loyal             => "#43a047",
            Self::PotentialLoyalist => "#9ccc65",
            Self::NewClients        => "#26c6da",
            Self::Promising         => "#42a5f5",
            Self::AtRiskWatch       => "#ffca28",
            Self::AboutToSleep      => "#ffa726",
            Self::AtRisk            => "#ef6c00",
            Self::CantLoseThem      => "#c62828",
            Self::Hibernating       => "#8d6e63",
            Self::Lost              => "#616161",
            Self::Uncategorized     => "#bdbdbd",
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Uncategorized)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
