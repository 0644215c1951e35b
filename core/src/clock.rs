//! Analysis clock — the source of "now" for the lookback cutoff.

use chrono::{Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisClock {
    /// Local wall-clock time at the moment of the call.
    #[default]
    System,
    /// A pinned instant. Used by tests and replays.
    Fixed(NaiveDateTime),
}

impl AnalysisClock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System   => chrono::Local::now().naive_local(),
            Self::Fixed(t) => *t,
        }
    }

    /// now − `months` calendar months. Month-end days clamp to the last
    /// valid day of the target month (31 Mar − 1m = 28/29 Feb).
    pub fn cutoff(&self, months: u32) -> NaiveDateTime {
        let now = self.now();
        now.checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDateTime::MIN)
    }
}
