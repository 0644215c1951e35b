//! Decoded tabular input — one map of column name → scalar per row.
//!
//! Decoding spreadsheets or CSV files happens upstream; rows arrive here
//! already parsed, typically from a JSON array of objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Null cells and whitespace-only text count as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty   => true,
            Self::Text(s) => s.trim().is_empty(),
            _             => false,
        }
    }

    /// Render the cell for rejection logs and display.
    pub fn render(&self) -> String {
        match self {
            Self::Empty     => String::new(),
            Self::Bool(b)   => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s)   => s.clone(),
        }
    }
}

pub type TabularRow = BTreeMap<String, CellValue>;

/// Look up the first alias with a non-blank value.
pub fn first_present<'a>(row: &'a TabularRow, aliases: &[String]) -> Option<&'a CellValue> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|cell| !cell.is_blank())
}

/// Parse rows from a JSON array of objects.
pub fn rows_from_json(json: &str) -> serde_json::Result<Vec<TabularRow>> {
    serde_json::from_str(json)
}
