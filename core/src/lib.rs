//! RFM segmentation engine.
//!
//! Raw invoice rows go in; per-client recency, frequency and monetary
//! quintile scores, a segment per client, a 5×5 heatmap and per-segment
//! counts come out. See `engine` for the pipeline order.

pub mod aggregates;
pub mod aggregator;
pub mod category;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod rejection;
pub mod rng;
pub mod scorer;
pub mod snapshot;
pub mod store;
pub mod synthetic;
pub mod table;
pub mod types;

pub use category::Category;
pub use config::{AnalysisParams, RfmConfig, TieMethod};
pub use engine::{RfmEngine, RfmReport};
pub use error::{RfmError, RfmResult};
pub use table::{CellValue, TabularRow};
