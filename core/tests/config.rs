//! Loading the shipped analysis config.

use rfm_core::{
    config::{AnalysisParams, ColumnAliases},
    RfmConfig, TieMethod,
};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_config_matches_built_in_aliases() {
    let config = RfmConfig::load(&data_dir()).expect("shipped config");
    assert_eq!(config.columns, ColumnAliases::default());
    assert_eq!(config.scoring.tie_method, TieMethod::Inclusive);
    assert_eq!(config.defaults.lookback_months, 12);
    assert_eq!(config.defaults.segments, vec!["Retail", "Wholesale"]);
}

#[test]
fn run_parameters_fall_back_to_config_defaults() {
    let config = RfmConfig::load(&data_dir()).expect("shipped config");
    assert_eq!(
        config.params_or_defaults(None, Vec::new()),
        AnalysisParams::new(12, ["Retail", "Wholesale"])
    );
    assert_eq!(
        config.params_or_defaults(Some(3), vec!["Retail".into()]),
        AnalysisParams::new(3, ["Retail"])
    );
}

#[test]
fn missing_config_is_an_error() {
    assert!(RfmConfig::load("/nonexistent/rfm-data").is_err());
}
