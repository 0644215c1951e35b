//! rfm-runner: headless RFM segmentation runner.
//!
//! Usage:
//!   rfm-runner --input rows.json --months 12 --segment Retail --segment Wholesale
//!   rfm-runner --synthetic 200 --seed 7 --db reports.db --analysis-id q3-review
//!   rfm-runner --input rows.json --json

use anyhow::Result;
use rfm_core::{
    clock::AnalysisClock,
    engine::{RfmEngine, RfmReport},
    rejection::tally,
    snapshot::new_analysis_id,
    store::ReportStore,
    synthetic::SyntheticCohort,
    table::{rows_from_json, TabularRow},
    AnalysisParams, RfmConfig, RfmError,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let input = flag_value(&args, "--input");
    let synthetic = flag_value(&args, "--synthetic").and_then(|v| v.parse::<usize>().ok());
    let seed = parse_arg(&args, "--seed", 42u64);
    let months = flag_value(&args, "--months").and_then(|v| v.parse::<u32>().ok());
    let segments: Vec<String> = flag_values(&args, "--segment");
    let db = flag_value(&args, "--db");
    let json_out = args.iter().any(|a| a == "--json");

    let engine = if Path::new(&format!("{data_dir}/rfm/analysis_config.json")).exists() {
        RfmEngine::build(data_dir)?
    } else {
        log::info!("no config under {data_dir}, using built-in defaults");
        RfmEngine::new(RfmConfig::default(), AnalysisClock::System)
    };
    let params = engine.config.params_or_defaults(months, segments);

    let rows: Vec<TabularRow> = match (input, synthetic) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
            rows_from_json(&content)?
        }
        (None, Some(n)) => SyntheticCohort::new(n, seed, engine.clock.now())
            .with_segments(params.segments.clone())
            .with_defect_rate(0.02)
            .generate(),
        (None, None) => anyhow::bail!("pass --input <rows.json> or --synthetic <clients>"),
    };

    let report = match engine.analyze(&rows, &params) {
        Ok(r) => r,
        Err(e) if e.is_user_error() => {
            eprintln!("{}", user_guidance(&e));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if json_out {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, &params);
    }

    if let Some(db) = db {
        let store = ReportStore::open(db)?;
        store.migrate()?;
        let analysis_id = flag_value(&args, "--analysis-id")
            .map(str::to_string)
            .unwrap_or_else(new_analysis_id);
        let version = store.save_report(&analysis_id, &params, &report, engine.clock.now())?;
        if !json_out {
            println!();
            println!("  stored:         {analysis_id} v{version} ({db})");
        }
    }

    Ok(())
}

fn user_guidance(e: &RfmError) -> String {
    match e {
        RfmError::EmptyInput => "The file contains no rows. Check that the right sheet was exported.".into(),
        RfmError::NoMatchingRecords { rows_total } => format!(
            "None of the {rows_total} rows matched. Try other segment tags or a longer lookback window."
        ),
        other => other.to_string(),
    }
}

fn print_summary(report: &RfmReport, params: &AnalysisParams) {
    let ingest = &report.ingest;

    println!("=== RFM SUMMARY ===");
    println!("  lookback:       {} months", params.lookback_months);
    println!("  segments:       {}", params.segments.join(", "));
    println!("  cutoff:         {}", ingest.cutoff.date());
    println!("  reference date: {}", ingest.reference_date.date());
    println!("  rows:           {}", ingest.rows_total);
    println!("  retained:       {}", ingest.rows_retained);
    println!("  clients:        {}", report.clients.len());
    for (kind, n) in tally(&ingest.rejections) {
        println!("  dropped:        {n} ({kind})");
    }

    println!();
    println!("=== SEGMENTS ===");
    for c in &report.category_counts {
        println!("  {:<20} {:>6}", c.label, c.count);
    }

    println!();
    println!("=== HEATMAP (rows FM 5→1, columns R 1→5) ===");
    for row in report.heatmap.chunks(5) {
        let fm = row.first().map(|c| c.fm).unwrap_or_default();
        let counts: Vec<String> = row.iter().map(|c| format!("{:>5}", c.count)).collect();
        println!("  FM{fm} {}", counts.join(""));
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn flag_values(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
