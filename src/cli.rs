use crate::export::{self, OutputPaths};
use crate::model::DerivedSeries;
use crate::{chart, extract, loader, metrics, text_summary};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "k6-plot",
    version,
    about = "Render k6 JSON output into charts and a text summary"
)]
pub struct Cli {
    /// k6 JSON output file (`k6 run --out json=<file>`)
    pub input: PathBuf,

    /// Moving-average window for the RPS series (0 or 1 disables smoothing)
    #[arg(long, default_value_t = metrics::DEFAULT_RPS_WINDOW)]
    pub window: usize,

    /// Write outputs here instead of next to the input file
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Also export the summary statistics as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Suppress progress output; errors are still printed
    #[arg(long)]
    pub silent: bool,
}

/// Usage text printed on argument errors.
pub const USAGE: &str = "Usage: k6-plot <k6_json_file>\nExample: k6-plot ops/load/out/baseline.json";

/// Why a run failed; `main` turns each into its message and exit code.
#[derive(Debug)]
pub enum RunError {
    MissingInput(PathBuf),
    Processing(anyhow::Error),
}

pub fn run(args: Cli) -> std::result::Result<(), RunError> {
    if !args.input.exists() {
        return Err(RunError::MissingInput(args.input));
    }
    process(&args).map_err(RunError::Processing)
}

/// Load, extract, derive, render and write for one input file.
fn process(args: &Cli) -> Result<()> {
    let progress = |msg: String| {
        if !args.silent {
            println!("{msg}");
        }
    };

    progress(format!("Processing k6 results: {}", args.input.display()));

    let test_name = export::test_name(&args.input);
    let out_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| export::input_dir(&args.input));
    let paths = OutputPaths::new(&out_dir, &test_name);
    tracing::debug!(?paths, window = args.window, "resolved outputs");

    let records = loader::load_records(&args.input)?;
    progress(format!("Loaded {} data points", records.len()));

    let series = extract::extract_metrics(&records)?;
    progress(format!("Extracted metrics for {} timestamps", series.len()));

    let derived = DerivedSeries {
        rps: metrics::calculate_rps(&series.timestamps, &series.http_reqs.values, args.window),
        error_rate: metrics::calculate_error_rate(
            &series.http_req_failed.values,
            &series.http_reqs.values,
        ),
    };

    chart::render(&paths.chart, &test_name, &series, &derived).context("render chart")?;
    progress(format!("Plot saved: {}", paths.chart.display()));

    let summary = text_summary::build_load_summary(&test_name, &series, &derived);
    export::write_summary_text(&paths.summary, &text_summary::render_text(&summary))?;
    progress(format!("Summary saved: {}", paths.summary.display()));

    if let Some(p) = args.export_json.as_deref() {
        export::export_json(p, &summary)?;
        progress(format!("Exported JSON: {}", p.display()));
    }

    progress("Plot generation completed!".to_string());
    Ok(())
}
