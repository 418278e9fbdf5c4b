//! Grid statistics driver.
//!
//! Bins one batch of sample positions onto a grid definition and writes
//! per-cell counts, means and cell geometry as JSON.

mod report;
mod samples;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use grid_binning::{BinningEngine, GridBinningConfig, GridDefinition, LengthUnit};
use report::BinningReport;
use samples::SampleBatch;

#[derive(Parser, Debug)]
#[command(name = "grid-stats")]
#[command(about = "Per-cell counts and means of scattered samples on a depth/lat/lon grid")]
struct Args {
    /// Grid definition (YAML)
    #[arg(short, long)]
    grid: PathBuf,

    /// Sample batch (JSON with `positions` and optional `values`)
    #[arg(short, long)]
    samples: PathBuf,

    /// Units of the area/volume tables (km or m)
    #[arg(long)]
    units: Option<LengthUnit>,

    /// Output file (stdout if absent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let def = GridDefinition::from_yaml_file(&args.grid)
        .with_context(|| format!("Failed to load grid definition {}", args.grid.display()))?;

    let mut config = GridBinningConfig::from_env();
    if let Some(units) = args.units {
        config.geometry_units = units;
    }

    let batch = SampleBatch::from_file(&args.samples)?;
    let report = run(&def, config, &batch)?;
    let json = report.to_json().context("Failed to serialize report")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            info!(path = %path.display(), "Wrote report");
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Build the engine and bin one batch.
fn run(
    def: &GridDefinition,
    config: GridBinningConfig,
    batch: &SampleBatch,
) -> Result<BinningReport> {
    let engine = BinningEngine::new(def, config).context("Failed to build grid")?;
    let (nz, ny, nx) = engine.grid().shape();
    info!(
        units = %def.units,
        nz,
        ny,
        nx,
        cells = engine.grid().num_cells(),
        "Built grid"
    );

    let stats = engine
        .statistics(&batch.positions, batch.values())
        .context("Failed to aggregate samples")?;
    info!(
        samples = batch.positions.len(),
        occupied = stats.occupied_cells().len(),
        clipped = stats.clipped,
        "Aggregated batch"
    );

    Ok(BinningReport::new(&engine, def.units, stats))
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so the report can be piped from stdout.
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}
