use std::path::PathBuf;

use clap::Parser;
use foliocast::{ProjectionEngine, init_logging};
use foliocast_core::model::SimulationParams;

#[derive(Parser, Debug)]
#[command(name = "foliocast")]
#[command(about = "Monte Carlo portfolio projection")]
struct Args {
    /// Path to a simulation parameters JSON file
    params: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the full result (distribution and monthly bands) instead of
    /// just the summary
    #[arg(long)]
    full: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let raw = std::fs::read_to_string(&args.params)?;
    let params: SimulationParams = serde_json::from_str(&raw)?;

    let engine = ProjectionEngine::new();
    let _progress = engine.on_progress(|progress| {
        tracing::info!(
            completed = progress.completed,
            total = progress.total,
            "projection progress"
        );
    });

    let result = engine.run_monte_carlo(params).wait()?;

    let output = if args.full {
        if args.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        }
    } else if args.pretty {
        serde_json::to_string_pretty(&result.summary)?
    } else {
        serde_json::to_string(&result.summary)?
    };
    println!("{output}");

    Ok(())
}
