use anyhow::Context;
use clap::Parser;
use letitride_simulator::{run_parallel, run_with_progress, RunSummary};
use letitride_types::Config;
use std::{fs::File, io::BufWriter, path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML run configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Override the number of units
    #[arg(short, long)]
    units: Option<u64>,

    /// Override the worker count (1 runs sequentially)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override the master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write every unit result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let source = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read {}", args.config.display()))?;
    let mut config = Config::from_yaml(&source).context("failed to parse config")?;
    if let Some(units) = args.units {
        config.units = units;
    }
    if let Some(workers) = args.workers {
        config.workers = Some(workers);
    }
    if let Some(seed) = args.seed {
        config.master_seed = Some(seed);
    }
    let config = Arc::new(config.validate().context("invalid config")?);

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Run
    let output = if config.workers > 1 {
        run_parallel(config.clone(), config.workers)?
    } else {
        let step = (config.units / 10).max(1);
        run_with_progress(config.clone(), |progress| {
            if progress.completed % step == 0 {
                info!(
                    completed = progress.completed,
                    total = progress.total,
                    "progress"
                );
            }
            Ok(())
        })?
    };

    // Write results
    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &output)
            .context("failed to write results")?;
        info!(path = %path.display(), results = output.results.len(), "wrote results");
    }

    let summary = RunSummary::from_output(&output);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode summary")?
    );
    Ok(())
}
