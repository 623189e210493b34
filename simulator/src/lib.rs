//! Let It Ride simulation runs.
//!
//! One master seed fans out into per-unit seeds. Units run either in order on
//! the calling thread ([run]) or in contiguous batches on a worker pool
//! ([run_parallel]); both produce the same results in the same order.

use std::time::Duration;

use letitride_types::{RunMetadata, RunOutput, UnitResult};

mod controller;
mod error;
mod merge;
mod parallel;
mod summary;


pub use controller::{
    resolve_master_seed, run, run_units, run_with_progress, Progress, UnitRunner,
};
pub use error::SimulationError;
pub use merge::ResultMerger;
pub use parallel::{partition, run_parallel, run_parallel_units, WorkerResult, WorkerTask};
pub use summary::RunSummary;

fn build_output(
    results: Vec<UnitResult>,
    units: u64,
    seats_per_unit: u64,
    master_seed: u64,
    reproducible: bool,
    workers: usize,
    elapsed: Duration,
) -> RunOutput {
    let total_rounds = results.iter().map(|r| r.rounds_played).sum();
    RunOutput {
        metadata: RunMetadata {
            units,
            seats_per_unit,
            results: results.len() as u64,
            total_rounds,
            master_seed,
            reproducible,
            workers,
            elapsed_ms: elapsed.as_millis() as u64,
        },
        results,
    }
}
