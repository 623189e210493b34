//! Parallel runs.
//!
//! The unit range is split into contiguous batches, one per worker. A task
//! carries only its batch number, unit range and the master seed; each worker
//! derives its own unit seeds and sends back `(composite_id, result)` pairs.
//!
//! The lowest failing unit seen so far is published to every worker. A worker
//! stops before any unit above it, so a failure cuts the run short while units
//! below it still run and can report an even lower failure.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    mpsc, Arc,
};
use std::time::Instant;

use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::{
    build_output,
    controller::{announce, resolve_master_seed, UnitRunner},
    merge::ResultMerger,
    SimulationError,
};
use letitride_execution::{derive_unit_seed, UnitFactory};
use letitride_types::{composite_id, ConfigError, RunOutput, UnitResult, ValidatedConfig};

/// Work shipped to one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerTask {
    pub batch: usize,
    pub units: Range<u64>,
    pub master_seed: u64,
}

/// What a worker sends back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerResult {
    pub batch: usize,
    pub pairs: Vec<(u64, UnitResult)>,
}

/// Split `0..units` into at most `workers` contiguous ranges whose sizes
/// differ by at most one. Empty ranges are dropped.
pub fn partition(units: u64, workers: usize) -> Vec<Range<u64>> {
    let batches = (workers as u64).min(units);
    if batches == 0 {
        return Vec::new();
    }
    let base = units / batches;
    let extra = units % batches;

    let mut start = 0;
    (0..batches)
        .map(|batch| {
            let len = base + u64::from(batch < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Run a batch. Returns `Ok(None)` when the batch was cut short by a failure
/// at a lower unit elsewhere.
fn execute<R: UnitRunner + ?Sized>(
    runner: &R,
    task: &WorkerTask,
    lowest_failure: &AtomicU64,
) -> Result<Option<WorkerResult>, SimulationError> {
    let seats_per_unit = runner.seats_per_unit();
    let mut pairs = Vec::with_capacity(
        (task.units.end - task.units.start).saturating_mul(seats_per_unit) as usize,
    );
    for unit_index in task.units.clone() {
        if unit_index > lowest_failure.load(Ordering::Acquire) {
            return Ok(None);
        }
        let unit_seed = derive_unit_seed(task.master_seed, unit_index);
        let results = runner.run_unit(unit_index, unit_seed).map_err(|source| {
            lowest_failure.fetch_min(unit_index, Ordering::AcqRel);
            SimulationError::Execution { unit_index, source }
        })?;
        for (seat, result) in results.into_iter().enumerate() {
            pairs.push((composite_id(unit_index, seats_per_unit, seat as u64), result));
        }
    }
    Ok(Some(WorkerResult {
        batch: task.batch,
        pairs,
    }))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("worker panicked: {message}")
    } else {
        "worker panicked".to_string()
    }
}

/// Run units `0..units` on `workers` threads. Output order matches
/// [crate::run_units] for the same master seed. Any failure aborts the whole
/// run; the failure with the lowest unit index is reported.
pub fn run_parallel_units<R: UnitRunner + ?Sized>(
    runner: &R,
    master_seed: u64,
    units: u64,
    workers: usize,
) -> Result<Vec<UnitResult>, SimulationError> {
    let tasks: Vec<WorkerTask> = partition(units, workers)
        .into_iter()
        .enumerate()
        .map(|(batch, units)| WorkerTask {
            batch,
            units,
            master_seed,
        })
        .collect();
    let batch_starts: Vec<u64> = tasks.iter().map(|task| task.units.start).collect();

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("letitride-worker-{i}"))
        .build()
        .map_err(|err| SimulationError::WorkerTransport {
            batch: 0,
            reason: format!("failed to start worker pool: {err}"),
        })?;

    let lowest_failure = AtomicU64::new(u64::MAX);
    let (sender, receiver) = mpsc::channel();
    pool.scope(|scope| {
        for task in tasks {
            let sender = sender.clone();
            let lowest_failure = &lowest_failure;
            scope.spawn(move |_| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    execute(runner, &task, lowest_failure)
                }))
                .unwrap_or_else(|payload| {
                    // A panic ranks at the start of its batch
                    lowest_failure.fetch_min(task.units.start, Ordering::AcqRel);
                    Err(SimulationError::WorkerTransport {
                        batch: task.batch,
                        reason: panic_message(payload),
                    })
                });
                // The receiver is alive until every batch has returned
                let _ = sender.send((task.batch, outcome));
            });
        }
    });
    drop(sender);

    let mut merger = ResultMerger::new(units, runner.seats_per_unit());
    let mut failure: Option<(u64, SimulationError)> = None;
    for (batch, outcome) in receiver {
        match outcome {
            Ok(None) => debug!(batch, "batch cut short"),
            Ok(Some(result)) => {
                debug!(batch, results = result.pairs.len(), "batch complete");
                if failure.is_none() {
                    for (id, unit_result) in result.pairs {
                        merger.place(id, unit_result)?;
                    }
                }
            }
            Err(err) => {
                let unit = err.unit_index().unwrap_or(batch_starts[batch]);
                warn!(batch, unit, error = %err, "batch failed");
                if failure.as_ref().map_or(true, |(lowest, _)| unit < *lowest) {
                    failure = Some((unit, err));
                }
            }
        }
    }

    if let Some((_, err)) = failure {
        return Err(err);
    }
    merger.finish()
}

/// Run a configuration on `worker_count` worker threads.
pub fn run_parallel(
    config: Arc<ValidatedConfig>,
    worker_count: usize,
) -> Result<RunOutput, SimulationError> {
    if worker_count == 0 {
        return Err(ConfigError::InvalidNonZero {
            field: "workers",
            value: 0,
        }
        .into());
    }
    let start = Instant::now();
    let factory = UnitFactory::new(config.clone())?;
    let (master_seed, reproducible) = resolve_master_seed(&config);
    announce(&config, master_seed, reproducible, worker_count);

    let results = run_parallel_units(&factory, master_seed, config.units, worker_count)
        .map_err(|err| {
            warn!(error = %err, "parallel run aborted");
            err
        })?;

    let output = build_output(
        results,
        config.units,
        factory.seats_per_unit(),
        master_seed,
        reproducible,
        worker_count,
        start.elapsed(),
    );
    info!(
        results = output.metadata.results,
        total_rounds = output.metadata.total_rounds,
        elapsed_ms = output.metadata.elapsed_ms,
        "parallel run finished"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even() {
        assert_eq!(partition(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_partition_uneven() {
        let batches = partition(10, 3);
        assert_eq!(batches, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_partition_more_workers_than_units() {
        assert_eq!(partition(3, 8), vec![0..1, 1..2, 2..3]);
        assert!(partition(0, 4).is_empty());
        assert!(partition(5, 0).is_empty());
    }

    #[test]
    fn test_partition_covers() {
        for units in [1u64, 7, 100, 1001] {
            for workers in [1usize, 2, 3, 8, 16] {
                let batches = partition(units, workers);
                let mut next = 0;
                for batch in &batches {
                    assert_eq!(batch.start, next);
                    assert!(!batch.is_empty());
                    next = batch.end;
                }
                assert_eq!(next, units);
                let sizes: Vec<u64> = batches.iter().map(|b| b.end - b.start).collect();
                let max = sizes.iter().max().unwrap();
                let min = sizes.iter().min().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "worker panicked: boom");
        assert_eq!(
            panic_message(Box::new("bang".to_string())),
            "worker panicked: bang"
        );
        assert_eq!(panic_message(Box::new(7u8)), "worker panicked");
    }
}
