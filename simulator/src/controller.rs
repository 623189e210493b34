//! Sequential runs.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use tracing::{info, warn};

use crate::{build_output, SimulationError};
use letitride_execution::{derive_unit_seed, GameError, UnitFactory};
use letitride_types::{RunOutput, UnitResult, ValidatedConfig};

/// Runs single units. Shared by reference across workers, so it must not
/// hold per-unit mutable state.
pub trait UnitRunner: Sync {
    fn seats_per_unit(&self) -> u64;

    /// Results for one unit, in seat order.
    fn run_unit(&self, unit_index: u64, unit_seed: u64) -> Result<Vec<UnitResult>, GameError>;
}

impl UnitRunner for UnitFactory {
    fn seats_per_unit(&self) -> u64 {
        UnitFactory::seats_per_unit(self)
    }

    fn run_unit(&self, unit_index: u64, unit_seed: u64) -> Result<Vec<UnitResult>, GameError> {
        UnitFactory::run_unit(self, unit_index, unit_seed)
    }
}

/// Reported after each completed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
}

/// The configured master seed, or a fresh one drawn once from the thread
/// RNG. The flag is false when the run cannot be reproduced.
pub fn resolve_master_seed(config: &ValidatedConfig) -> (u64, bool) {
    match config.master_seed {
        Some(seed) => (seed, true),
        None => (rand::thread_rng().gen(), false),
    }
}

/// Start of run log line, plus a warning when units are bounded only by the
/// round guard.
pub(crate) fn announce(
    config: &ValidatedConfig,
    master_seed: u64,
    reproducible: bool,
    workers: usize,
) {
    info!(
        master_seed,
        reproducible,
        units = config.units,
        seats = config.seats,
        results = config.result_count(),
        workers,
        "starting run"
    );
    if config.limits.max_rounds.is_none() {
        warn!(
            round_limit = config.round_limit,
            "no max_rounds set: a unit still playing after round_limit rounds fails the run"
        );
    }
}

/// Run every unit in order on the calling thread.
pub fn run(config: Arc<ValidatedConfig>) -> Result<RunOutput, SimulationError> {
    run_with_progress(config, |_| Ok(()))
}

/// Like [run], calling `progress` after each unit. An error from the callback
/// aborts the run.
pub fn run_with_progress<F>(
    config: Arc<ValidatedConfig>,
    mut progress: F,
) -> Result<RunOutput, SimulationError>
where
    F: FnMut(Progress) -> anyhow::Result<()>,
{
    let start = Instant::now();
    let factory = UnitFactory::new(config.clone())?;
    let (master_seed, reproducible) = resolve_master_seed(&config);
    announce(&config, master_seed, reproducible, 1);

    let results = run_units(&factory, master_seed, config.units, &mut progress).map_err(|err| {
        warn!(error = %err, "sequential run aborted");
        err
    })?;

    let output = build_output(
        results,
        config.units,
        factory.seats_per_unit(),
        master_seed,
        reproducible,
        1,
        start.elapsed(),
    );
    info!(
        results = output.metadata.results,
        total_rounds = output.metadata.total_rounds,
        elapsed_ms = output.metadata.elapsed_ms,
        "sequential run finished"
    );
    Ok(output)
}

/// Run units `0..units`, appending each unit's results in unit order.
pub fn run_units<R, F>(
    runner: &R,
    master_seed: u64,
    units: u64,
    progress: &mut F,
) -> Result<Vec<UnitResult>, SimulationError>
where
    R: UnitRunner + ?Sized,
    F: FnMut(Progress) -> anyhow::Result<()>,
{
    let capacity = units.saturating_mul(runner.seats_per_unit()) as usize;
    let mut results = Vec::with_capacity(capacity);
    for unit_index in 0..units {
        let unit_seed = derive_unit_seed(master_seed, unit_index);
        let unit = runner
            .run_unit(unit_index, unit_seed)
            .map_err(|source| SimulationError::Execution { unit_index, source })?;
        results.extend(unit);
        progress(Progress {
            completed: unit_index + 1,
            total: units,
        })
        .map_err(SimulationError::Progress)?;
    }
    Ok(results)
}
