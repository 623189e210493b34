//! Builds and runs units.

use std::sync::Arc;

use tracing::debug;

use crate::casino::{
    betting::BettingFactory,
    bonus::{build_bonus_strategy, BonusStrategy},
    paytable::Paytables,
    strategy::{build_strategy, Strategy},
    GameError, GameRng,
};
use crate::session::Session;
use crate::table::TableCoordinator;
use letitride_types::{ConfigError, UnitResult, ValidatedConfig};

/// Everything shared between units of a run. Strategies, the bonus policy
/// and paytables are built once; betting systems are built per session.
pub struct UnitFactory {
    config: Arc<ValidatedConfig>,
    strategies: Vec<Arc<dyn Strategy>>,
    bonus: Arc<dyn BonusStrategy>,
    paytables: Arc<Paytables>,
    betting: BettingFactory,
}

impl UnitFactory {
    pub fn new(config: Arc<ValidatedConfig>) -> Result<Self, ConfigError> {
        let strategies = config
            .strategies
            .iter()
            .map(build_strategy)
            .collect::<Result<Vec<_>, _>>()?;
        let bonus = build_bonus_strategy(&config.bonus)?;
        let paytables = Arc::new(Paytables::new(config.paytable, config.bonus_paytable)?);
        let betting = BettingFactory::new(config.wager, &config.betting)?;
        Ok(Self {
            config,
            strategies,
            bonus,
            paytables,
            betting,
        })
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn seats_per_unit(&self) -> u64 {
        self.config.seats_per_unit()
    }

    /// A fresh session for `seat` with its own betting system.
    ///
    /// # Panics
    ///
    /// Panics if `seat` is not below the configured number of seats.
    pub fn session(&self, seat: usize) -> Session {
        Session::new(
            seat,
            &self.config,
            self.strategies[seat].clone(),
            self.betting.build(),
            self.bonus.clone(),
            self.paytables.clone(),
        )
    }

    /// A fresh table with one session per configured seat.
    pub fn table(&self) -> TableCoordinator {
        let seats = (0..self.config.seats).map(|seat| self.session(seat)).collect();
        TableCoordinator::new(seats, self.config.dealer_discard)
    }

    /// Run one unit to completion. Results are in seat order.
    pub fn run_unit(&self, unit_index: u64, unit_seed: u64) -> Result<Vec<UnitResult>, GameError> {
        let mut rng = GameRng::new(unit_seed);
        let limit = self.config.round_limit;

        let results = if self.config.seats == 1 {
            let mut session = self.session(0);
            while !session.is_stopped() {
                if session.rounds_played() >= limit {
                    return Err(GameError::RoundLimitExceeded(limit));
                }
                session.advance_round(&mut rng)?;
            }
            vec![session.finish(unit_index, unit_seed, 1)]
        } else {
            let mut table = self.table();
            while !table.is_finished() {
                if table.rounds() >= limit {
                    return Err(GameError::RoundLimitExceeded(limit));
                }
                table.advance_round(&mut rng)?;
            }
            table.into_results(unit_index, unit_seed)
        };

        debug!(
            unit = unit_index,
            rounds = results.iter().map(|r| r.rounds_played).max().unwrap_or(0),
            "unit finished"
        );
        Ok(results)
    }
}
