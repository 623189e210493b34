//! Builders shared by tests in this crate and downstream crates.

use std::sync::Arc;

use crate::casino::{cards::parse_card, round::DealtHand};
use crate::factory::UnitFactory;
use crate::session::Session;
use letitride_types::{Config, StopLimits, StrategyConfig, ValidatedConfig};

/// Single seat, always pull, stopping only at `max_rounds`.
pub fn always_pull_config(bankroll: u64, wager: u64, max_rounds: u64) -> Config {
    Config {
        bankroll,
        wager,
        stop: StopLimits {
            win_limit: None,
            loss_limit: None,
            max_rounds: Some(max_rounds),
            stop_on_insufficient_funds: true,
            round_limit: None,
        },
        seats: 1,
        master_seed: Some(42),
        units: 1,
        strategy: StrategyConfig::AlwaysPull,
        ..Config::default()
    }
}

pub fn validate(config: Config) -> ValidatedConfig {
    config.validate().expect("invalid test config")
}

pub fn shared(config: Config) -> Arc<ValidatedConfig> {
    Arc::new(validate(config))
}

pub fn factory(config: Config) -> UnitFactory {
    UnitFactory::new(shared(config)).expect("failed to build unit factory")
}

/// A fresh session for `seat` built from `config`, widened to enough seats.
pub fn session(seat: usize, mut config: Config) -> Session {
    config.seats = config.seats.max(seat + 1);
    factory(config).session(seat)
}

/// Build a hand from card names, e.g. `["Ts", "Th", "2c"], ["5d", "8s"]`.
pub fn hand(hole: [&str; 3], community: [&str; 2]) -> DealtHand {
    let card = |name: &str| parse_card(name).expect("invalid card name");
    DealtHand {
        hole: hole.map(card),
        community: community.map(card),
    }
}

/// Pair of tens: pays even with every bet pulled.
pub fn paying_hand() -> DealtHand {
    hand(["Ts", "Th", "2c"], ["5d", "8s"])
}

/// King high with no draw.
pub fn losing_hand() -> DealtHand {
    hand(["2s", "4h", "6d"], ["8c", "Ks"])
}
