//! Common types for the Let It Ride simulator.
//!
//! Configuration flows in as a raw [Config] read from YAML and is turned into an
//! immutable [ValidatedConfig] before any unit runs. Results flow out as ordered
//! [UnitResult]s wrapped in a [RunOutput].

pub mod config;
pub mod hands;
pub mod results;

pub use config::{
    BettingSystemConfig, BonusPaytableId, BonusStrategyConfig, Config, ConfigError, ErrorKind,
    PaytableId, StopLimits, StrategyConfig, ValidatedConfig, BASE_BETS, COMMUNITY_CARDS,
    DECK_SIZE, HOLE_CARDS, MAX_ROUNDS_PER_UNIT, MAX_SEATS,
};
pub use hands::{FiveCardHand, ThreeCardHand};
pub use results::{
    composite_id, split_composite_id, RoundAggregates, RunMetadata, RunOutput, StopReason,
    UnitResult,
};
