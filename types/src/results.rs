use crate::hands::FiveCardHand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a session (or table seat) stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    WinLimit,
    LossLimit,
    MaxRounds,
    InsufficientFunds,
    #[default]
    None,
}

/// Per-round totals accumulated over a whole session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAggregates {
    /// Base bets placed before decisions (three per round).
    pub base_placed: u64,
    /// Base bets still riding at resolution.
    pub at_risk: u64,
    pub main_net: i64,
    pub bonus_wagered: u64,
    pub bonus_net: i64,
    pub rounds_won: u64,
    pub rounds_lost: u64,
    pub rounds_pushed: u64,
    pub first_bets_ridden: u64,
    pub second_bets_ridden: u64,
    pub peak_bankroll: u64,
    pub lowest_bankroll: u64,
    pub longest_losing_streak: u64,
    pub hands: BTreeMap<FiveCardHand, u64>,
}

/// Outcome of one completed unit for one seat. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitResult {
    pub composite_id: u64,
    pub unit_index: u64,
    pub seat: u64,
    pub unit_seed: u64,
    pub starting_bankroll: u64,
    pub final_bankroll: u64,
    pub bankroll_delta: i64,
    pub rounds_played: u64,
    pub stop_reason: StopReason,
    pub aggregates: RoundAggregates,
}

/// Position of a seat result in the final ordering.
pub fn composite_id(unit_index: u64, seats_per_unit: u64, seat_offset: u64) -> u64 {
    debug_assert!(seat_offset < seats_per_unit);
    unit_index * seats_per_unit + seat_offset
}

/// Inverse of [composite_id]: `(unit_index, seat_offset)`.
pub fn split_composite_id(composite_id: u64, seats_per_unit: u64) -> (u64, u64) {
    (composite_id / seats_per_unit, composite_id % seats_per_unit)
}

/// Run level metadata handed to reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub units: u64,
    pub seats_per_unit: u64,
    pub results: u64,
    pub total_rounds: u64,
    pub master_seed: u64,
    /// False when the master seed was drawn at run start instead of configured.
    pub reproducible: bool,
    pub workers: usize,
    pub elapsed_ms: u64,
}

/// Ordered results of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    pub results: Vec<UnitResult>,
    pub metadata: RunMetadata,
}
