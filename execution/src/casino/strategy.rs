//! Decision strategies.
//!
//! A strategy sees the three hole cards at the first decision and the hole
//! cards plus the first community card at the second. Strategies hold no
//! state, so one instance is shared by every unit and worker.

use std::sync::Arc;

use super::cards::{card_rank, card_rank_ace_high, card_suit};
use letitride_types::{ConfigError, StrategyConfig};

/// Pull a bet back or let it ride.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    Pull,
    Ride,
}

impl Decision {
    pub fn rides(self) -> bool {
        self == Decision::Ride
    }
}

/// Cards visible to the player at a decision point.
#[derive(Clone, Copy, Debug)]
pub struct Observation<'a> {
    pub hole: &'a [u8; 3],
    /// Community cards revealed so far (empty at the first decision).
    pub community: &'a [u8],
}

impl<'a> Observation<'a> {
    pub fn new(hole: &'a [u8; 3], community: &'a [u8]) -> Self {
        Self { hole, community }
    }

    /// Visible cards packed into a fixed buffer, with the number in use.
    fn visible(&self) -> ([u8; 5], usize) {
        let mut cards = [0u8; 5];
        cards[..3].copy_from_slice(self.hole);
        let extra = self.community.len().min(2);
        cards[3..3 + extra].copy_from_slice(&self.community[..extra]);
        (cards, 3 + extra)
    }
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decision on bet 1 after seeing the hole cards.
    fn decide_first(&self, observation: &Observation) -> Decision;

    /// Decision on bet 2 after the first community card.
    fn decide_second(&self, observation: &Observation) -> Decision;
}

/// Ten or better counts as a high card.
fn is_high(card: u8) -> bool {
    card_rank_ace_high(card) >= 10
}

fn is_suited(cards: &[u8]) -> bool {
    cards.iter().all(|&c| card_suit(c) == card_suit(cards[0]))
}

fn has_distinct_ranks(cards: &[u8]) -> bool {
    let mut seen = [false; 14];
    for &card in cards {
        let rank = card_rank(card) as usize;
        if seen[rank] {
            return false;
        }
        seen[rank] = true;
    }
    true
}

fn span(ranks: impl Iterator<Item = u8>) -> u8 {
    let (min, max) = ranks.fold((u8::MAX, 0), |(lo, hi), r| (lo.min(r), hi.max(r)));
    max.saturating_sub(min)
}

/// Smallest `max - min` over ace-low and ace-high readings.
fn rank_span(cards: &[u8]) -> u8 {
    let low = span(cards.iter().map(|&c| card_rank(c)));
    let high = span(cards.iter().map(|&c| card_rank_ace_high(c)));
    low.min(high)
}

/// Already a paying hand: tens or better, two pair, or better.
fn is_paying(cards: &[u8]) -> bool {
    let mut counts = [0u8; 15];
    for &card in cards {
        counts[card_rank_ace_high(card) as usize] += 1;
    }
    let mut pairs = 0;
    for (rank, &count) in counts.iter().enumerate() {
        if count >= 3 {
            return true;
        }
        if count == 2 {
            if rank >= 10 {
                return true;
            }
            pairs += 1;
        }
    }
    pairs >= 2
}

fn low_ranks_sorted(cards: &[u8; 3]) -> [u8; 3] {
    let mut ranks = cards.map(card_rank);
    ranks.sort_unstable();
    ranks
}

/// Three suited cards worth riding on: three to a royal, three consecutive
/// above 2-3-4, one gap with a high card, or two gaps with two high cards.
fn is_strong_straight_flush_draw(hole: &[u8; 3]) -> bool {
    if !is_suited(hole) || !has_distinct_ranks(hole) {
        return false;
    }
    let high = hole.iter().filter(|&&c| is_high(c)).count();
    if high == 3 {
        return true;
    }
    match rank_span(hole) {
        2 => !matches!(low_ranks_sorted(hole), [1, 2, 3] | [2, 3, 4]),
        3 => high >= 1,
        4 => high >= 2,
        _ => false,
    }
}

/// Four consecutive ranks completed at either end.
fn is_outside_straight_draw(cards: &[u8]) -> bool {
    if !has_distinct_ranks(cards) {
        return false;
    }
    let min = cards.iter().map(|&c| card_rank(c)).min().unwrap_or(0);
    let max = cards.iter().map(|&c| card_rank(c)).max().unwrap_or(0);
    // A-2-3-4 and J-Q-K-A can only be completed at one end.
    max - min == 3 && min >= 2
}

fn is_straight_draw(cards: &[u8]) -> bool {
    has_distinct_ranks(cards) && rank_span(cards) <= 4
}

/// Published Let It Ride basic strategy.
pub struct BasicStrategy;

impl BasicStrategy {
    fn first(hole: &[u8; 3]) -> Decision {
        if is_paying(hole) || is_strong_straight_flush_draw(hole) {
            Decision::Ride
        } else {
            Decision::Pull
        }
    }

    fn second(cards: &[u8]) -> Decision {
        if is_paying(cards) || is_suited(cards) || is_outside_straight_draw(cards) {
            return Decision::Ride;
        }
        if cards.iter().all(|&c| is_high(c)) && is_straight_draw(cards) {
            return Decision::Ride;
        }
        Decision::Pull
    }
}

impl Strategy for BasicStrategy {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn decide_first(&self, observation: &Observation) -> Decision {
        Self::first(observation.hole)
    }

    fn decide_second(&self, observation: &Observation) -> Decision {
        let (cards, len) = observation.visible();
        Self::second(&cards[..len])
    }
}

/// Rides only with a hand that already pays.
pub struct ConservativeStrategy;

impl Strategy for ConservativeStrategy {
    fn name(&self) -> &'static str {
        "conservative"
    }

    fn decide_first(&self, observation: &Observation) -> Decision {
        if is_paying(observation.hole) {
            Decision::Ride
        } else {
            Decision::Pull
        }
    }

    fn decide_second(&self, observation: &Observation) -> Decision {
        let (cards, len) = observation.visible();
        if is_paying(&cards[..len]) {
            Decision::Ride
        } else {
            Decision::Pull
        }
    }
}

/// Basic strategy that also rides any three suited cards and any four to a
/// straight.
pub struct AggressiveStrategy;

impl Strategy for AggressiveStrategy {
    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn decide_first(&self, observation: &Observation) -> Decision {
        if is_suited(observation.hole) {
            return Decision::Ride;
        }
        BasicStrategy::first(observation.hole)
    }

    fn decide_second(&self, observation: &Observation) -> Decision {
        let (cards, len) = observation.visible();
        let cards = &cards[..len];
        if is_straight_draw(cards) {
            return Decision::Ride;
        }
        BasicStrategy::second(cards)
    }
}

pub struct AlwaysPull;

impl Strategy for AlwaysPull {
    fn name(&self) -> &'static str {
        "always_pull"
    }

    fn decide_first(&self, _observation: &Observation) -> Decision {
        Decision::Pull
    }

    fn decide_second(&self, _observation: &Observation) -> Decision {
        Decision::Pull
    }
}

pub struct AlwaysRide;

impl Strategy for AlwaysRide {
    fn name(&self) -> &'static str {
        "always_ride"
    }

    fn decide_first(&self, _observation: &Observation) -> Decision {
        Decision::Ride
    }

    fn decide_second(&self, _observation: &Observation) -> Decision {
        Decision::Ride
    }
}

/// Build the shared strategy for a configuration variant.
pub fn build_strategy(config: &StrategyConfig) -> Result<Arc<dyn Strategy>, ConfigError> {
    Ok(match config {
        StrategyConfig::Basic => Arc::new(BasicStrategy),
        StrategyConfig::Conservative => Arc::new(ConservativeStrategy),
        StrategyConfig::Aggressive => Arc::new(AggressiveStrategy),
        StrategyConfig::AlwaysPull => Arc::new(AlwaysPull),
        StrategyConfig::AlwaysRide => Arc::new(AlwaysRide),
        StrategyConfig::Custom { .. } => {
            return Err(ConfigError::Unimplemented {
                feature: "custom strategy",
            })
        }
    })
}
