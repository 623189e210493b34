//! Let It Ride game logic.
//!
//! This module contains everything needed to play a single round:
//! - Deterministic randomness and the per-round deck
//! - Five and three card evaluators
//! - Paytables
//! - Decision strategies, betting systems and bonus policies
//! - The round resolver

pub mod betting;
pub mod bonus;
pub mod cards;
pub mod hands;
pub mod paytable;
pub mod round;
pub mod strategy;

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use thiserror::Error;

use self::cards::CARD_COUNT;
use self::round::RoundPhase;

const STREAM_NAMESPACE: &[u8] = b"_LETITRIDE_UNIT_STREAM";

/// Deterministic random number generator owned by exactly one unit.
///
/// Uses SHA256 hash chains seeded from a unit seed, so a stream depends on
/// nothing but that seed.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a unit seed.
    pub fn new(unit_seed: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(STREAM_NAMESPACE);
        hasher.update(&unit_seed.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_byte()
    }

    /// Get a random u64 value.
    pub fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        for byte in bytes.iter_mut() {
            *byte = self.next_byte();
        }
        u64::from_be_bytes(bytes)
    }

    /// Get a random f64 value in range [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_u8();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Create a shuffled deck of 52 cards.
    /// Cards are 0-51: suit = card/13, rank = card%13.
    pub fn create_deck(&mut self) -> Vec<u8> {
        let mut deck: Vec<u8> = (0..CARD_COUNT).collect();
        self.shuffle(&mut deck);
        deck
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_bounded((i + 1) as u8) as usize;
            slice.swap(i, j);
        }
    }
}

/// Shuffled cards for one round. Cards are dealt from the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    // Top of the deck is the end of the vector.
    cards: Vec<u8>,
}

impl Deck {
    /// Shuffle a fresh deck from the unit stream.
    pub fn shuffled(rng: &mut GameRng) -> Self {
        Self {
            cards: rng.create_deck(),
        }
    }

    /// Build a stacked deck where `top[0]` is dealt first.
    #[cfg(test)]
    pub fn from_top(top: &[u8]) -> Self {
        Self {
            cards: top.iter().rev().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Dealer discard before the deal.
    pub fn burn(&mut self, count: usize) -> Result<(), GameError> {
        if count > self.cards.len() {
            return Err(GameError::DeckExhausted);
        }
        self.cards.truncate(self.cards.len() - count);
        Ok(())
    }

    pub fn draw(&mut self) -> Result<u8, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    pub fn draw_n<const N: usize>(&mut self) -> Result<[u8; N], GameError> {
        let mut out = [0u8; N];
        for card in out.iter_mut() {
            *card = self.draw()?;
        }
        Ok(out)
    }
}

/// Error during round resolution. Any of these aborts the owning unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid card value {0}")]
    InvalidCard(u8),
    #[error("card {0} dealt twice")]
    DuplicateCard(u8),
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("invalid round transition from {from:?} to {to:?}")]
    InvalidTransition { from: RoundPhase, to: RoundPhase },
    #[error("bonus wager placed without a bonus paytable")]
    MissingBonusPaytable,
    #[error("session has already stopped")]
    SessionStopped,
    #[error("unit exceeded {0} rounds without stopping")]
    RoundLimitExceeded(u64),
}
