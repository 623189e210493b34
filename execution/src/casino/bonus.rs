//! Three Card Bonus side bet policies.

use std::sync::Arc;

use letitride_types::{BonusStrategyConfig, ConfigError};

/// Session state a bonus policy may look at before a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BonusContext {
    pub bankroll: u64,
    pub rounds_played: u64,
    pub consecutive_losses: u64,
    /// Bankroll change since the session started.
    pub session_net: i64,
}

pub trait BonusStrategy: Send + Sync {
    /// Side bet for the next round (zero for none).
    fn bonus_wager(&self, context: &BonusContext) -> u64;
}

pub struct Never;

impl BonusStrategy for Never {
    fn bonus_wager(&self, _context: &BonusContext) -> u64 {
        0
    }
}

pub struct Always {
    amount: u64,
}

impl BonusStrategy for Always {
    fn bonus_wager(&self, _context: &BonusContext) -> u64 {
        self.amount
    }
}

/// Bet once the session has lost `streak` rounds in a row.
pub struct AfterLosses {
    amount: u64,
    streak: u64,
}

impl BonusStrategy for AfterLosses {
    fn bonus_wager(&self, context: &BonusContext) -> u64 {
        if context.consecutive_losses >= self.streak {
            self.amount
        } else {
            0
        }
    }
}

/// Bet only while the session is in profit.
pub struct WhenAhead {
    amount: u64,
}

impl BonusStrategy for WhenAhead {
    fn bonus_wager(&self, context: &BonusContext) -> u64 {
        if context.session_net > 0 {
            self.amount
        } else {
            0
        }
    }
}

pub fn build_bonus_strategy(
    config: &BonusStrategyConfig,
) -> Result<Arc<dyn BonusStrategy>, ConfigError> {
    Ok(match *config {
        BonusStrategyConfig::Never => Arc::new(Never),
        BonusStrategyConfig::Always { amount } => Arc::new(Always { amount }),
        BonusStrategyConfig::AfterLosses { amount, streak } => Arc::new(AfterLosses {
            amount,
            streak: streak as u64,
        }),
        BonusStrategyConfig::WhenAhead { amount } => Arc::new(WhenAhead { amount }),
    })
}
