//! Betting progressions.
//!
//! A betting system sizes each of the three base bets for the next round and
//! learns from the net result of the round just played. Systems are stateful,
//! so every session gets its own instance from a [BettingFactory].

use letitride_types::{BettingSystemConfig, ConfigError};

pub trait BettingSystem: Send {
    /// Size of each base bet for the next round.
    fn next_wager(&self) -> u64;

    /// Record the net result of a round (positive win, negative loss, zero push).
    fn record_result(&mut self, net_change: i64);
}

fn cap(wager: u64, max_wager: Option<u64>) -> u64 {
    match max_wager {
        Some(max) => wager.min(max),
        None => wager,
    }
}

/// Same wager every round.
pub struct Flat {
    wager: u64,
}

impl BettingSystem for Flat {
    fn next_wager(&self) -> u64 {
        self.wager
    }

    fn record_result(&mut self, _net_change: i64) {}
}

/// Multiply after a loss, back to base after a win.
pub struct Martingale {
    base: u64,
    current: u64,
    multiplier: u64,
    max_wager: Option<u64>,
}

impl BettingSystem for Martingale {
    fn next_wager(&self) -> u64 {
        self.current
    }

    fn record_result(&mut self, net_change: i64) {
        if net_change < 0 {
            self.current = cap(self.current.saturating_mul(self.multiplier), self.max_wager);
        } else if net_change > 0 {
            self.current = self.base;
        }
    }
}

/// Double after a win until `max_streak` wins in a row, back to base after a
/// loss or a completed streak.
pub struct Paroli {
    base: u64,
    current: u64,
    streak: u32,
    max_streak: u32,
}

impl BettingSystem for Paroli {
    fn next_wager(&self) -> u64 {
        self.current
    }

    fn record_result(&mut self, net_change: i64) {
        if net_change > 0 {
            self.streak += 1;
            if self.streak >= self.max_streak {
                self.streak = 0;
                self.current = self.base;
            } else {
                self.current = self.current.saturating_mul(2);
            }
        } else if net_change < 0 {
            self.streak = 0;
            self.current = self.base;
        }
    }
}

/// Add a step after a loss, remove one after a win (never below base).
pub struct Dalembert {
    base: u64,
    current: u64,
    step: u64,
    max_wager: Option<u64>,
}

impl BettingSystem for Dalembert {
    fn next_wager(&self) -> u64 {
        self.current
    }

    fn record_result(&mut self, net_change: i64) {
        if net_change < 0 {
            self.current = cap(self.current.saturating_add(self.step), self.max_wager);
        } else if net_change > 0 {
            self.current = self.current.saturating_sub(self.step).max(self.base);
        }
    }
}

/// Bet `base * fib(n)`: one step forward after a loss, two back after a win.
pub struct Fibonacci {
    base: u64,
    // Position in 1, 1, 2, 3, 5, ...
    index: usize,
    max_wager: Option<u64>,
}

impl Fibonacci {
    fn term(index: usize) -> u64 {
        let (mut a, mut b) = (1u64, 1u64);
        for _ in 0..index {
            let next = a.saturating_add(b);
            a = b;
            b = next;
        }
        a
    }
}

impl BettingSystem for Fibonacci {
    fn next_wager(&self) -> u64 {
        cap(self.base.saturating_mul(Self::term(self.index)), self.max_wager)
    }

    fn record_result(&mut self, net_change: i64) {
        if net_change < 0 {
            // Stop walking once the cap is reached
            if self.max_wager.map_or(true, |max| self.next_wager() < max) {
                self.index += 1;
            }
        } else if net_change > 0 {
            self.index = self.index.saturating_sub(2);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Plan {
    Flat,
    Martingale {
        multiplier: u64,
        max_wager: Option<u64>,
    },
    Paroli {
        max_streak: u32,
    },
    Dalembert {
        step: u64,
        max_wager: Option<u64>,
    },
    Fibonacci {
        max_wager: Option<u64>,
    },
}

/// Builds fresh betting systems. Holds only the base wager and the resolved
/// configuration, so it can be shared freely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BettingFactory {
    wager: u64,
    plan: Plan,
}

impl BettingFactory {
    pub fn new(wager: u64, config: &BettingSystemConfig) -> Result<Self, ConfigError> {
        let plan = match config {
            BettingSystemConfig::Flat => Plan::Flat,
            BettingSystemConfig::Martingale {
                multiplier,
                max_wager,
            } => Plan::Martingale {
                multiplier: *multiplier,
                max_wager: *max_wager,
            },
            BettingSystemConfig::Paroli { max_streak } => Plan::Paroli {
                max_streak: *max_streak,
            },
            BettingSystemConfig::Dalembert { step, max_wager } => Plan::Dalembert {
                step: *step,
                max_wager: *max_wager,
            },
            BettingSystemConfig::Fibonacci { max_wager } => Plan::Fibonacci {
                max_wager: *max_wager,
            },
            BettingSystemConfig::Custom { .. } => {
                return Err(ConfigError::Unimplemented {
                    feature: "custom betting system",
                })
            }
        };
        Ok(Self { wager, plan })
    }

    pub fn base_wager(&self) -> u64 {
        self.wager
    }

    /// A new instance in its initial state.
    pub fn build(&self) -> Box<dyn BettingSystem> {
        let base = self.wager;
        match self.plan {
            Plan::Flat => Box::new(Flat { wager: base }),
            Plan::Martingale {
                multiplier,
                max_wager,
            } => Box::new(Martingale {
                base,
                current: base,
                multiplier,
                max_wager,
            }),
            Plan::Paroli { max_streak } => Box::new(Paroli {
                base,
                current: base,
                streak: 0,
                max_streak,
            }),
            Plan::Dalembert { step, max_wager } => Box::new(Dalembert {
                base,
                current: base,
                step,
                max_wager,
            }),
            Plan::Fibonacci { max_wager } => Box::new(Fibonacci {
                base,
                index: 0,
                max_wager,
            }),
        }
    }
}
