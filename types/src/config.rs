use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

/// Maximum number of seats at a shared table.
pub const MAX_SEATS: usize = 6;

/// Cards in a fresh deck.
pub const DECK_SIZE: usize = 52;

/// Hole cards dealt to every seat.
pub const HOLE_CARDS: usize = 3;

/// Community cards shared by every seat.
pub const COMMUNITY_CARDS: usize = 2;

/// Equal base bets placed before every round.
pub const BASE_BETS: u64 = 3;

/// Default bound on rounds for a unit with no `max_rounds`.
pub const MAX_ROUNDS_PER_UNIT: u64 = 1_000_000;

/// Decision strategies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Published Let It Ride basic strategy.
    #[default]
    Basic,
    /// Ride only with a hand that already pays.
    Conservative,
    /// Basic strategy plus suited and straight draws.
    Aggressive,
    AlwaysPull,
    AlwaysRide,
    /// User supplied rule tables (not supported yet).
    Custom {
        #[serde(default)]
        rules: Vec<String>,
    },
}

/// Betting progressions. Every wager is the size of each of the three base bets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BettingSystemConfig {
    #[default]
    Flat,
    /// Multiply the wager after each losing round, reset after a win.
    Martingale {
        #[serde(default = "default_martingale_multiplier")]
        multiplier: u64,
        #[serde(default)]
        max_wager: Option<u64>,
    },
    /// Double after each win up to `max_streak` wins, reset after a loss.
    Paroli {
        #[serde(default = "default_paroli_streak")]
        max_streak: u32,
    },
    /// Add `step` after a loss, subtract it after a win.
    Dalembert {
        #[serde(default = "default_dalembert_step")]
        step: u64,
        #[serde(default)]
        max_wager: Option<u64>,
    },
    /// Walk the Fibonacci sequence forward on losses, back two steps on wins.
    Fibonacci {
        #[serde(default)]
        max_wager: Option<u64>,
    },
    /// Expression driven progression (not supported yet).
    Custom {
        #[serde(default)]
        expression: String,
    },
}

/// Three Card Bonus side bet policies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BonusStrategyConfig {
    #[default]
    Never,
    Always {
        amount: u64,
    },
    /// Bet after `streak` consecutive losing rounds.
    AfterLosses {
        amount: u64,
        streak: u32,
    },
    /// Bet only while the session is in profit.
    WhenAhead {
        amount: u64,
    },
}

/// Main game paytables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaytableId {
    #[default]
    Standard,
    Reduced,
    Generous,
}

/// Three Card Bonus paytables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusPaytableId {
    MiniRoyal,
    Classic,
    HighTrips,
    /// Meter-based progressive (not supported yet).
    Progressive,
}

/// Session stop thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLimits {
    /// Stop once the session is up by at least this much.
    #[serde(default)]
    pub win_limit: Option<u64>,
    /// Stop once the session is down by at least this much.
    #[serde(default)]
    pub loss_limit: Option<u64>,
    #[serde(default)]
    pub max_rounds: Option<u64>,
    #[serde(default = "default_true")]
    pub stop_on_insufficient_funds: bool,
    /// Rounds after which a unit without `max_rounds` is aborted.
    #[serde(default)]
    pub round_limit: Option<u64>,
}

impl Default for StopLimits {
    fn default() -> Self {
        Self {
            win_limit: None,
            loss_limit: None,
            max_rounds: Some(100),
            stop_on_insufficient_funds: true,
            round_limit: None,
        }
    }
}

/// Raw run configuration, as read from YAML.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub bankroll: u64,
    pub wager: u64,
    #[serde(default)]
    pub stop: StopLimits,
    #[serde(default = "default_seats")]
    pub seats: usize,
    #[serde(default)]
    pub dealer_discard: Option<u8>,
    #[serde(default)]
    pub master_seed: Option<u64>,
    pub units: u64,
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub seat_strategies: Option<Vec<StrategyConfig>>,
    #[serde(default)]
    pub betting: BettingSystemConfig,
    #[serde(default)]
    pub bonus: BonusStrategyConfig,
    #[serde(default)]
    pub paytable: PaytableId,
    #[serde(default)]
    pub bonus_paytable: Option<BonusPaytableId>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bankroll: 500,
            wager: 5,
            stop: StopLimits::default(),
            seats: default_seats(),
            dealer_discard: None,
            master_seed: None,
            units: 1_000,
            workers: None,
            strategy: StrategyConfig::default(),
            seat_strategies: None,
            betting: BettingSystemConfig::default(),
            bonus: BonusStrategyConfig::default(),
            paytable: PaytableId::default(),
            bonus_paytable: None,
            log_level: default_log_level(),
        }
    }
}

/// Broad classification of configuration failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Unimplemented,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("seats must be between 1 and 6 (got {0})")]
    InvalidSeats(usize),
    #[error("dealer_discard of {discard} leaves too few cards for {seats} seats")]
    DeckTooSmall { discard: u8, seats: usize },
    #[error("at least one of win_limit, loss_limit or max_rounds must be set")]
    NoStopCondition,
    #[error("seat_strategies has {got} entries but seats is {expected}")]
    SeatStrategyMismatch { expected: usize, got: usize },
    #[error("{field} requires {missing}")]
    MissingSubConfig {
        field: &'static str,
        missing: &'static str,
    },
    #[error("{field} is invalid: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{feature} is not implemented")]
    Unimplemented { feature: &'static str },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Unimplemented { .. } => ErrorKind::Unimplemented,
            _ => ErrorKind::Configuration,
        }
    }
}

/// Run configuration that passed validation. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub bankroll: u64,
    pub wager: u64,
    pub limits: StopLimits,
    /// Rounds a unit may play before it fails: `max_rounds` when set,
    /// otherwise `stop.round_limit` or [MAX_ROUNDS_PER_UNIT].
    pub round_limit: u64,
    pub seats: usize,
    pub dealer_discard: u8,
    /// `None` means the run picks a fresh master seed and is not reproducible.
    pub master_seed: Option<u64>,
    pub units: u64,
    pub workers: usize,
    /// One strategy per seat.
    pub strategies: Vec<StrategyConfig>,
    pub betting: BettingSystemConfig,
    pub bonus: BonusStrategyConfig,
    pub paytable: PaytableId,
    pub bonus_paytable: Option<BonusPaytableId>,
    pub log_level: Level,
}

impl ValidatedConfig {
    pub fn seats_per_unit(&self) -> u64 {
        self.seats as u64
    }

    pub fn strategy_for_seat(&self, seat: usize) -> &StrategyConfig {
        &self.strategies[seat]
    }

    /// Number of results a run produces.
    pub fn result_count(&self) -> u64 {
        self.units.saturating_mul(self.seats_per_unit())
    }
}

fn default_seats() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_martingale_multiplier() -> u64 {
    2
}

fn default_paroli_streak() -> u32 {
    3
}

fn default_dalembert_step() -> u64 {
    1
}

fn require_non_zero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

fn validate_strategy(strategy: &StrategyConfig) -> Result<(), ConfigError> {
    match strategy {
        StrategyConfig::Basic
        | StrategyConfig::Conservative
        | StrategyConfig::Aggressive
        | StrategyConfig::AlwaysPull
        | StrategyConfig::AlwaysRide => Ok(()),
        StrategyConfig::Custom { .. } => Err(ConfigError::Unimplemented {
            feature: "custom strategy",
        }),
    }
}

fn validate_max_wager(max_wager: Option<u64>, wager: u64) -> Result<(), ConfigError> {
    match max_wager {
        Some(max) if max < wager => Err(ConfigError::InvalidParameter {
            field: "betting.max_wager",
            reason: format!("{max} is below the base wager {wager}"),
        }),
        _ => Ok(()),
    }
}

fn validate_betting(betting: &BettingSystemConfig, wager: u64) -> Result<(), ConfigError> {
    match betting {
        BettingSystemConfig::Flat => Ok(()),
        BettingSystemConfig::Martingale {
            multiplier,
            max_wager,
        } => {
            if *multiplier < 2 {
                return Err(ConfigError::InvalidParameter {
                    field: "betting.multiplier",
                    reason: format!("must be at least 2 (got {multiplier})"),
                });
            }
            validate_max_wager(*max_wager, wager)
        }
        BettingSystemConfig::Paroli { max_streak } => {
            require_non_zero("betting.max_streak", *max_streak as u64)
        }
        BettingSystemConfig::Dalembert { step, max_wager } => {
            require_non_zero("betting.step", *step)?;
            validate_max_wager(*max_wager, wager)
        }
        BettingSystemConfig::Fibonacci { max_wager } => validate_max_wager(*max_wager, wager),
        BettingSystemConfig::Custom { .. } => Err(ConfigError::Unimplemented {
            feature: "custom betting system",
        }),
    }
}

fn validate_bonus(
    bonus: &BonusStrategyConfig,
    paytable: Option<BonusPaytableId>,
) -> Result<(), ConfigError> {
    if let Some(BonusPaytableId::Progressive) = paytable {
        return Err(ConfigError::Unimplemented {
            feature: "progressive bonus paytable",
        });
    }
    match bonus {
        BonusStrategyConfig::Never => return Ok(()),
        BonusStrategyConfig::Always { amount } | BonusStrategyConfig::WhenAhead { amount } => {
            require_non_zero("bonus.amount", *amount)?;
        }
        BonusStrategyConfig::AfterLosses { amount, streak } => {
            require_non_zero("bonus.amount", *amount)?;
            require_non_zero("bonus.streak", *streak as u64)?;
        }
    }
    if paytable.is_none() {
        return Err(ConfigError::MissingSubConfig {
            field: "bonus",
            missing: "bonus_paytable",
        });
    }
    Ok(())
}

impl Config {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        require_non_zero("bankroll", self.bankroll)?;
        require_non_zero("wager", self.wager)?;
        require_non_zero("units", self.units)?;
        if let Some(workers) = self.workers {
            require_non_zero("workers", workers as u64)?;
        }
        if self.seats == 0 || self.seats > MAX_SEATS {
            return Err(ConfigError::InvalidSeats(self.seats));
        }

        let dealer_discard = self.dealer_discard.unwrap_or(0);
        let needed = dealer_discard as usize + HOLE_CARDS * self.seats + COMMUNITY_CARDS;
        if needed > DECK_SIZE {
            return Err(ConfigError::DeckTooSmall {
                discard: dealer_discard,
                seats: self.seats,
            });
        }

        if self.stop.win_limit.is_none()
            && self.stop.loss_limit.is_none()
            && self.stop.max_rounds.is_none()
        {
            return Err(ConfigError::NoStopCondition);
        }
        let limits = [
            ("stop.win_limit", self.stop.win_limit),
            ("stop.loss_limit", self.stop.loss_limit),
            ("stop.max_rounds", self.stop.max_rounds),
            ("stop.round_limit", self.stop.round_limit),
        ];
        for (field, limit) in limits {
            if let Some(value) = limit {
                require_non_zero(field, value)?;
            }
        }
        let round_limit = self
            .stop
            .max_rounds
            .unwrap_or(self.stop.round_limit.unwrap_or(MAX_ROUNDS_PER_UNIT));

        let strategies = match self.seat_strategies {
            Some(strategies) => {
                if strategies.len() != self.seats {
                    return Err(ConfigError::SeatStrategyMismatch {
                        expected: self.seats,
                        got: strategies.len(),
                    });
                }
                strategies
            }
            None => vec![self.strategy.clone(); self.seats],
        };
        for strategy in &strategies {
            validate_strategy(strategy)?;
        }
        validate_betting(&self.betting, self.wager)?;
        validate_bonus(&self.bonus, self.bonus_paytable)?;

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            bankroll: self.bankroll,
            wager: self.wager,
            limits: self.stop,
            round_limit,
            seats: self.seats,
            dealer_discard,
            master_seed: self.master_seed,
            units: self.units,
            workers: self.workers.unwrap_or(1),
            strategies,
            betting: self.betting,
            bonus: self.bonus,
            paytable: self.paytable,
            bonus_paytable: self.bonus_paytable,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
bankroll: 500
wager: 5
units: 4
seats: 6
master_seed: 42
stop:
  max_rounds: 10
  loss_limit: 200
strategy:
  type: basic
betting:
  type: martingale
  max_wager: 40
bonus:
  type: always
  amount: 1
bonus_paytable: mini_royal
paytable: standard
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.bankroll, 500);
        assert_eq!(config.seats, 6);
        assert_eq!(
            config.betting,
            BettingSystemConfig::Martingale {
                multiplier: 2,
                max_wager: Some(40)
            }
        );
        assert!(config.stop.stop_on_insufficient_funds);

        let validated = config.validate().unwrap();
        assert_eq!(validated.strategies.len(), 6);
        assert_eq!(validated.seats_per_unit(), 6);
        assert_eq!(validated.result_count(), 24);
        assert_eq!(validated.workers, 1);
        assert_eq!(validated.log_level, Level::INFO);
    }

    #[test]
    fn test_unknown_identifiers_rejected() {
        let source = "bankroll: 500\nwager: 5\nunits: 1\npaytable: house_special\n";
        assert!(matches!(
            Config::from_yaml(source),
            Err(ConfigError::Parse(_))
        ));

        let source = "bankroll: 500\nwager: 5\nunits: 1\nstrategy:\n  type: gut_feeling\n";
        assert!(matches!(
            Config::from_yaml(source),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_fields_rejected() {
        let config = Config {
            wager: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNonZero { field: "wager", .. })
        ));

        let config = Config {
            workers: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNonZero {
                field: "workers",
                ..
            })
        ));

        let limits = [
            (
                "stop.max_rounds",
                StopLimits {
                    max_rounds: Some(0),
                    ..StopLimits::default()
                },
            ),
            (
                "stop.win_limit",
                StopLimits {
                    win_limit: Some(0),
                    ..StopLimits::default()
                },
            ),
            (
                "stop.loss_limit",
                StopLimits {
                    loss_limit: Some(0),
                    ..StopLimits::default()
                },
            ),
            (
                "stop.round_limit",
                StopLimits {
                    max_rounds: None,
                    win_limit: Some(100),
                    round_limit: Some(0),
                    ..StopLimits::default()
                },
            ),
        ];
        for (field, stop) in limits {
            let config = Config {
                stop,
                ..Config::default()
            };
            match config.validate() {
                Err(ConfigError::InvalidNonZero { field: got, value }) => {
                    assert_eq!(got, field);
                    assert_eq!(value, 0);
                }
                other => panic!("{field}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_round_limit() {
        // max_rounds doubles as the guard
        let validated = Config::default().validate().unwrap();
        assert_eq!(validated.round_limit, 100);

        let config = Config {
            stop: StopLimits {
                max_rounds: None,
                win_limit: Some(50),
                ..StopLimits::default()
            },
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap().round_limit, MAX_ROUNDS_PER_UNIT);

        let source = "bankroll: 500\nwager: 5\nunits: 1\nstop:\n  win_limit: 50\n  round_limit: 2000\n";
        let config = Config::from_yaml(source).unwrap();
        assert_eq!(config.stop.max_rounds, None);
        assert_eq!(config.validate().unwrap().round_limit, 2_000);
    }

    #[test]
    fn test_seat_bounds() {
        for seats in [0, 7] {
            let config = Config {
                seats,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidSeats(s)) if s == seats));
        }
    }

    #[test]
    fn test_deck_too_small() {
        // 6 seats need 20 cards, so at most 32 may be burned.
        let ok = Config {
            seats: 6,
            dealer_discard: Some(32),
            ..Config::default()
        };
        assert!(ok.validate().is_ok());

        let too_many = Config {
            seats: 6,
            dealer_discard: Some(33),
            ..Config::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::DeckTooSmall { .. })
        ));
    }

    #[test]
    fn test_requires_stop_condition() {
        let config = Config {
            stop: StopLimits {
                win_limit: None,
                loss_limit: None,
                max_rounds: None,
                stop_on_insufficient_funds: true,
                round_limit: None,
            },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoStopCondition)
        ));
    }

    #[test]
    fn test_seat_strategy_mismatch() {
        let config = Config {
            seats: 3,
            seat_strategies: Some(vec![StrategyConfig::Basic, StrategyConfig::AlwaysPull]),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeatStrategyMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_bonus_requires_paytable() {
        let config = Config {
            bonus: BonusStrategyConfig::Always { amount: 5 },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSubConfig { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_unimplemented_is_distinct_kind() {
        let config = Config {
            strategy: StrategyConfig::Custom { rules: vec![] },
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Unimplemented);

        let config = Config {
            betting: BettingSystemConfig::Custom {
                expression: "wager * 2".to_string(),
            },
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Unimplemented);

        let config = Config {
            bonus: BonusStrategyConfig::Always { amount: 5 },
            bonus_paytable: Some(BonusPaytableId::Progressive),
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Unimplemented);
    }

    #[test]
    fn test_betting_parameters() {
        let config = Config {
            betting: BettingSystemConfig::Martingale {
                multiplier: 1,
                max_wager: None,
            },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));

        let config = Config {
            wager: 10,
            betting: BettingSystemConfig::Fibonacci { max_wager: Some(5) },
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel { .. })
        ));
    }
}
