//! Single-seat session.
//!
//! A session plays rounds until a stop condition fires. Stop conditions are
//! checked after each round's result is applied, in this order:
//! insufficient funds, loss limit, win limit, max rounds.

use std::sync::Arc;

use tracing::debug;

use crate::casino::{
    betting::BettingSystem,
    bonus::{BonusContext, BonusStrategy},
    paytable::Paytables,
    round::{DealtHand, RoundResolver, RoundResult},
    strategy::Strategy,
    GameError, GameRng,
};
use letitride_types::{
    composite_id, RoundAggregates, StopLimits, StopReason, UnitResult, ValidatedConfig, BASE_BETS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Stopped(StopReason),
}

/// Wagers committed to the next round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stake {
    /// Size of each base bet.
    pub wager: u64,
    pub bonus: u64,
}

impl Stake {
    pub fn total(&self) -> u64 {
        self.wager.saturating_mul(BASE_BETS).saturating_add(self.bonus)
    }
}

fn apply_net(bankroll: u64, net: i64) -> u64 {
    if net >= 0 {
        bankroll.saturating_add(net as u64)
    } else {
        bankroll.saturating_sub(net.unsigned_abs())
    }
}

fn signed_delta(to: u64, from: u64) -> i64 {
    if to >= from {
        i64::try_from(to - from).unwrap_or(i64::MAX)
    } else {
        i64::try_from(from - to).map_or(i64::MIN, |v| -v)
    }
}

pub struct Session {
    seat: usize,
    starting_bankroll: u64,
    bankroll: u64,
    limits: StopLimits,
    dealer_discard: u8,

    strategy: Arc<dyn Strategy>,
    betting: Box<dyn BettingSystem>,
    bonus: Arc<dyn BonusStrategy>,
    paytables: Arc<Paytables>,

    phase: SessionPhase,
    stake: Stake,
    rounds_played: u64,
    consecutive_losses: u64,
    aggregates: RoundAggregates,
}

impl Session {
    /// Open a session. A starting bankroll that cannot cover the first round
    /// stops the session before any round is played.
    pub fn new(
        seat: usize,
        config: &ValidatedConfig,
        strategy: Arc<dyn Strategy>,
        betting: Box<dyn BettingSystem>,
        bonus: Arc<dyn BonusStrategy>,
        paytables: Arc<Paytables>,
    ) -> Self {
        let mut session = Self {
            seat,
            starting_bankroll: config.bankroll,
            bankroll: config.bankroll,
            limits: config.limits,
            dealer_discard: config.dealer_discard,
            strategy,
            betting,
            bonus,
            paytables,
            phase: SessionPhase::Active,
            stake: Stake::default(),
            rounds_played: 0,
            consecutive_losses: 0,
            aggregates: RoundAggregates {
                peak_bankroll: config.bankroll,
                lowest_bankroll: config.bankroll,
                ..RoundAggregates::default()
            },
        };
        match session.plan_stake() {
            Some(stake) => session.stake = stake,
            None => session.stop(StopReason::InsufficientFunds),
        }
        session
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn bankroll(&self) -> u64 {
        self.bankroll
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, SessionPhase::Stopped(_))
    }

    /// Stake for the next round (meaningless once stopped).
    pub fn stake(&self) -> Stake {
        self.stake
    }

    fn context(&self) -> BonusContext {
        BonusContext {
            bankroll: self.bankroll,
            rounds_played: self.rounds_played,
            consecutive_losses: self.consecutive_losses,
            session_net: signed_delta(self.bankroll, self.starting_bankroll),
        }
    }

    /// Size the next round, or `None` when the bankroll cannot cover it.
    fn plan_stake(&self) -> Option<Stake> {
        let stake = Stake {
            wager: self.betting.next_wager(),
            bonus: self.bonus.bonus_wager(&self.context()),
        };
        if stake.total() <= self.bankroll {
            return Some(stake);
        }
        if self.limits.stop_on_insufficient_funds {
            return None;
        }

        // Shrink to what the bankroll covers
        let wager = stake.wager.min(self.bankroll / BASE_BETS);
        if wager == 0 {
            return None;
        }
        let bonus = stake.bonus.min(self.bankroll - wager * BASE_BETS);
        Some(Stake { wager, bonus })
    }

    fn stop(&mut self, reason: StopReason) {
        debug!(
            seat = self.seat,
            rounds = self.rounds_played,
            bankroll = self.bankroll,
            ?reason,
            "session stopped"
        );
        self.phase = SessionPhase::Stopped(reason);
    }

    /// Deal and play one round from the session's own stream.
    pub fn advance_round(&mut self, rng: &mut GameRng) -> Result<RoundResult, GameError> {
        if self.is_stopped() {
            return Err(GameError::SessionStopped);
        }
        let result = RoundResolver::new(self.strategy.as_ref(), &self.paytables).resolve(
            rng,
            self.dealer_discard,
            self.stake.wager,
            self.stake.bonus,
        )?;
        self.apply(&result);
        Ok(result)
    }

    /// Play one round with cards dealt by a table.
    pub fn play_round(&mut self, hand: &DealtHand) -> Result<RoundResult, GameError> {
        if self.is_stopped() {
            return Err(GameError::SessionStopped);
        }
        let result = RoundResolver::new(self.strategy.as_ref(), &self.paytables).resolve_dealt(
            hand,
            self.stake.wager,
            self.stake.bonus,
        )?;
        self.apply(&result);
        Ok(result)
    }

    fn apply(&mut self, result: &RoundResult) {
        let net = result.net();
        self.bankroll = apply_net(self.bankroll, net);
        self.rounds_played += 1;
        self.betting.record_result(net);

        let aggregates = &mut self.aggregates;
        aggregates.base_placed = aggregates.base_placed.saturating_add(result.base_placed());
        aggregates.at_risk = aggregates.at_risk.saturating_add(result.at_risk);
        aggregates.main_net = aggregates.main_net.saturating_add(result.main_net);
        aggregates.bonus_wagered = aggregates.bonus_wagered.saturating_add(result.bonus_wager);
        aggregates.bonus_net = aggregates.bonus_net.saturating_add(result.bonus_net);
        aggregates.first_bets_ridden += result.first.rides() as u64;
        aggregates.second_bets_ridden += result.second.rides() as u64;
        aggregates.peak_bankroll = aggregates.peak_bankroll.max(self.bankroll);
        aggregates.lowest_bankroll = aggregates.lowest_bankroll.min(self.bankroll);
        *aggregates.hands.entry(result.hand).or_default() += 1;
        match net {
            n if n > 0 => {
                aggregates.rounds_won += 1;
                self.consecutive_losses = 0;
            }
            n if n < 0 => {
                aggregates.rounds_lost += 1;
                self.consecutive_losses += 1;
                aggregates.longest_losing_streak =
                    aggregates.longest_losing_streak.max(self.consecutive_losses);
            }
            _ => aggregates.rounds_pushed += 1,
        }

        let next = self.plan_stake();
        if let Some(reason) = self.stop_reason(next.is_none()) {
            self.stop(reason);
            return;
        }
        if let Some(stake) = next {
            self.stake = stake;
        }
    }

    fn stop_reason(&self, cannot_cover: bool) -> Option<StopReason> {
        if cannot_cover {
            return Some(StopReason::InsufficientFunds);
        }
        if let Some(limit) = self.limits.loss_limit {
            if self.starting_bankroll.saturating_sub(self.bankroll) >= limit {
                return Some(StopReason::LossLimit);
            }
        }
        if let Some(limit) = self.limits.win_limit {
            if self.bankroll.saturating_sub(self.starting_bankroll) >= limit {
                return Some(StopReason::WinLimit);
            }
        }
        if let Some(limit) = self.limits.max_rounds {
            if self.rounds_played >= limit {
                return Some(StopReason::MaxRounds);
            }
        }
        None
    }

    /// Final record for this seat.
    pub fn finish(self, unit_index: u64, unit_seed: u64, seats_per_unit: u64) -> UnitResult {
        let stop_reason = match self.phase {
            SessionPhase::Stopped(reason) => reason,
            SessionPhase::Active => StopReason::None,
        };
        UnitResult {
            composite_id: composite_id(unit_index, seats_per_unit, self.seat as u64),
            unit_index,
            seat: self.seat as u64,
            unit_seed,
            starting_bankroll: self.starting_bankroll,
            final_bankroll: self.bankroll,
            bankroll_delta: signed_delta(self.bankroll, self.starting_bankroll),
            rounds_played: self.rounds_played,
            stop_reason,
            aggregates: self.aggregates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::{
        betting::BettingFactory,
        bonus::build_bonus_strategy,
        strategy::build_strategy,
    };
    use crate::mocks;
    use letitride_types::{
        BettingSystemConfig, BonusPaytableId, BonusStrategyConfig, Config, FiveCardHand,
        StrategyConfig,
    };

    fn session(config: Config) -> Session {
        let config = mocks::validate(config);
        let strategy = build_strategy(config.strategy_for_seat(0)).unwrap();
        let betting = BettingFactory::new(config.wager, &config.betting)
            .unwrap()
            .build();
        let bonus = build_bonus_strategy(&config.bonus).unwrap();
        let paytables = Arc::new(
            Paytables::new(config.paytable, config.bonus_paytable).unwrap(),
        );
        Session::new(0, &config, strategy, betting, bonus, paytables)
    }

    #[test]
    fn test_max_rounds() {
        let mut session = session(mocks::always_pull_config(500, 5, 10));
        let mut rng = GameRng::new(1);
        while !session.is_stopped() {
            session.advance_round(&mut rng).unwrap();
        }
        assert_eq!(session.rounds_played(), 10);
        assert_eq!(session.phase(), SessionPhase::Stopped(StopReason::MaxRounds));
        assert_eq!(
            session.advance_round(&mut rng),
            Err(GameError::SessionStopped)
        );

        let result = session.finish(3, 77, 1);
        assert_eq!(result.composite_id, 3);
        assert_eq!(result.rounds_played, 10);
        assert_eq!(result.aggregates.base_placed, 150);
        // Always pull leaves only bet three at risk
        assert_eq!(result.aggregates.at_risk, 50);
        assert_eq!(result.aggregates.first_bets_ridden, 0);
        assert_eq!(
            result.aggregates.hands.values().sum::<u64>(),
            result.rounds_played
        );
        assert_eq!(
            result.bankroll_delta,
            result.aggregates.main_net + result.aggregates.bonus_net
        );
    }

    #[test]
    fn test_insufficient_funds_beats_win_limit() {
        // Paroli doubles to 10 after the win, and 3 * 10 > 20.
        let mut config = mocks::always_pull_config(15, 5, 100);
        config.stop.win_limit = Some(5);
        config.betting = BettingSystemConfig::Paroli { max_streak: 3 };
        let mut session = session(config);

        let result = session.play_round(&mocks::paying_hand()).unwrap();
        assert_eq!(result.hand, FiveCardHand::TensOrBetter);
        assert_eq!(result.net(), 5);
        assert_eq!(session.bankroll(), 20);
        assert_eq!(
            session.phase(),
            SessionPhase::Stopped(StopReason::InsufficientFunds)
        );
    }

    #[test]
    fn test_win_limit_beats_max_rounds() {
        let mut config = mocks::always_pull_config(500, 5, 1);
        config.stop.win_limit = Some(5);
        let mut session = session(config);
        session.play_round(&mocks::paying_hand()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Stopped(StopReason::WinLimit));
    }

    #[test]
    fn test_loss_limit_beats_max_rounds() {
        let mut config = mocks::always_pull_config(500, 5, 1);
        config.stop.loss_limit = Some(5);
        let mut session = session(config);
        session.play_round(&mocks::losing_hand()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Stopped(StopReason::LossLimit));
    }

    #[test]
    fn test_unaffordable_start() {
        let session = session(mocks::always_pull_config(14, 5, 10));
        assert!(session.is_stopped());
        let result = session.finish(0, 0, 1);
        assert_eq!(result.rounds_played, 0);
        assert_eq!(result.stop_reason, StopReason::InsufficientFunds);
        assert_eq!(result.bankroll_delta, 0);
    }

    #[test]
    fn test_clamped_wager_without_insufficient_stop() {
        let mut config = mocks::always_pull_config(14, 5, 10);
        config.stop.stop_on_insufficient_funds = false;
        let mut session = session(config);
        assert!(!session.is_stopped());
        assert_eq!(session.stake().wager, 4);

        // Losing 4 leaves 10, which still covers 3 units of 3.
        session.play_round(&mocks::losing_hand()).unwrap();
        assert_eq!(session.bankroll(), 10);
        assert_eq!(session.stake().wager, 3);
    }

    #[test]
    fn test_bonus_wagered() {
        let mut config = mocks::always_pull_config(500, 5, 3);
        config.bonus = BonusStrategyConfig::Always { amount: 1 };
        config.bonus_paytable = Some(BonusPaytableId::MiniRoyal);
        let mut session = session(config);
        assert_eq!(session.stake().total(), 16);

        let mut rng = GameRng::new(5);
        while !session.is_stopped() {
            session.advance_round(&mut rng).unwrap();
        }
        let result = session.finish(0, 5, 1);
        assert_eq!(result.aggregates.bonus_wagered, 3);
        assert_eq!(
            result.bankroll_delta,
            result.aggregates.main_net + result.aggregates.bonus_net
        );
    }

    #[test]
    fn test_streaks_tracked() {
        let mut config = mocks::always_pull_config(500, 5, 10);
        config.strategy = StrategyConfig::AlwaysPull;
        let mut session = session(config);
        session.play_round(&mocks::losing_hand()).unwrap();
        session.play_round(&mocks::losing_hand()).unwrap();
        session.play_round(&mocks::paying_hand()).unwrap();
        session.play_round(&mocks::losing_hand()).unwrap();

        let result = session.finish(0, 0, 1);
        assert_eq!(result.aggregates.rounds_lost, 3);
        assert_eq!(result.aggregates.rounds_won, 1);
        assert_eq!(result.aggregates.longest_losing_streak, 2);
        assert_eq!(result.aggregates.lowest_bankroll, 490);
        assert_eq!(result.aggregates.peak_bankroll, 500);
        assert_eq!(result.final_bankroll, 490);
    }
}
