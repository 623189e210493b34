//! Multi-seat table.
//!
//! Every round uses one shuffled deck: burn, three hole cards for each seat
//! still playing (in seat order), then two community cards shared by all of
//! them. Seats that have stopped draw nothing and keep their final state.

use tracing::trace;

use crate::casino::{
    round::{DealtHand, RoundResult},
    Deck, GameError, GameRng,
};
use crate::session::Session;
use letitride_types::UnitResult;

/// One seat's part of a table round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatRound {
    pub seat: usize,
    pub hole: [u8; 3],
    pub result: RoundResult,
}

/// What one table round produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRound {
    pub community: [u8; 2],
    /// Seats that played, in seat order.
    pub seats: Vec<SeatRound>,
}

pub struct TableCoordinator {
    seats: Vec<Session>,
    dealer_discard: u8,
    rounds: u64,
}

impl TableCoordinator {
    pub fn new(seats: Vec<Session>, dealer_discard: u8) -> Self {
        Self {
            seats,
            dealer_discard,
            rounds: 0,
        }
    }

    pub fn seats(&self) -> &[Session] {
        &self.seats
    }

    /// Rounds dealt so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// True once every seat has stopped.
    pub fn is_finished(&self) -> bool {
        self.seats.iter().all(Session::is_stopped)
    }

    pub fn advance_round(&mut self, rng: &mut GameRng) -> Result<TableRound, GameError> {
        if self.is_finished() {
            return Err(GameError::SessionStopped);
        }

        let mut deck = Deck::shuffled(rng);
        deck.burn(self.dealer_discard as usize)?;

        let mut holes = Vec::with_capacity(self.seats.len());
        for (seat, session) in self.seats.iter().enumerate() {
            if !session.is_stopped() {
                holes.push((seat, deck.draw_n::<3>()?));
            }
        }
        let community = deck.draw_n::<2>()?;

        let mut seats = Vec::with_capacity(holes.len());
        for (seat, hole) in holes {
            let hand = DealtHand { hole, community };
            let result = self.seats[seat].play_round(&hand)?;
            seats.push(SeatRound { seat, hole, result });
        }
        self.rounds += 1;
        trace!(
            round = self.rounds,
            active = seats.len(),
            "table round resolved"
        );

        Ok(TableRound { community, seats })
    }

    /// One result per seat, in seat order.
    pub fn into_results(self, unit_index: u64, unit_seed: u64) -> Vec<UnitResult> {
        let seats_per_unit = self.seats.len() as u64;
        self.seats
            .into_iter()
            .map(|session| session.finish(unit_index, unit_seed, seats_per_unit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks;
    use letitride_types::{StopReason, StrategyConfig};
    use std::collections::HashSet;

    #[test]
    fn test_deal_order_and_shared_community() {
        let mut config = mocks::always_pull_config(500, 5, 20);
        config.seats = 6;
        config.dealer_discard = Some(4);
        let factory = mocks::factory(config);
        let mut table = factory.table();
        let mut rng = GameRng::new(8);

        let mut expected = Deck::shuffled(&mut rng.clone());
        expected.burn(4).unwrap();

        let round = table.advance_round(&mut rng).unwrap();
        assert_eq!(round.seats.len(), 6);
        for (seat, played) in round.seats.iter().enumerate() {
            assert_eq!(played.seat, seat);
            assert_eq!(played.hole, expected.draw_n::<3>().unwrap());
        }
        assert_eq!(round.community, expected.draw_n::<2>().unwrap());

        let mut seen = HashSet::new();
        for played in &round.seats {
            for card in played.hole {
                assert!(seen.insert(card));
            }
        }
        for card in round.community {
            assert!(seen.insert(card));
        }
        assert_eq!(seen.len(), 20);
        assert_eq!(table.rounds(), 1);
    }

    #[test]
    fn test_stopped_seats_draw_nothing() {
        let config = mocks::always_pull_config(500, 5, 10);
        let broke = mocks::always_pull_config(14, 5, 10);
        let seats = vec![
            mocks::session(0, broke),
            mocks::session(1, config.clone()),
            mocks::session(2, config),
        ];
        assert!(seats[0].is_stopped());
        let mut table = TableCoordinator::new(seats, 0);
        let mut rng = GameRng::new(17);

        let mut expected = Deck::shuffled(&mut rng.clone());
        let round = table.advance_round(&mut rng).unwrap();
        assert_eq!(round.seats.len(), 2);
        assert_eq!(round.seats[0].seat, 1);
        assert_eq!(round.seats[0].hole, expected.draw_n::<3>().unwrap());
        assert_eq!(round.seats[1].seat, 2);
        assert_eq!(round.seats[1].hole, expected.draw_n::<3>().unwrap());
        assert_eq!(round.community, expected.draw_n::<2>().unwrap());

        let results = table.into_results(4, 1);
        assert_eq!(results[0].rounds_played, 0);
        assert_eq!(results[0].stop_reason, StopReason::InsufficientFunds);
        assert_eq!(results[1].rounds_played, 1);
    }

    #[test]
    fn test_runs_until_every_seat_stops() {
        let mut config = mocks::always_pull_config(500, 5, 3);
        config.seats = 3;
        config.seat_strategies = Some(vec![
            StrategyConfig::AlwaysPull,
            StrategyConfig::AlwaysRide,
            StrategyConfig::Basic,
        ]);
        let factory = mocks::factory(config);
        let mut table = factory.table();
        let mut rng = GameRng::new(21);

        while !table.is_finished() {
            table.advance_round(&mut rng).unwrap();
        }
        assert_eq!(table.rounds(), 3);
        assert_eq!(
            table.advance_round(&mut rng),
            Err(GameError::SessionStopped)
        );

        let results = table.into_results(2, 99);
        assert_eq!(results.len(), 3);
        for (seat, result) in results.iter().enumerate() {
            assert_eq!(result.seat, seat as u64);
            assert_eq!(result.composite_id, 2 * 3 + seat as u64);
            assert_eq!(result.unit_seed, 99);
            assert_eq!(result.stop_reason, StopReason::MaxRounds);
        }
    }

    #[test]
    fn test_early_stop_keeps_result() {
        let mut config = mocks::always_pull_config(500, 5, 10);
        config.seats = 2;
        config.stop.loss_limit = Some(1);
        config.seat_strategies = Some(vec![StrategyConfig::AlwaysPull, StrategyConfig::Basic]);
        let factory = mocks::factory(config);
        let mut table = factory.table();
        let mut rng = GameRng::new(3);

        let mut played = [0u64; 2];
        while !table.is_finished() {
            let round = table.advance_round(&mut rng).unwrap();
            for seat in &round.seats {
                played[seat.seat] += 1;
            }
        }
        let results = table.into_results(0, 3);
        for seat in 0..2 {
            assert_eq!(results[seat].rounds_played, played[seat]);
            assert_ne!(results[seat].stop_reason, StopReason::None);
        }
    }
}
