//! Round resolution.
//!
//! A round walks `Initial -> Decision1 -> Revealed1 -> Decision2 -> Revealed2
//! -> Resolved`. The resolver is a pure function of the dealt cards, the
//! strategy, the paytables and the amounts staked.

use tracing::trace;

use super::{
    cards::is_valid_card,
    hands::{evaluate_five, evaluate_three},
    paytable::Paytables,
    strategy::{Decision, Observation, Strategy},
    Deck, GameError, GameRng,
};
use letitride_types::{FiveCardHand, ThreeCardHand, BASE_BETS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    Initial,
    Decision1,
    Revealed1,
    Decision2,
    Revealed2,
    Resolved,
}

impl RoundPhase {
    fn successor(self) -> Option<RoundPhase> {
        match self {
            RoundPhase::Initial => Some(RoundPhase::Decision1),
            RoundPhase::Decision1 => Some(RoundPhase::Revealed1),
            RoundPhase::Revealed1 => Some(RoundPhase::Decision2),
            RoundPhase::Decision2 => Some(RoundPhase::Revealed2),
            RoundPhase::Revealed2 => Some(RoundPhase::Resolved),
            RoundPhase::Resolved => None,
        }
    }

    /// Move to `to`, which must be the next phase.
    pub fn advance(&mut self, to: RoundPhase) -> Result<(), GameError> {
        if self.successor() != Some(to) {
            return Err(GameError::InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

/// Cards one seat plays with in one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DealtHand {
    pub hole: [u8; 3],
    pub community: [u8; 2],
}

impl DealtHand {
    /// Deal three hole cards then the two community cards.
    pub fn deal(deck: &mut Deck) -> Result<Self, GameError> {
        let hole = deck.draw_n::<3>()?;
        let community = deck.draw_n::<2>()?;
        Ok(Self { hole, community })
    }

    pub fn cards(&self) -> [u8; 5] {
        [
            self.hole[0],
            self.hole[1],
            self.hole[2],
            self.community[0],
            self.community[1],
        ]
    }

    /// Every card is in range and no card appears twice.
    pub fn validate(&self) -> Result<(), GameError> {
        let mut seen = 0u64;
        for card in self.cards() {
            if !is_valid_card(card) {
                return Err(GameError::InvalidCard(card));
            }
            let bit = 1u64 << card;
            if seen & bit != 0 {
                return Err(GameError::DuplicateCard(card));
            }
            seen |= bit;
        }
        Ok(())
    }
}

/// Immutable outcome of one round for one seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundResult {
    /// Size of each base bet.
    pub wager: u64,
    pub bonus_wager: u64,
    pub first: Decision,
    pub second: Decision,
    pub hand: FiveCardHand,
    /// Evaluated only when a bonus was wagered.
    pub bonus_hand: Option<ThreeCardHand>,
    /// Base bets still riding at resolution.
    pub at_risk: u64,
    pub main_net: i64,
    pub bonus_net: i64,
}

impl RoundResult {
    pub fn net(&self) -> i64 {
        self.main_net.saturating_add(self.bonus_net)
    }

    /// Amount placed before any decision.
    pub fn base_placed(&self) -> u64 {
        self.wager.saturating_mul(BASE_BETS)
    }
}

fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Net result of a bet paying `multiplier` to one (or losing on zero).
fn settle(amount: u64, multiplier: u64) -> i64 {
    if multiplier == 0 {
        -to_signed(amount)
    } else {
        to_signed(amount.saturating_mul(multiplier))
    }
}

pub struct RoundResolver<'a> {
    strategy: &'a dyn Strategy,
    paytables: &'a Paytables,
}

impl<'a> RoundResolver<'a> {
    pub fn new(strategy: &'a dyn Strategy, paytables: &'a Paytables) -> Self {
        Self {
            strategy,
            paytables,
        }
    }

    /// Shuffle a fresh deck from the unit stream, burn, deal and resolve.
    pub fn resolve(
        &self,
        rng: &mut GameRng,
        dealer_discard: u8,
        wager: u64,
        bonus_wager: u64,
    ) -> Result<RoundResult, GameError> {
        let mut deck = Deck::shuffled(rng);
        deck.burn(dealer_discard as usize)?;
        let hand = DealtHand::deal(&mut deck)?;
        self.resolve_dealt(&hand, wager, bonus_wager)
    }

    /// Resolve a round with cards dealt elsewhere.
    pub fn resolve_dealt(
        &self,
        hand: &DealtHand,
        wager: u64,
        bonus_wager: u64,
    ) -> Result<RoundResult, GameError> {
        hand.validate()?;
        let bonus_table = match (bonus_wager, self.paytables.bonus) {
            (0, _) => None,
            (_, Some(table)) => Some(table),
            (_, None) => return Err(GameError::MissingBonusPaytable),
        };

        let mut phase = RoundPhase::Initial;

        phase.advance(RoundPhase::Decision1)?;
        let first = self
            .strategy
            .decide_first(&Observation::new(&hand.hole, &[]));

        phase.advance(RoundPhase::Revealed1)?;
        phase.advance(RoundPhase::Decision2)?;
        let second = self
            .strategy
            .decide_second(&Observation::new(&hand.hole, &hand.community[..1]));

        phase.advance(RoundPhase::Revealed2)?;
        let five = evaluate_five(&hand.cards());

        phase.advance(RoundPhase::Resolved)?;
        // Bet 3 always rides
        let riding = 1 + first.rides() as u64 + second.rides() as u64;
        let at_risk = wager.saturating_mul(riding);
        let main_net = settle(at_risk, self.paytables.main.multiplier(five));

        let (bonus_hand, bonus_net) = match bonus_table {
            Some(table) => {
                let three = evaluate_three(&hand.hole);
                (Some(three), settle(bonus_wager, table.multiplier(three)))
            }
            None => (None, 0),
        };

        trace!(
            ?first,
            ?second,
            hand = ?five,
            at_risk,
            main_net,
            bonus_net,
            "round resolved"
        );

        Ok(RoundResult {
            wager,
            bonus_wager,
            first,
            second,
            hand: five,
            bonus_hand,
            at_risk,
            main_net,
            bonus_net,
        })
    }
}
