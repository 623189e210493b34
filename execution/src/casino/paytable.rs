//! Main game and Three Card Bonus paytables.
//!
//! Multipliers are "to one": a winning riding bet of 5 on a straight pays 25
//! and the bet is returned.

use letitride_types::{BonusPaytableId, ConfigError, FiveCardHand, PaytableId, ThreeCardHand};

/// Main game paytable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paytable {
    id: PaytableId,
}

impl Paytable {
    pub fn new(id: PaytableId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> PaytableId {
        self.id
    }

    pub fn multiplier(&self, hand: FiveCardHand) -> u64 {
        match (self.id, hand) {
            (_, FiveCardHand::HighCard | FiveCardHand::LowPair) => 0,
            (_, FiveCardHand::TensOrBetter) => 1,
            (_, FiveCardHand::TwoPair) => 2,
            (_, FiveCardHand::ThreeOfAKind) => 3,
            (_, FiveCardHand::Straight) => 5,

            (PaytableId::Standard, FiveCardHand::Flush) => 8,
            (PaytableId::Standard, FiveCardHand::FullHouse) => 11,
            (PaytableId::Standard, FiveCardHand::FourOfAKind) => 50,
            (PaytableId::Standard, FiveCardHand::StraightFlush) => 200,
            (PaytableId::Standard, FiveCardHand::RoyalFlush) => 1000,

            // Short pay table found on some floors
            (PaytableId::Reduced, FiveCardHand::Flush) => 7,
            (PaytableId::Reduced, FiveCardHand::FullHouse) => 10,
            (PaytableId::Reduced, FiveCardHand::FourOfAKind) => 40,
            (PaytableId::Reduced, FiveCardHand::StraightFlush) => 100,
            (PaytableId::Reduced, FiveCardHand::RoyalFlush) => 500,

            (PaytableId::Generous, FiveCardHand::Flush) => 9,
            (PaytableId::Generous, FiveCardHand::FullHouse) => 12,
            (PaytableId::Generous, FiveCardHand::FourOfAKind) => 50,
            (PaytableId::Generous, FiveCardHand::StraightFlush) => 200,
            (PaytableId::Generous, FiveCardHand::RoyalFlush) => 1000,
        }
    }
}

/// Three Card Bonus paytable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BonusPaytable {
    id: BonusPaytableId,
}

impl BonusPaytable {
    pub fn new(id: BonusPaytableId) -> Result<Self, ConfigError> {
        match id {
            BonusPaytableId::MiniRoyal | BonusPaytableId::Classic | BonusPaytableId::HighTrips => {
                Ok(Self { id })
            }
            BonusPaytableId::Progressive => Err(ConfigError::Unimplemented {
                feature: "progressive bonus paytable",
            }),
        }
    }

    pub fn id(&self) -> BonusPaytableId {
        self.id
    }

    pub fn multiplier(&self, hand: ThreeCardHand) -> u64 {
        match (self.id, hand) {
            (_, ThreeCardHand::HighCard) => 0,
            (_, ThreeCardHand::Pair) => 1,

            (BonusPaytableId::MiniRoyal, ThreeCardHand::Flush) => 3,
            (BonusPaytableId::MiniRoyal, ThreeCardHand::Straight) => 6,
            (BonusPaytableId::MiniRoyal, ThreeCardHand::ThreeOfAKind) => 30,
            (BonusPaytableId::MiniRoyal, ThreeCardHand::StraightFlush) => 40,
            (BonusPaytableId::MiniRoyal, ThreeCardHand::MiniRoyal) => 50,

            (BonusPaytableId::Classic, ThreeCardHand::Flush) => 4,
            (BonusPaytableId::Classic, ThreeCardHand::Straight) => 6,
            (BonusPaytableId::Classic, ThreeCardHand::ThreeOfAKind) => 30,
            (BonusPaytableId::Classic, ThreeCardHand::StraightFlush)
            | (BonusPaytableId::Classic, ThreeCardHand::MiniRoyal) => 40,

            (BonusPaytableId::HighTrips, ThreeCardHand::Flush) => 3,
            (BonusPaytableId::HighTrips, ThreeCardHand::Straight) => 5,
            (BonusPaytableId::HighTrips, ThreeCardHand::ThreeOfAKind) => 33,
            (BonusPaytableId::HighTrips, ThreeCardHand::StraightFlush)
            | (BonusPaytableId::HighTrips, ThreeCardHand::MiniRoyal) => 35,

            // Rejected in `new`
            (BonusPaytableId::Progressive, _) => 0,
        }
    }
}

/// Every paytable a run needs. Built once and shared read-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paytables {
    pub main: Paytable,
    pub bonus: Option<BonusPaytable>,
}

impl Paytables {
    pub fn new(main: PaytableId, bonus: Option<BonusPaytableId>) -> Result<Self, ConfigError> {
        Ok(Self {
            main: Paytable::new(main),
            bonus: bonus.map(BonusPaytable::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letitride_types::ErrorKind;

    #[test]
    fn test_standard_paytable() {
        let table = Paytable::new(PaytableId::Standard);
        assert_eq!(table.multiplier(FiveCardHand::HighCard), 0);
        assert_eq!(table.multiplier(FiveCardHand::LowPair), 0);
        assert_eq!(table.multiplier(FiveCardHand::TensOrBetter), 1);
        assert_eq!(table.multiplier(FiveCardHand::Flush), 8);
        assert_eq!(table.multiplier(FiveCardHand::RoyalFlush), 1000);
    }

    #[test]
    fn test_only_paying_hands_pay() {
        for id in [PaytableId::Standard, PaytableId::Reduced, PaytableId::Generous] {
            let table = Paytable::new(id);
            for hand in FiveCardHand::ALL {
                assert_eq!(table.multiplier(hand) > 0, hand.is_paying(), "{id:?} {hand:?}");
            }
        }
    }

    #[test]
    fn test_multipliers_monotonic() {
        for id in [PaytableId::Standard, PaytableId::Reduced, PaytableId::Generous] {
            let table = Paytable::new(id);
            for pair in FiveCardHand::ALL.windows(2) {
                assert!(table.multiplier(pair[0]) <= table.multiplier(pair[1]));
            }
        }
    }

    #[test]
    fn test_bonus_paytables() {
        let mini = BonusPaytable::new(BonusPaytableId::MiniRoyal).unwrap();
        assert_eq!(mini.multiplier(ThreeCardHand::HighCard), 0);
        assert_eq!(mini.multiplier(ThreeCardHand::Pair), 1);
        assert_eq!(mini.multiplier(ThreeCardHand::MiniRoyal), 50);

        let trips = BonusPaytable::new(BonusPaytableId::HighTrips).unwrap();
        assert_eq!(trips.multiplier(ThreeCardHand::ThreeOfAKind), 33);
    }

    #[test]
    fn test_progressive_unimplemented() {
        let err = Paytables::new(PaytableId::Standard, Some(BonusPaytableId::Progressive))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);

        let tables = Paytables::new(PaytableId::Reduced, None).unwrap();
        assert!(tables.bonus.is_none());
        assert_eq!(tables.main.id(), PaytableId::Reduced);
    }
}
