use serde::{Deserialize, Serialize};

/// Five card Let It Ride hand classes (higher is better).
///
/// Pairs are split at tens because only a pair of tens or better pays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FiveCardHand {
    HighCard = 0,
    LowPair = 1,
    TensOrBetter = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl FiveCardHand {
    pub const ALL: [FiveCardHand; 11] = [
        FiveCardHand::HighCard,
        FiveCardHand::LowPair,
        FiveCardHand::TensOrBetter,
        FiveCardHand::TwoPair,
        FiveCardHand::ThreeOfAKind,
        FiveCardHand::Straight,
        FiveCardHand::Flush,
        FiveCardHand::FullHouse,
        FiveCardHand::FourOfAKind,
        FiveCardHand::StraightFlush,
        FiveCardHand::RoyalFlush,
    ];

    /// Whether riding bets are paid with this hand.
    pub fn is_paying(self) -> bool {
        self >= FiveCardHand::TensOrBetter
    }
}

/// Three card hand classes used by the Three Card Bonus (higher is better).
///
/// `MiniRoyal` is suited A-K-Q, a straight flush some paytables pay separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ThreeCardHand {
    HighCard = 0,
    Pair = 1,
    Flush = 2,
    Straight = 3,
    ThreeOfAKind = 4,
    StraightFlush = 5,
    MiniRoyal = 6,
}
