//! Five and three card evaluators.

use super::cards::{card_rank, card_rank_ace_high, card_suit};
use letitride_types::{FiveCardHand, ThreeCardHand};

/// Evaluate a 5-card Let It Ride hand.
/// Optimized to avoid heap allocations.
pub fn evaluate_five(cards: &[u8; 5]) -> FiveCardHand {
    // Extract ranks and suits into fixed arrays
    let mut ranks = [0u8; 5];
    let mut suits = [0u8; 5];
    for i in 0..5 {
        ranks[i] = card_rank(cards[i]);
        suits[i] = card_suit(cards[i]);
    }
    ranks.sort_unstable();

    let is_flush = suits.iter().all(|&s| s == suits[0]);

    let has_duplicates = ranks.windows(2).any(|w| w[0] == w[1]);

    // Check for straight (including A-2-3-4-5 and 10-J-Q-K-A)
    let is_royal = ranks == [1, 10, 11, 12, 13];
    let is_straight = if has_duplicates {
        false
    } else if is_royal || ranks == [1, 2, 3, 4, 5] {
        true
    } else {
        ranks[4] - ranks[0] == 4
    };

    // Count rank occurrences
    let mut counts = [0u8; 14];
    for &r in &ranks {
        counts[r as usize] += 1;
    }

    let mut pairs = 0u8;
    let mut three_kind = false;
    let mut four_kind = false;
    let mut high_pair = false; // Tens or better

    for (rank, &count) in counts.iter().enumerate() {
        match count {
            2 => {
                pairs += 1;
                if rank >= 10 || rank == 1 {
                    high_pair = true;
                }
            }
            3 => three_kind = true,
            4 => four_kind = true,
            _ => {}
        }
    }

    if is_royal && is_flush {
        FiveCardHand::RoyalFlush
    } else if is_straight && is_flush {
        FiveCardHand::StraightFlush
    } else if four_kind {
        FiveCardHand::FourOfAKind
    } else if three_kind && pairs == 1 {
        FiveCardHand::FullHouse
    } else if is_flush {
        FiveCardHand::Flush
    } else if is_straight {
        FiveCardHand::Straight
    } else if three_kind {
        FiveCardHand::ThreeOfAKind
    } else if pairs == 2 {
        FiveCardHand::TwoPair
    } else if pairs == 1 && high_pair {
        FiveCardHand::TensOrBetter
    } else if pairs == 1 {
        FiveCardHand::LowPair
    } else {
        FiveCardHand::HighCard
    }
}

/// Evaluate a 3-card hand for the Three Card Bonus.
pub fn evaluate_three(cards: &[u8; 3]) -> ThreeCardHand {
    let mut ranks = [
        card_rank_ace_high(cards[0]),
        card_rank_ace_high(cards[1]),
        card_rank_ace_high(cards[2]),
    ];
    ranks.sort_unstable();

    let is_flush = card_suit(cards[0]) == card_suit(cards[1])
        && card_suit(cards[1]) == card_suit(cards[2]);

    // Check straight (including A-2-3)
    let is_straight = (ranks[2] - ranks[0] == 2 && ranks[1] - ranks[0] == 1) || ranks == [2, 3, 14];

    let is_trips = ranks[0] == ranks[1] && ranks[1] == ranks[2];
    let is_pair = ranks[0] == ranks[1] || ranks[1] == ranks[2];

    if is_straight && is_flush {
        if ranks == [12, 13, 14] {
            ThreeCardHand::MiniRoyal
        } else {
            ThreeCardHand::StraightFlush
        }
    } else if is_trips {
        ThreeCardHand::ThreeOfAKind
    } else if is_straight {
        ThreeCardHand::Straight
    } else if is_flush {
        ThreeCardHand::Flush
    } else if is_pair {
        ThreeCardHand::Pair
    } else {
        ThreeCardHand::HighCard
    }
}
