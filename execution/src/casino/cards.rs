//! Card encoding shared by every module.
//!
//! Cards are `u8` values 0-51: `suit = card / 13`, `rank = card % 13 + 1`
//! with ace = 1. Suits are spades, hearts, diamonds, clubs in that order.

pub const CARD_COUNT: u8 = 52;

const RANK_CHARS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];
const SUIT_CHARS: [char; 4] = ['s', 'h', 'd', 'c'];

/// Get card rank (1-13, Ace = 1).
pub fn card_rank(card: u8) -> u8 {
    (card % 13) + 1
}

/// Get card rank (2-14, Ace = 14 for comparison).
pub fn card_rank_ace_high(card: u8) -> u8 {
    let r = card_rank(card);
    if r == 1 {
        14
    } else {
        r
    }
}

/// Get card suit (0-3).
pub fn card_suit(card: u8) -> u8 {
    card / 13
}

pub fn is_valid_card(card: u8) -> bool {
    card < CARD_COUNT
}

/// Build a card from a rank (1-13 or 14 for ace) and suit (0-3).
pub fn make_card(rank: u8, suit: u8) -> u8 {
    let rank = if rank == 14 { 1 } else { rank };
    suit * 13 + (rank - 1)
}

/// Format as `As`, `Td`, `7c`.
pub fn format_card(card: u8) -> String {
    if !is_valid_card(card) {
        return "??".to_string();
    }
    let rank = RANK_CHARS[(card % 13) as usize];
    let suit = SUIT_CHARS[card_suit(card) as usize];
    format!("{rank}{suit}")
}

/// Parse `As`, `Td`, `7c` (case-insensitive).
pub fn parse_card(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    let rank_ch = chars.next()?.to_ascii_uppercase();
    let suit_ch = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }
    let rank = RANK_CHARS.iter().position(|&c| c == rank_ch)? as u8;
    let suit = SUIT_CHARS.iter().position(|&c| c == suit_ch)? as u8;
    Some(suit * 13 + rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_and_suit() {
        // 0 = A♠, 1 = 2♠, 17 = 5♥, 30 = 5♦, 51 = K♣
        assert_eq!(card_rank(0), 1);
        assert_eq!(card_rank_ace_high(0), 14);
        assert_eq!(card_rank(1), 2);
        assert_eq!(card_rank(17), 5);
        assert_eq!(card_suit(17), 1);
        assert_eq!(card_suit(30), 2);
        assert_eq!(card_rank(51), 13);
        assert_eq!(card_suit(51), 3);
    }

    #[test]
    fn test_format_and_parse() {
        for card in 0..CARD_COUNT {
            assert_eq!(parse_card(&format_card(card)), Some(card));
        }
        assert_eq!(format_card(0), "As");
        assert_eq!(format_card(22), "Th");
        assert_eq!(parse_card("kc"), Some(51));
        assert_eq!(parse_card("1s"), None);
        assert_eq!(parse_card("Asx"), None);
        assert_eq!(format_card(52), "??");
    }

    #[test]
    fn test_make_card() {
        assert_eq!(make_card(14, 0), 0);
        assert_eq!(make_card(1, 0), 0);
        assert_eq!(make_card(10, 1), 22);
        assert_eq!(make_card(13, 3), 51);
    }
}
