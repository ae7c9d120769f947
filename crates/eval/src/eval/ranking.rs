// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand ranking types.
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use holdem_cards::Card;

/// A poker hand category, from the weakest to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// No pair.
    HighCard = 1,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three cards with the same rank.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards with the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four cards with the same rank.
    FourOfAKind,
    /// A straight with all cards of the same suit.
    StraightFlush,
    /// An ace high straight flush.
    RoyalFlush,
}

impl HandCategory {
    /// The strongest category value.
    pub const MAX_VALUE: u8 = HandCategory::RoyalFlush as u8;

    /// The category value, from 1 for high card to 10 for a royal flush.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// The category display name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The ranking of the best five cards hand.
///
/// Rankings are ordered by category first and then by kickers, the cards suits
/// in the hand never affect the ordering so two rankings that compare equal
/// split a pot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRanking {
    category: HandCategory,
    kickers: Vec<u8>,
    hand: [Card; 5],
}

impl HandRanking {
    /// Evaluates the best five cards hand out of 5, 6, or 7 cards.
    ///
    /// Panics if the number of cards is not in the 5..=7 range or if a card is
    /// repeated, these are caller errors.
    pub fn eval(cards: &[Card]) -> HandRanking {
        assert!(
            (5..=7).contains(&cards.len()),
            "Expected 5 to 7 cards got {}",
            cards.len()
        );

        for (idx, card) in cards.iter().enumerate() {
            assert!(!cards[idx + 1..].contains(card), "Duplicate card {card}");
        }

        let n = cards.len();
        let mut best: Option<HandRanking> = None;

        for c1 in 0..n {
            for c2 in (c1 + 1)..n {
                for c3 in (c2 + 1)..n {
                    for c4 in (c3 + 1)..n {
                        for c5 in (c4 + 1)..n {
                            let hand = [cards[c1], cards[c2], cards[c3], cards[c4], cards[c5]];
                            let ranking = Self::eval5(hand);
                            if best.as_ref().is_none_or(|b| ranking > *b) {
                                best = Some(ranking);
                            }
                        }
                    }
                }
            }
        }

        best.expect("There is at least one 5 cards hand")
    }

    /// The hand category.
    pub fn category(&self) -> HandCategory {
        self.category
    }

    /// The tie break values, most significant first.
    pub fn kickers(&self) -> &[u8] {
        &self.kickers
    }

    /// The best five cards sorted by descending value.
    pub fn hand(&self) -> &[Card; 5] {
        &self.hand
    }

    fn eval5(mut hand: [Card; 5]) -> HandRanking {
        hand.sort_unstable_by(|c1, c2| c2.value().cmp(&c1.value()));
        let values = hand.map(|c| c.value());
        let is_flush = hand.iter().all(|c| c.suit() == hand[0].suit());

        if let Some(high) = straight_high(&values) {
            let category = match (is_flush, high) {
                (true, 14) => HandCategory::RoyalFlush,
                (true, _) => HandCategory::StraightFlush,
                _ => HandCategory::Straight,
            };

            return HandRanking {
                category,
                kickers: vec![high],
                hand,
            };
        }

        // Group values in (count, value) pairs, values are sorted so equal values
        // are adjacent. Sorting the groups puts bigger groups first and higher
        // values first within groups of the same size.
        let mut groups: Vec<(u8, u8)> = Vec::with_capacity(5);
        for v in values {
            match groups.last_mut() {
                Some((count, value)) if *value == v => *count += 1,
                _ => groups.push((1, v)),
            }
        }
        groups.sort_unstable_by(|g1, g2| g2.cmp(g1));

        let second = groups.get(1).map_or(0, |g| g.0);
        let category = match (groups[0].0, second) {
            (4, _) => HandCategory::FourOfAKind,
            (3, 2) => HandCategory::FullHouse,
            _ if is_flush => HandCategory::Flush,
            (3, _) => HandCategory::ThreeOfAKind,
            (2, 2) => HandCategory::TwoPair,
            (2, _) => HandCategory::OnePair,
            _ => HandCategory::HighCard,
        };

        HandRanking {
            category,
            kickers: groups.into_iter().map(|(_, v)| v).collect(),
            hand,
        }
    }
}

/// Returns the high card value if the values make a straight.
///
/// Values must be sorted in descending order, for the A-2-3-4-5 wheel the ace
/// plays low and the high card is the five.
fn straight_high(values: &[u8; 5]) -> Option<u8> {
    if !values.windows(2).all(|w| w[0] > w[1]) {
        return None;
    }

    if values[0] - values[4] == 4 {
        Some(values[0])
    } else if *values == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    }
}

impl PartialEq for HandRanking {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandRanking {}

impl PartialOrd for HandRanking {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRanking {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        for card in &self.hand {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::Deck;
    use rand::{SeedableRng, rngs::StdRng};

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn eval(s: &str) -> HandRanking {
        HandRanking::eval(&cards(s))
    }

    #[test]
    fn royal_flush() {
        let hr = eval("AS KS QS JS TS");
        assert_eq!(hr.category(), HandCategory::RoyalFlush);
        assert_eq!(hr.category().value(), 10);
        assert_eq!(hr.kickers(), &[14]);
    }

    #[test]
    fn straight_flush() {
        let hr = eval("9H KH QH JH TH 2C");
        assert_eq!(hr.category(), HandCategory::StraightFlush);
        assert_eq!(hr.kickers(), &[13]);

        let hr = eval("AD 2D 3D 4D 5D");
        assert_eq!(hr.category(), HandCategory::StraightFlush);
        assert_eq!(hr.kickers(), &[5]);
    }

    #[test]
    fn straight_without_flush() {
        let hr = eval("2C 3C 4D 5H 6S");
        assert_eq!(hr.category(), HandCategory::Straight);
        assert_eq!(hr.kickers(), &[6]);
    }

    #[test]
    fn wheel_loses_to_six_high_straight() {
        let wheel = eval("AC 2D 3H 4S 5C");
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert_eq!(wheel.kickers(), &[5]);

        let six_high = eval("2C 3C 4D 5H 6S");
        assert_eq!(wheel.category(), six_high.category());
        assert!(six_high > wheel);
    }

    #[test]
    fn quads_beat_lower_hands_on_same_board() {
        let board = "2H 2D 7S 9C JD";
        let quads = eval(&format!("2C 2S {board}"));
        assert_eq!(quads.category(), HandCategory::FourOfAKind);
        assert_eq!(quads.kickers(), &[2, 11]);

        for hole in ["AS AH", "7D 7C", "JS JC", "KD QD"] {
            let other = eval(&format!("{hole} {board}"));
            assert!(quads > other, "{quads} vs {other}");
        }
    }

    #[test]
    fn category_kickers() {
        let hr = eval("KS KD KH 4C 4D");
        assert_eq!(hr.category(), HandCategory::FullHouse);
        assert_eq!(hr.kickers(), &[13, 4]);

        let hr = eval("2H 9H JH QH 5H");
        assert_eq!(hr.category(), HandCategory::Flush);
        assert_eq!(hr.kickers(), &[12, 11, 9, 5, 2]);

        let hr = eval("7S 7D 7C AH 3D");
        assert_eq!(hr.category(), HandCategory::ThreeOfAKind);
        assert_eq!(hr.kickers(), &[7, 14, 3]);

        let hr = eval("3S 3D 9C 9H QD");
        assert_eq!(hr.category(), HandCategory::TwoPair);
        assert_eq!(hr.kickers(), &[9, 3, 12]);

        let hr = eval("TS TD 2C 8H 5D");
        assert_eq!(hr.category(), HandCategory::OnePair);
        assert_eq!(hr.kickers(), &[10, 8, 5, 2]);

        let hr = eval("AS 3D 9C JH 6D");
        assert_eq!(hr.category(), HandCategory::HighCard);
        assert_eq!(hr.kickers(), &[14, 11, 9, 6, 3]);
    }

    #[test]
    fn best_of_seven() {
        // Two pair picks the best kicker out of the remaining cards.
        let hr = eval("AS AD KS KD QH QC 2H");
        assert_eq!(hr.category(), HandCategory::TwoPair);
        assert_eq!(hr.kickers(), &[14, 13, 12]);

        // Straight flush wins over the flush and the straight.
        let hr = eval("8C 9C TC JC QC AC KD");
        assert_eq!(hr.category(), HandCategory::StraightFlush);
        assert_eq!(hr.kickers(), &[12]);

        let names = hr.hand().iter().map(|c| c.to_string()).collect::<Vec<_>>();
        assert_eq!(names, ["QC", "JC", "TC", "9C", "8C"]);
    }

    #[test]
    fn kickers_break_ties() {
        let board = "AS 8D 6C 4H 2S";
        let king = eval(&format!("AD KC {board}"));
        let queen = eval(&format!("AH QC {board}"));
        assert_eq!(king.category(), HandCategory::OnePair);
        assert!(king > queen);
    }

    #[test]
    fn exact_tie() {
        let board = "5C 6D 7H 8S 9C";
        let h1 = eval(&format!("2H 3D {board}"));
        let h2 = eval(&format!("2C 3S {board}"));
        assert_eq!(h1.cmp(&h2), Ordering::Equal);
        assert_eq!(h1, h2);
    }

    #[test]
    fn total_order() {
        let mut rng = StdRng::seed_from_u64(101);
        let hands = (0..300)
            .map(|_| {
                let mut deck = Deck::new_and_shuffled(&mut rng);
                let cards = (0..7).map(|_| deck.deal()).collect::<Vec<_>>();
                HandRanking::eval(&cards)
            })
            .collect::<Vec<_>>();

        for h1 in &hands {
            for h2 in &hands {
                assert_eq!(h1.cmp(h2), h2.cmp(h1).reverse());
            }
        }

        let mut sorted = hands.clone();
        sorted.sort();
        for (idx, h1) in sorted.iter().enumerate() {
            for h2 in &sorted[idx..] {
                assert!(h1 <= h2);
            }
        }
    }

    #[test]
    #[should_panic]
    fn too_few_cards() {
        eval("AS KS QS JS");
    }

    #[test]
    #[should_panic]
    fn duplicate_cards() {
        eval("AS KS QS JS AS");
    }
}
