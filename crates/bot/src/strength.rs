// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand strength estimates in the [0, 1] range.
use holdem_core::poker::{Card, HandCategory, HandRanking};

/// Estimates the strength of two hole cards before the flop.
pub fn preflop_strength(c1: Card, c2: Card) -> f64 {
    let high = c1.value().max(c2.value()) as f64;
    let low = c1.value().min(c2.value()) as f64;

    if c1.value() == c2.value() {
        let strength = if high >= 10.0 {
            0.8 + (high - 10.0) * 0.05
        } else if high >= 7.0 {
            0.6 + (high - 7.0) * 0.05
        } else {
            0.4 + (high - 2.0) * 0.02
        };

        return strength.min(1.0);
    }

    let mut strength = if high >= 12.0 {
        let s = 0.5 + (high - 12.0) * 0.1;
        if low >= 10.0 { s + 0.2 } else { s }
    } else if high >= 10.0 {
        0.3 + (high - 10.0) * 0.1
    } else {
        0.1 + (high - 2.0) * 0.02
    };

    if c1.suit() == c2.suit() {
        strength += 0.1;
    }

    let gap = high - low;
    if gap <= 1.0 {
        strength += 0.05;
    } else if gap <= 3.0 {
        strength += 0.02;
    }

    strength.min(1.0)
}

/// Estimates the strength of hole cards given the board.
///
/// Before the flop uses [preflop_strength], after the flop the best hand
/// category is normalized to [0, 1] and weak hands get a bonus for a high hole
/// card.
pub fn hand_strength(hole_cards: [Card; 2], board: &[Card]) -> f64 {
    let [c1, c2] = hole_cards;
    if board.len() < 3 {
        return preflop_strength(c1, c2);
    }

    let cards = hole_cards
        .iter()
        .chain(board.iter())
        .copied()
        .collect::<Vec<_>>();
    let ranking = HandRanking::eval(&cards);

    let mut strength = ranking.category().value() as f64 / HandCategory::MAX_VALUE as f64;
    if ranking.category() <= HandCategory::OnePair {
        let high = c1.value().max(c2.value()) as f64;
        strength += high / 14.0 * 0.2;
    }

    strength.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn preflop(s: &str) -> f64 {
        let c = cards(s);
        preflop_strength(c[0], c[1])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn preflop_pairs() {
        assert!(close(preflop("AH AD"), 1.0));
        assert!(close(preflop("TH TD"), 0.8));
        assert!(close(preflop("8H 8D"), 0.65));
        assert!(close(preflop("2H 2D"), 0.4));
    }

    #[test]
    fn preflop_high_cards() {
        // 0.5 + 0.2 + 0.2 both high + 0.05 connected.
        assert!(close(preflop("AD KC"), 0.95));
        // Suited gets capped.
        assert!(close(preflop("AS KS"), 1.0));
        // 0.3 + 0.1 + 0.02 gap of three.
        assert!(close(preflop("JH 8C"), 0.42));
        // 0.1 + 0.1, no connection.
        assert!(close(preflop("7H 2C"), 0.2));
        assert!(close(preflop("7H 2H"), 0.3));
    }

    #[test]
    fn postflop_strength() {
        let hole = cards("AS KS");
        let board = cards("QS JS TS");
        assert!(close(hand_strength([hole[0], hole[1]], &board), 1.0));

        let hole = cards("AH 7C");
        let board = cards("AD 2S 9C");
        // Pair 0.2 plus ace hole card bonus.
        assert!(close(hand_strength([hole[0], hole[1]], &board), 0.4));

        let hole = cards("9H 9C");
        let board = cards("9D 2S 2C KH");
        assert!(close(hand_strength([hole[0], hole[1]], &board), 0.7));
    }

    #[test]
    fn strength_in_range() {
        let hole = cards("2H 7C");
        let board = cards("AD KS 9C JD 4H");
        let s = hand_strength([hole[0], hole[1]], &board);
        assert!((0.0..=1.0).contains(&s));
        assert!(close(s, 0.1 + 7.0 / 14.0 * 0.2));
    }
}
