// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem table hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. To use the evaluator create
//! a hand and use [HandRanking] to get the best five cards ranking:
//!
//! ```
//! # use holdem_eval::*;
//! let cards = ["AS", "AH", "KD", "KC", "2C", "2H", "7S"]
//!     .iter()
//!     .map(|c| c.parse::<Card>().unwrap())
//!     .collect::<Vec<_>>();
//! let hr = HandRanking::eval(&cards);
//! assert_eq!(hr.category(), HandCategory::TwoPair);
//! assert_eq!(hr.kickers(), &[14, 13, 7]);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandCategory, HandRanking};

// Reexport cards types.
pub use holdem_cards::{Card, Deck, Rank, Suit};
