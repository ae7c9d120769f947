// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! The evaluator enumerates all the five cards subsets of a 5, 6, or 7 cards
//! hand and keeps the one with the highest [HandRanking], a ranking carries a
//! [HandCategory] and the kickers used to break ties between hands with the
//! same category.
mod ranking;
pub use ranking::{HandCategory, HandRanking};
