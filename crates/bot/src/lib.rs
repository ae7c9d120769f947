// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Holdem table bots.
//!
//! Bots fill the table seats that are not taken by humans, a bot picks an
//! action from an estimate of its hand strength and a [Personality]:
//!
//! ```
//! # use holdem_bot::{BotView, Difficulty, HeuristicBot, Strategy};
//! # use holdem_core::{message::PlayerAction, poker::Chips};
//! # use rand::{SeedableRng, rngs::StdRng};
//! let mut bot = HeuristicBot::new(Difficulty::Medium);
//! let view = BotView {
//!     hole_cards: ["7H".parse().unwrap(), "2C".parse().unwrap()],
//!     board: &[],
//!     pot: Chips::new(30),
//!     amount_to_call: Chips::ZERO,
//!     min_raise: Chips::new(20),
//!     stack: Chips::new(980),
//! };
//!
//! let action = bot.execute(&view, &mut StdRng::seed_from_u64(1));
//! assert_ne!(action, PlayerAction::Fold);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod personality;
mod strategy;
mod strength;

pub use personality::{Difficulty, ParseDifficultyError, Personality};
pub use strategy::{BotView, HeuristicBot, Strategy};
pub use strength::{hand_strength, preflop_strength};

pub use holdem_core as core;
