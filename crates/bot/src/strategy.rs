// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Bot decision strategies.
use log::debug;
use rand::{Rng, rngs::StdRng};
use std::fmt;

use holdem_core::{
    message::PlayerAction,
    poker::{Card, Chips},
};

use crate::{Difficulty, Personality, hand_strength};

/// What a bot can see of the table when it has to act.
#[derive(Debug, Clone, Copy)]
pub struct BotView<'a> {
    /// The bot hole cards.
    pub hole_cards: [Card; 2],
    /// The board cards.
    pub board: &'a [Card],
    /// The pot, including the bets of this round.
    pub pot: Chips,
    /// The chips the bot must put in to match the table bet.
    pub amount_to_call: Chips,
    /// The minimum raise increment.
    pub min_raise: Chips,
    /// The bot remaining chips.
    pub stack: Chips,
}

/// A Poker bot strategy.
pub trait Strategy: fmt::Debug + Send + Sync + 'static {
    /// Picks an action given the table view, all randomness comes from `rng`.
    fn execute(&mut self, view: &BotView<'_>, rng: &mut StdRng) -> PlayerAction;
}

/// A bot that plays by hand strength, pot odds and its personality.
#[derive(Debug, Clone)]
pub struct HeuristicBot {
    personality: Personality,
}

impl HeuristicBot {
    /// Creates a bot for the given difficulty tier.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_personality(difficulty.personality())
    }

    /// Creates a bot with a custom personality.
    pub fn with_personality(personality: Personality) -> Self {
        Self { personality }
    }

    /// The bot personality.
    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    fn decide(&self, view: &BotView<'_>, strength: f64, rng: &mut StdRng) -> PlayerAction {
        let r = rng.random::<f64>();
        let bluff = r < self.personality.bluff_frequency;
        let aggressive = r < self.personality.aggression;
        let can_raise = aggressive && view.stack > view.min_raise * 2;

        if view.amount_to_call == Chips::ZERO {
            if (strength >= 0.8 || bluff) && can_raise {
                if let Some(amount) = raise_amount(view, rng) {
                    return PlayerAction::Raise(amount);
                }
            }

            return PlayerAction::Check;
        }

        let pot = view.pot.amount() as f64;
        let pot_odds = pot / (pot + view.amount_to_call.amount() as f64);

        if strength >= 0.8 || bluff {
            if can_raise {
                if let Some(amount) = raise_amount(view, rng) {
                    return PlayerAction::Raise(amount);
                }
            }

            PlayerAction::Call
        } else if strength >= 0.5 {
            if pot_odds > 0.3 {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            }
        } else if strength >= self.personality.call_threshold {
            if pot_odds > 0.5 {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            }
        } else {
            PlayerAction::Fold
        }
    }
}

impl Strategy for HeuristicBot {
    fn execute(&mut self, view: &BotView<'_>, rng: &mut StdRng) -> PlayerAction {
        let strength = hand_strength(view.hole_cards, view.board);
        let action = self.decide(view, strength, rng);
        debug!(
            "Bot strength {strength:.2} to call {} pot {} -> {action:?}",
            view.amount_to_call, view.pot
        );

        action
    }
}

/// Half to full pot raise capped at the stack, none if it rounds to zero.
fn raise_amount(view: &BotView<'_>, rng: &mut StdRng) -> Option<Chips> {
    let factor = 0.5 + 0.5 * rng.random::<f64>();
    let amount = (view.pot.amount() as f64 * factor).floor() as u32;
    let amount = Chips::new(amount).min(view.stack);
    (amount > Chips::ZERO).then_some(amount)
}
