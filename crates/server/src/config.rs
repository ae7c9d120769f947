// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table configuration.
use std::{str::FromStr, time::Duration};
use thiserror::Error;

use holdem_bot::{Difficulty, ParseDifficultyError};
use holdem_core::poker::Chips;

/// What to do with the chips left over when a pot doesn't split evenly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OddChips {
    /// The remainder is lost.
    #[default]
    Discard,
    /// The remainder goes to the first winner after the dealer.
    FirstWinner,
}

/// A bot seated at each new table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// The bot nickname.
    pub nickname: String,
    /// The bot difficulty.
    pub difficulty: Difficulty,
}

impl BotConfig {
    /// Creates a bot config.
    pub fn new(nickname: &str, difficulty: Difficulty) -> Self {
        Self {
            nickname: nickname.to_string(),
            difficulty,
        }
    }
}

/// Error returned when parsing a bot from a `name:difficulty` string.
#[derive(Debug, Error)]
pub enum ParseBotError {
    /// The nickname is missing.
    #[error("missing bot nickname in {0:?}")]
    Nickname(String),
    /// The difficulty is not valid.
    #[error(transparent)]
    Difficulty(#[from] ParseDifficultyError),
}

impl FromStr for BotConfig {
    type Err = ParseBotError;

    /// Parses `Alice:easy`, a missing difficulty defaults to medium.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (nickname, difficulty) = match s.split_once(':') {
            Some((nickname, difficulty)) => (nickname.trim(), difficulty.parse()?),
            None => (s.trim(), Difficulty::default()),
        };

        if nickname.is_empty() {
            return Err(ParseBotError::Nickname(s.to_string()));
        }

        Ok(BotConfig::new(nickname, difficulty))
    }
}

/// The game constants for a table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind.
    pub big_blind: Chips,
    /// The chips each seat starts with.
    pub buy_in: Chips,
    /// The number of seats for human players.
    pub max_humans: usize,
    /// The bots seated when the table is created.
    pub bots: Vec<BotConfig>,
    /// How long a human has to act before being folded.
    pub action_timeout: Duration,
    /// Delay before the next player turn.
    pub turn_delay: Duration,
    /// Delay before betting on a new street.
    pub round_delay: Duration,
    /// Delay between streets dealt without betting.
    pub skip_delay: Duration,
    /// The minimum time a bot takes to act.
    pub bot_think_min: Duration,
    /// The maximum time a bot takes to act.
    pub bot_think_max: Duration,
    /// Delay before the first hand.
    pub start_delay: Duration,
    /// Delay between the end of a hand and the next one.
    pub new_hand_delay: Duration,
    /// How to split odd chips.
    pub odd_chips: OddChips,
    /// Seed for the tables random numbers, each table adds its id.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: Chips::new(10),
            big_blind: Chips::new(20),
            buy_in: Chips::new(1_000),
            max_humans: 1,
            bots: vec![
                BotConfig::new("Alice", Difficulty::Easy),
                BotConfig::new("Bob", Difficulty::Medium),
                BotConfig::new("Charlie", Difficulty::Hard),
            ],
            action_timeout: Duration::from_secs(10),
            turn_delay: Duration::from_secs(1),
            round_delay: Duration::from_millis(1_500),
            skip_delay: Duration::from_millis(500),
            bot_think_min: Duration::from_secs(1),
            bot_think_max: Duration::from_secs(3),
            start_delay: Duration::from_secs(2),
            new_hand_delay: Duration::from_secs(5),
            odd_chips: OddChips::Discard,
            seed: None,
        }
    }
}

impl TableConfig {
    /// The number of seats at a table.
    pub fn seats(&self) -> usize {
        self.max_humans + self.bots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bot() {
        let bot = "Alice:easy".parse::<BotConfig>().unwrap();
        assert_eq!(bot, BotConfig::new("Alice", Difficulty::Easy));

        let bot = "Dave".parse::<BotConfig>().unwrap();
        assert_eq!(bot.difficulty, Difficulty::Medium);

        assert!(matches!(
            ":hard".parse::<BotConfig>(),
            Err(ParseBotError::Nickname(_))
        ));
        assert!(matches!(
            "Eve:expert".parse::<BotConfig>(),
            Err(ParseBotError::Difficulty(_))
        ));
    }

    #[test]
    fn default_config() {
        let config = TableConfig::default();
        assert_eq!(config.seats(), 4);
        assert_eq!(config.big_blind, config.small_blind * 2);
        assert_eq!(config.odd_chips, OddChips::Discard);
    }
}
