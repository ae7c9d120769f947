// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Bot personality profiles.
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A bot difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// Passive bot that rarely bluffs.
    Easy,
    /// Balanced bot.
    #[default]
    Medium,
    /// Aggressive bot that bluffs more often.
    Hard,
}

impl Difficulty {
    /// The personality for this tier.
    pub fn personality(&self) -> Personality {
        match self {
            Difficulty::Easy => Personality {
                aggression: 0.2,
                bluff_frequency: 0.1,
                tightness: 0.8,
                call_threshold: 0.3,
            },
            Difficulty::Medium => Personality {
                aggression: 0.4,
                bluff_frequency: 0.2,
                tightness: 0.6,
                call_threshold: 0.5,
            },
            Difficulty::Hard => Personality {
                aggression: 0.6,
                bluff_frequency: 0.3,
                tightness: 0.4,
                call_threshold: 0.7,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };

        f.write_str(s)
    }
}

/// Error returned when parsing an unknown difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?}, expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// The traits that drive a bot decisions, all values are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    /// Probability of raising with a strong hand or a bluff.
    pub aggression: f64,
    /// Probability of playing a weak hand as a strong one.
    pub bluff_frequency: f64,
    /// How selective the bot is about starting hands.
    pub tightness: f64,
    /// Minimum strength to call a bet with a marginal hand.
    pub call_threshold: f64,
}

impl Default for Personality {
    fn default() -> Self {
        Difficulty::default().personality()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_difficulty() {
        assert_eq!("easy".parse(), Ok(Difficulty::Easy));
        assert_eq!("Hard".parse(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn harder_bots_are_more_aggressive() {
        let easy = Difficulty::Easy.personality();
        let hard = Difficulty::Hard.personality();
        assert!(easy.aggression < hard.aggression);
        assert!(easy.bluff_frequency < hard.bluff_frequency);
        assert!(easy.tightness > hard.tightness);
        assert_eq!(Personality::default(), Difficulty::Medium.personality());
    }
}
