// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Type definitions for messages between a table and its players.
use serde::{Deserialize, Serialize};

use crate::poker::{Card, Chips, Phase, PlayerCards, PlayerId, TableId};

/// Message exchanged by a table and a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// Player action response.
    ActionResponse(PlayerAction),
    /// Pause the table if running or resume it if paused.
    TogglePause,
    /// Table joined confirmation.
    TableJoined {
        /// The table the player joined.
        table_id: TableId,
        /// The id assigned to the player.
        player_id: PlayerId,
        /// The chips amount for the player who joined.
        chips: Chips,
        /// The number of seats taken.
        seats: usize,
    },
    /// A player joined the table.
    PlayerJoined {
        /// The player id.
        player_id: PlayerId,
        /// The player nickname.
        nickname: String,
        /// The player chips.
        chips: Chips,
    },
    /// A player left the table.
    PlayerLeft(PlayerId),
    /// A table state update as seen by the receiving player.
    GameUpdate(TableSnapshot),
    /// A player has acted.
    PlayerActed {
        /// The player id.
        player_id: PlayerId,
        /// The player nickname.
        nickname: String,
        /// The action the table applied.
        action: ActionLabel,
        /// The chips the player put in the pot with this action.
        amount: Chips,
        /// The player is a bot.
        is_bot: bool,
    },
    /// A human player action countdown started.
    TurnTimerStarted {
        /// The player who must act.
        player_id: PlayerId,
        /// The countdown length in milliseconds.
        duration_ms: u64,
    },
    /// The action countdown expired and the player was folded.
    TurnTimerExpired,
    /// The hand ended.
    EndHand {
        /// The winners and the chips they received.
        payoffs: Vec<HandPayoff>,
        /// The pot that was split.
        pot: Chips,
        /// The hands revealed at showdown, none if everybody else folded.
        hands: Option<Vec<RevealedHand>>,
    },
    /// The table pause state changed.
    Paused(bool),
}

/// A table state snapshot.
///
/// Snapshots are built for each receiving player, the hole cards of the other
/// players are covered unless they are revealed at showdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// The table id.
    pub table_id: TableId,
    /// The hand phase.
    pub phase: Phase,
    /// The players in seat order.
    pub players: Vec<PlayerUpdate>,
    /// The board cards.
    pub board: Vec<Card>,
    /// The pot.
    pub pot: Chips,
    /// The bet players must match in this round.
    pub current_bet: Chips,
    /// The dealer seat index.
    pub dealer: usize,
    /// The player whose turn it is.
    pub current_player: Option<PlayerId>,
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind.
    pub big_blind: Chips,
    /// The table is paused.
    pub paused: bool,
}

/// A player update details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerUpdate {
    /// The player id.
    pub player_id: PlayerId,
    /// The player nickname.
    pub nickname: String,
    /// The player chips.
    pub chips: Chips,
    /// The player current bet.
    pub bet: Chips,
    /// The last player action.
    pub action: Option<ActionLabel>,
    /// The player cards.
    pub cards: PlayerCards,
    /// The player is a bot.
    pub is_bot: bool,
    /// The player folded this hand.
    pub has_folded: bool,
    /// The player has no chips left to bet.
    pub is_all_in: bool,
    /// The player has the button.
    pub has_button: bool,
}

/// A hand winner payoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandPayoff {
    /// The winner id.
    pub player_id: PlayerId,
    /// The winner nickname.
    pub nickname: String,
    /// The chips won.
    pub chips: Chips,
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealedHand {
    /// The player id.
    pub player_id: PlayerId,
    /// The player nickname.
    pub nickname: String,
    /// The player hole cards.
    pub cards: PlayerCards,
    /// The hand category name, i.e. "Two Pair".
    pub hand_name: String,
    /// The five cards making the best hand.
    pub best: Vec<Card>,
}

/// A player action request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Give up the hand.
    Fold,
    /// Pass without betting, only legal when there is nothing to call.
    Check,
    /// Match the current bet.
    Call,
    /// Raise the current bet by the given increment.
    Raise(Chips),
}

/// The label of an action applied by the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionLabel {
    /// Player paid the small blind.
    SmallBlind,
    /// Player paid the big blind.
    BigBlind,
    /// Player folded.
    Fold,
    /// Player checked.
    Check,
    /// Player called.
    Call,
    /// Player raised.
    Raise,
    /// Player put all remaining chips in the pot.
    AllIn,
}

impl ActionLabel {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            ActionLabel::SmallBlind => "SB",
            ActionLabel::BigBlind => "BB",
            ActionLabel::Fold => "FOLD",
            ActionLabel::Check => "CHECK",
            ActionLabel::Call => "CALL",
            ActionLabel::Raise => "RAISE",
            ActionLabel::AllIn => "ALL IN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_labels() {
        assert_eq!(ActionLabel::AllIn.label(), "ALL IN");
        assert_eq!(ActionLabel::BigBlind.label(), "BB");
        assert_eq!(ActionLabel::Fold.label(), "FOLD");
    }
}
