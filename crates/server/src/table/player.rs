// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table player types.
use tokio::sync::mpsc;

use holdem_bot::Strategy;
use holdem_core::{
    message::{ActionLabel, Message},
    poker::{Chips, PlayerCards, PlayerId},
};

use super::TableMessage;

/// A table player state.
#[derive(Debug)]
pub struct Player {
    /// The player id.
    pub player_id: PlayerId,
    /// The channel to send messages to this player connection, none for bots.
    pub table_tx: Option<mpsc::Sender<TableMessage>>,
    /// The strategy for a bot player.
    pub bot: Option<Box<dyn Strategy>>,
    /// This player nickname.
    pub nickname: String,
    /// This player chips.
    pub chips: Chips,
    /// The player bet in this betting round.
    pub bet: Chips,
    /// The chips this player put in the pot in this hand.
    pub committed: Chips,
    /// The last player action.
    pub action: Option<ActionLabel>,
    /// This player private cards.
    pub hole_cards: PlayerCards,
    /// The player folded or joined during a hand.
    pub has_folded: bool,
    /// The player has no chips left to bet.
    pub is_all_in: bool,
    /// The player has the button.
    pub has_button: bool,
}

impl Player {
    /// Creates a human player.
    pub fn human(
        player_id: PlayerId,
        nickname: String,
        chips: Chips,
        table_tx: mpsc::Sender<TableMessage>,
    ) -> Self {
        Self::new(player_id, nickname, chips, Some(table_tx), None)
    }

    /// Creates a bot player.
    pub fn bot(
        player_id: PlayerId,
        nickname: String,
        chips: Chips,
        strategy: Box<dyn Strategy>,
    ) -> Self {
        Self::new(player_id, nickname, chips, None, Some(strategy))
    }

    fn new(
        player_id: PlayerId,
        nickname: String,
        chips: Chips,
        table_tx: Option<mpsc::Sender<TableMessage>>,
        bot: Option<Box<dyn Strategy>>,
    ) -> Self {
        Self {
            player_id,
            table_tx,
            bot,
            nickname,
            chips,
            bet: Chips::ZERO,
            committed: Chips::ZERO,
            action: None,
            hole_cards: PlayerCards::None,
            has_folded: false,
            is_all_in: false,
            has_button: false,
        }
    }

    /// Checks if this player is a bot.
    pub fn is_bot(&self) -> bool {
        self.bot.is_some()
    }

    /// Checks if this player is still in the hand.
    pub fn in_hand(&self) -> bool {
        !self.has_folded
    }

    /// Checks if this player can still bet in this hand.
    pub fn can_act(&self) -> bool {
        !self.has_folded && !self.is_all_in
    }

    /// Send a message to this player connection.
    pub async fn send(&self, msg: Message) {
        self.send_table_message(TableMessage::Send(msg)).await;
    }

    /// Send a table message to this player connection.
    pub async fn send_table_message(&self, msg: TableMessage) {
        if let Some(tx) = &self.table_tx {
            let _ = tx.send(msg).await;
        }
    }

    /// Moves up to `amount` chips from the stack to the bet.
    ///
    /// Returns the chips moved, a player that runs out of chips goes all in.
    pub fn put_in(&mut self, amount: Chips) -> Chips {
        let amount = amount.min(self.chips);
        self.chips -= amount;
        self.bet += amount;
        self.committed += amount;

        if self.chips == Chips::ZERO {
            self.is_all_in = true;
        }

        amount
    }

    /// Sets this player in fold state.
    pub fn fold(&mut self) {
        self.has_folded = true;
        self.action = Some(ActionLabel::Fold);
    }

    /// Reset state for a new hand.
    fn start_hand(&mut self) {
        self.has_button = false;
        self.bet = Chips::ZERO;
        self.committed = Chips::ZERO;
        self.action = None;
        self.hole_cards = PlayerCards::None;
        self.has_folded = false;
        self.is_all_in = false;
    }
}

/// The table players state.
#[derive(Debug, Default)]
pub struct PlayersState {
    players: Vec<Player>,
    current: Option<usize>,
    dealer: usize,
}

impl PlayersState {
    /// Adds a player to the table.
    pub fn join(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Removes a player from the table.
    ///
    /// Returns the player and if it was the current player, in which case the
    /// current index moves to the previous seat so that advancing the turn
    /// picks the seat after the one that left.
    pub fn leave(&mut self, player_id: &PlayerId) -> Option<(Player, bool)> {
        let pos = self.players.iter().position(|p| &p.player_id == player_id)?;
        let player = self.players.remove(pos);
        let len = self.players.len();

        let was_current = self.current == Some(pos);
        self.current = match self.current {
            _ if len == 0 => None,
            Some(idx) if idx > pos => Some(idx - 1),
            Some(idx) if idx == pos => Some((pos + len - 1) % len),
            current => current,
        };

        // The button moves back so the next hand gives it to the seat after
        // the one that left.
        self.dealer = match self.dealer {
            _ if len == 0 => 0,
            dealer if dealer > pos => dealer - 1,
            dealer if dealer == pos => (pos + len - 1) % len,
            dealer => dealer.min(len - 1),
        };

        Some((player, was_current))
    }

    /// Returns total number of players.
    pub fn count(&self) -> usize {
        self.players.len()
    }

    /// Returns the number of human players.
    pub fn count_humans(&self) -> usize {
        self.players.iter().filter(|p| !p.is_bot()).count()
    }

    /// Returns the number of players that have not folded.
    pub fn count_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    /// Returns the number of players that can still bet.
    pub fn count_can_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Returns the number of player who have chips.
    pub fn count_with_chips(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.chips > Chips::ZERO)
            .count()
    }

    /// Returns the current player index.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Returns the current player.
    pub fn current_player(&self) -> Option<&Player> {
        self.current.and_then(|idx| self.players.get(idx))
    }

    /// Sets the current player index.
    pub fn set_current(&mut self, current: Option<usize>) {
        self.current = current;
    }

    /// Returns the dealer seat index.
    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Check if this player is the current player.
    pub fn is_current(&self, player_id: &PlayerId) -> bool {
        self.current_player()
            .map(|p| &p.player_id == player_id)
            .unwrap_or(false)
    }

    /// Returns the player at the given seat.
    pub fn get(&self, idx: usize) -> Option<&Player> {
        self.players.get(idx)
    }

    /// Returns the mutable player at the given seat.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Player> {
        self.players.get_mut(idx)
    }

    /// Returns an iterator to all players.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Returns a mutable iterator to all players.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Returns the seats indices starting after `idx` and wrapping around.
    pub fn seats_after(&self, idx: usize) -> impl Iterator<Item = usize> {
        let len = self.players.len();
        (1..=len).map(move |n| (idx + n) % len)
    }

    /// Returns the first seat after `idx` that can act.
    pub fn next_can_act(&self, idx: usize) -> Option<usize> {
        self.seats_after(idx).find(|&i| self.players[i].can_act())
    }

    /// Moves the turn to the next player that can act.
    pub fn advance_turn(&mut self) {
        self.current = self
            .current
            .and_then(|idx| self.next_can_act(idx));
    }

    /// Set state for a new hand.
    ///
    /// Returns the players removed because they run out of chips.
    pub fn start_hand(&mut self) -> Vec<Player> {
        self.current = None;

        let mut removed = Vec::new();
        let mut idx = 0;
        let mut dealer_wraps = false;
        while idx < self.players.len() {
            if self.players[idx].chips == Chips::ZERO {
                removed.push(self.players.remove(idx));
                if idx < self.dealer {
                    self.dealer -= 1;
                } else if idx == self.dealer {
                    // The dealer seat busted, the button goes back one seat.
                    if self.dealer > 0 {
                        self.dealer -= 1;
                    } else {
                        dealer_wraps = true;
                    }
                }
            } else {
                self.players[idx].start_hand();
                idx += 1;
            }
        }

        if dealer_wraps || self.dealer >= self.players.len() {
            self.dealer = self.players.len().saturating_sub(1);
        }

        removed
    }

    /// Moves the button one seat.
    pub fn advance_button(&mut self) {
        if self.players.is_empty() {
            return;
        }

        self.dealer = (self.dealer + 1) % self.players.len();
        for (idx, p) in self.players.iter_mut().enumerate() {
            p.has_button = idx == self.dealer;
        }
    }

    /// Clears the round bets, the chips are already in the pot.
    pub fn end_round(&mut self) {
        self.current = None;
        for p in &mut self.players {
            p.bet = Chips::ZERO;
            if p.can_act() {
                p.action = None;
            }
        }
    }

    /// The hand has ended, no player has to act.
    pub fn end_hand(&mut self) {
        self.end_round();
        for p in &mut self.players {
            p.action = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_players(n: u64) -> (PlayersState, Vec<mpsc::Receiver<TableMessage>>) {
        let mut players = PlayersState::default();
        let mut receivers = Vec::new();
        for id in 0..n {
            let (tx, rx) = mpsc::channel(8);
            players.join(Player::human(
                PlayerId::new(id),
                format!("P{id}"),
                Chips::new(100),
                tx,
            ));
            receivers.push(rx);
        }

        (players, receivers)
    }

    #[test]
    fn put_in_caps_at_stack() {
        let (mut players, _rx) = new_players(1);
        let p = players.get_mut(0).unwrap();

        assert_eq!(p.put_in(Chips::new(30)), Chips::new(30));
        assert!(!p.is_all_in);
        assert_eq!(p.put_in(Chips::new(100)), Chips::new(70));
        assert!(p.is_all_in);
        assert_eq!(p.bet, Chips::new(100));
        assert_eq!(p.committed, Chips::new(100));
        assert_eq!(p.chips, Chips::ZERO);
    }

    #[test]
    fn turn_skips_folded_and_all_in() {
        let (mut players, _rx) = new_players(4);
        players.get_mut(1).unwrap().fold();
        players.get_mut(2).unwrap().is_all_in = true;
        players.set_current(Some(0));

        players.advance_turn();
        assert_eq!(players.current(), Some(3));
        players.advance_turn();
        assert_eq!(players.current(), Some(0));
        assert_eq!(players.count_can_act(), 2);
        assert_eq!(players.count_in_hand(), 3);
    }

    #[test]
    fn leave_adjusts_current_and_dealer() {
        let (mut players, _rx) = new_players(4);
        players.advance_button();
        players.advance_button();
        assert_eq!(players.dealer(), 2);
        players.set_current(Some(3));

        // A player before the current player and the dealer leaves.
        let (_, was_current) = players.leave(&PlayerId::new(0)).unwrap();
        assert!(!was_current);
        assert_eq!(players.current(), Some(2));
        assert_eq!(players.dealer(), 1);

        // The current player leaves, the next turn goes to the following seat.
        let (_, was_current) = players.leave(&PlayerId::new(3)).unwrap();
        assert!(was_current);
        players.advance_turn();
        assert_eq!(players.current_player().unwrap().player_id, PlayerId::new(1));

        assert!(players.leave(&PlayerId::new(3)).is_none());
    }

    #[test]
    fn dealer_leaving_passes_the_button_on() {
        let (mut players, _rx) = new_players(4);
        players.advance_button();
        players.advance_button();
        assert_eq!(players.dealer(), 2);

        // The dealer leaves, seat 3 slides into index 2 and gets the next button.
        players.leave(&PlayerId::new(2)).unwrap();
        assert_eq!(players.dealer(), 1);
        players.advance_button();
        assert_eq!(players.get(players.dealer()).unwrap().player_id, PlayerId::new(3));
        assert!(players.get(2).unwrap().has_button);

        // The dealer at seat 0 leaves, the button wraps to the last seat.
        let (mut players, _rx) = new_players(3);
        players.advance_button();
        players.advance_button();
        players.advance_button();
        assert_eq!(players.dealer(), 0);
        players.leave(&PlayerId::new(0)).unwrap();
        assert_eq!(players.dealer(), 1);
        players.advance_button();
        assert_eq!(players.get(players.dealer()).unwrap().player_id, PlayerId::new(1));
    }

    #[test]
    fn busted_dealer_passes_the_button_on() {
        let (mut players, _rx) = new_players(4);
        players.advance_button();
        assert_eq!(players.dealer(), 1);

        players.get_mut(1).unwrap().chips = Chips::ZERO;
        players.start_hand();
        players.advance_button();
        assert_eq!(players.get(players.dealer()).unwrap().player_id, PlayerId::new(2));

        // Busted dealer at seat 0 wraps to the last seat.
        let (mut players, _rx) = new_players(3);
        for _ in 0..3 {
            players.advance_button();
        }
        assert_eq!(players.dealer(), 0);

        players.get_mut(0).unwrap().chips = Chips::ZERO;
        players.start_hand();
        assert_eq!(players.dealer(), 1);
        players.advance_button();
        assert_eq!(players.get(players.dealer()).unwrap().player_id, PlayerId::new(1));
    }

    #[test]
    fn start_hand_removes_busted_players() {
        let (mut players, _rx) = new_players(3);
        players.get_mut(1).unwrap().chips = Chips::ZERO;
        players.get_mut(2).unwrap().fold();

        let removed = players.start_hand();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].player_id, PlayerId::new(1));
        assert_eq!(players.count(), 2);
        assert_eq!(players.count_in_hand(), 2);

        players.advance_button();
        assert_eq!(players.dealer(), 1);
        assert!(players.get(1).unwrap().has_button);
        assert!(!players.get(0).unwrap().has_button);
    }
}
