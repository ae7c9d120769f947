// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table state types.
use ahash::AHashSet;
use log::{debug, info, warn};
use rand::{Rng, rngs::StdRng};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

use holdem_bot::{BotView, HeuristicBot};
use holdem_core::{
    message::{
        ActionLabel, HandPayoff, Message, PlayerAction, PlayerUpdate, RevealedHand, TableSnapshot,
    },
    poker::{Card, Chips, Deck, HandRanking, Phase, PlayerCards, PlayerId, TableId},
};

use crate::config::{OddChips, TableConfig};

use super::{
    TableError, TableMessage,
    player::{Player, PlayersState},
};

/// A step the table runs after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Start a new hand.
    StartHand,
    /// Start the current player turn.
    Turn,
    /// The current bot acts.
    BotAction,
    /// The current human player didn't act in time.
    TurnTimeout,
    /// Deal the next street when less than two players can bet.
    NextStreet,
}

/// The step waiting for its deadline.
#[derive(Debug)]
struct Pending {
    step: Step,
    delay: Duration,
    deadline: Instant,
    generation: u64,
}

/// Internal table state.
#[derive(Debug)]
pub struct State {
    table_id: TableId,
    config: Arc<TableConfig>,
    phase: Phase,
    players: PlayersState,
    deck: Deck,
    board: Vec<Card>,
    pot: Chips,
    current_bet: Chips,
    last_raise: Chips,
    acted: AHashSet<PlayerId>,
    paused: bool,
    pending: Option<Pending>,
    parked: Option<(Step, Duration)>,
    generation: u64,
    rng: StdRng,
}

impl State {
    /// Create a new state with user initialized randomness.
    ///
    /// Panics if the config has fewer than two seats.
    pub fn with_rng(table_id: TableId, config: Arc<TableConfig>, mut rng: StdRng) -> Self {
        // There must be at least 2 seats.
        assert!(config.seats() > 1, "A table needs at least two seats");

        let mut players = PlayersState::default();
        for (idx, bot) in config.bots.iter().enumerate() {
            // Bots ids are taken from the top of the id space.
            let player_id = PlayerId::new(u64::MAX - idx as u64);
            let strategy = Box::new(HeuristicBot::new(bot.difficulty));
            players.join(Player::bot(
                player_id,
                bot.nickname.clone(),
                config.buy_in,
                strategy,
            ));
        }

        Self {
            table_id,
            phase: Phase::Waiting,
            players,
            deck: Deck::new_and_shuffled(&mut rng),
            board: Vec::default(),
            pot: Chips::ZERO,
            current_bet: Chips::ZERO,
            last_raise: config.big_blind,
            acted: AHashSet::default(),
            paused: false,
            pending: None,
            parked: None,
            generation: 0,
            rng,
            config,
        }
    }

    /// A player tries to join the table.
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        nickname: &str,
        table_tx: mpsc::Sender<TableMessage>,
    ) -> Result<(), TableError> {
        if self.players.iter().any(|p| p.player_id == player_id) {
            return Err(TableError::AlreadyJoined);
        }

        if self.players.count_humans() >= self.config.max_humans {
            return Err(TableError::TableFull);
        }

        let mut join_player = Player::human(
            player_id,
            nickname.to_string(),
            self.config.buy_in,
            table_tx,
        );

        // A player joining during a hand waits for the next one.
        join_player.has_folded = self.phase != Phase::Waiting;

        // Send a table joined confirmation to the player who joined.
        let msg = Message::TableJoined {
            table_id: self.table_id,
            player_id,
            chips: join_player.chips,
            seats: self.players.count() + 1,
        };
        join_player.send(msg).await;

        // Send joined message for each player at the table to the new player.
        for player in self.players.iter() {
            let msg = Message::PlayerJoined {
                player_id: player.player_id,
                nickname: player.nickname.clone(),
                chips: player.chips,
            };
            join_player.send(msg).await;
        }

        // Tell all players at the table that a player joined. Note that because the
        // player has not been added to the table yet it won't get the broadcast.
        let msg = Message::PlayerJoined {
            player_id,
            nickname: nickname.to_string(),
            chips: join_player.chips,
        };
        self.broadcast(msg).await;

        self.players.join(join_player);

        info!("Player {player_id} {nickname} joined table {}", self.table_id);

        let idle = self.pending.is_none() && self.parked.is_none();
        if self.phase == Phase::Waiting && idle && self.players.count() > 1 {
            self.schedule(Step::StartHand, self.config.start_delay);
        }

        self.broadcast_game_update().await;

        Ok(())
    }

    /// A player leaves the table.
    ///
    /// Returns the number of humans still at the table.
    pub async fn leave(&mut self, player_id: &PlayerId) -> usize {
        let Some((player, was_current)) = self.players.leave(player_id) else {
            return self.players.count_humans();
        };

        info!(
            "Player {player_id} {} left table {}",
            player.nickname, self.table_id
        );

        self.acted.remove(player_id);
        self.broadcast(Message::PlayerLeft(*player_id)).await;

        let humans = self.players.count_humans();
        if humans == 0 {
            if self.phase == Phase::Waiting {
                self.cancel();
            } else {
                self.abandon_hand();
            }

            return 0;
        }

        if self.phase.is_betting() {
            if was_current || self.players.count_in_hand() < 2 || self.is_round_complete() {
                self.next_turn().await;
            }
        } else if self.phase == Phase::Waiting && self.players.count() < 2 {
            self.cancel();
        }

        self.broadcast_game_update().await;

        humans
    }

    /// Handle a message from a player.
    pub async fn message(&mut self, player_id: &PlayerId, msg: Message) {
        match msg {
            Message::ActionResponse(action) => {
                let current = self.players.current();
                let valid = !self.paused
                    && self.phase.is_betting()
                    && self.players.is_current(player_id);

                match current {
                    Some(idx) if valid => {
                        if !self.act(idx, action).await {
                            debug!("Illegal action {action:?} from {player_id}");
                        }
                    }
                    _ => debug!("Ignored action {action:?} from {player_id}"),
                }
            }
            Message::TogglePause => {
                if self.players.iter().any(|p| &p.player_id == player_id) {
                    self.toggle_pause().await;
                }
            }
            msg => debug!("Ignored message {msg:?} from {player_id}"),
        }
    }

    /// Runs the pending step if its deadline has passed.
    pub async fn tick(&mut self, now: Instant) {
        if self.paused {
            return;
        }

        if !matches!(&self.pending, Some(p) if p.deadline <= now) {
            return;
        }

        if let Some(pending) = self.pending.take() {
            self.fire(pending.step, pending.generation).await;
        }
    }

    /// Tell all players the table is closing.
    pub async fn close(&mut self) {
        self.cancel();

        for player in self.players.iter() {
            player.send_table_message(TableMessage::Close).await;
        }
    }

    async fn fire(&mut self, step: Step, generation: u64) {
        if generation != self.generation {
            debug!("Table {} dropped stale step {step:?}", self.table_id);
            return;
        }

        match step {
            Step::StartHand => self.enter_start_hand().await,
            Step::Turn => self.start_turn().await,
            Step::BotAction => self.bot_action().await,
            Step::TurnTimeout => self.turn_timeout().await,
            Step::NextStreet => self.complete_round().await,
        }
    }

    /// Schedules the next step replacing any pending step.
    fn schedule(&mut self, step: Step, delay: Duration) {
        self.generation += 1;

        if self.paused {
            self.pending = None;
            self.parked = Some((step, delay));
        } else {
            self.pending = Some(Pending {
                step,
                delay,
                deadline: Instant::now() + delay,
                generation: self.generation,
            });
        }
    }

    /// Cancels the pending step.
    fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.parked = None;
    }

    async fn toggle_pause(&mut self) {
        self.paused = !self.paused;

        if self.paused {
            if let Some(pending) = self.pending.take() {
                self.parked = Some((pending.step, pending.delay));
            }
        } else if let Some((step, delay)) = self.parked.take() {
            // A human countdown restarts from the full duration.
            if step == Step::TurnTimeout {
                if let Some(player) = self.players.current_player() {
                    let msg = Message::TurnTimerStarted {
                        player_id: player.player_id,
                        duration_ms: delay.as_millis() as u64,
                    };
                    self.broadcast(msg).await;
                }
            }

            self.schedule(step, delay);
        }

        info!(
            "Table {} {}",
            self.table_id,
            if self.paused { "paused" } else { "resumed" }
        );

        self.broadcast(Message::Paused(self.paused)).await;
        self.broadcast_game_update().await;
    }

    /// Start a new hand.
    async fn enter_start_hand(&mut self) {
        self.cancel();

        // All players that run out of chips must leave the table.
        for player in self.players.start_hand() {
            info!(
                "Player {} {} has no chips and left table {}",
                player.player_id, player.nickname, self.table_id
            );

            player.send_table_message(TableMessage::PlayerLeft).await;
            self.broadcast(Message::PlayerLeft(player.player_id)).await;
        }

        self.board.clear();
        self.pot = Chips::ZERO;
        self.current_bet = Chips::ZERO;
        self.last_raise = self.config.big_blind;
        self.acted.clear();

        if self.players.count_with_chips() < 2 || self.players.count_humans() == 0 {
            self.phase = Phase::Waiting;
            info!("Table {} waiting for players", self.table_id);
            self.broadcast_game_update().await;
            return;
        }

        // Create a new deck.
        self.deck = Deck::new_and_shuffled(&mut self.rng);

        self.players.advance_button();

        // Pay small and big blind.
        let dealer = self.players.dealer();
        let seats = self.players.count();
        let sb_idx = (dealer + 1) % seats;
        let bb_idx = (dealer + 2) % seats;
        let sb = self.post_blind(sb_idx, self.config.small_blind, ActionLabel::SmallBlind);
        let bb = self.post_blind(bb_idx, self.config.big_blind, ActionLabel::BigBlind);
        self.current_bet = sb.max(bb);

        // Deal cards to each player.
        for player in self.players.iter_mut() {
            let (c1, c2) = (self.deck.deal(), self.deck.deal());
            player.hole_cards = PlayerCards::Cards(c1, c2);
        }

        self.phase = Phase::PreFlop;

        let current = self.players.next_can_act(bb_idx);
        self.players.set_current(current);

        info!(
            "Table {} hand started, dealer seat {dealer} pot {}",
            self.table_id, self.pot
        );

        if self.is_round_complete() {
            self.schedule(Step::NextStreet, self.config.skip_delay);
        } else {
            self.schedule(Step::Turn, self.config.turn_delay);
        }

        self.broadcast_game_update().await;
    }

    /// Posts a blind and returns the player bet.
    fn post_blind(&mut self, idx: usize, blind: Chips, label: ActionLabel) -> Chips {
        let Some(player) = self.players.get_mut(idx) else {
            return Chips::ZERO;
        };

        let amount = player.put_in(blind);
        player.action = Some(label);
        self.pot += amount;
        player.bet
    }

    /// Starts the current player turn.
    async fn start_turn(&mut self) {
        if !self.phase.is_betting() {
            return;
        }

        let Some((player_id, is_bot, can_act)) = self
            .players
            .current_player()
            .map(|p| (p.player_id, p.is_bot(), p.can_act()))
        else {
            return;
        };

        if !can_act {
            self.next_turn().await;
            return;
        }

        if is_bot {
            let min = self.config.bot_think_min.as_millis() as u64;
            let max = self.config.bot_think_max.as_millis() as u64;
            let delay = if max > min {
                self.rng.random_range(min..=max)
            } else {
                min
            };

            self.schedule(Step::BotAction, Duration::from_millis(delay));
        } else {
            let timeout = self.config.action_timeout;
            self.schedule(Step::TurnTimeout, timeout);

            let msg = Message::TurnTimerStarted {
                player_id,
                duration_ms: timeout.as_millis() as u64,
            };
            self.broadcast(msg).await;
        }

        self.broadcast_game_update().await;
    }

    /// The current bot picks an action.
    async fn bot_action(&mut self) {
        let Some(idx) = self.players.current() else {
            return;
        };

        let Some(player) = self.players.get_mut(idx) else {
            return;
        };

        let PlayerCards::Cards(c1, c2) = player.hole_cards else {
            return;
        };

        let view = BotView {
            hole_cards: [c1, c2],
            board: &self.board,
            pot: self.pot,
            amount_to_call: self.current_bet - player.bet,
            min_raise: self.last_raise,
            stack: player.chips,
        };

        let Some(action) = player
            .bot
            .as_mut()
            .map(|bot| bot.execute(&view, &mut self.rng))
        else {
            return;
        };

        if !self.act(idx, action).await {
            debug!("Bot at seat {idx} illegal action {action:?}");
            if !self.act(idx, PlayerAction::Check).await {
                self.act(idx, PlayerAction::Fold).await;
            }
        }
    }

    /// The current human player runs out of time and folds.
    async fn turn_timeout(&mut self) {
        let Some(idx) = self.players.current() else {
            return;
        };

        if let Some(player) = self.players.get(idx) {
            info!(
                "Player {} action timeout on table {}",
                player.player_id, self.table_id
            );
            player.send(Message::TurnTimerExpired).await;
        }

        self.act(idx, PlayerAction::Fold).await;
    }

    /// Applies an action for the player at seat `idx` and moves the game on.
    ///
    /// Returns false if the action is not legal.
    async fn act(&mut self, idx: usize, action: PlayerAction) -> bool {
        let Some((label, amount)) = self.apply_action(idx, action) else {
            return false;
        };

        if let Some(player) = self.players.get(idx) {
            debug!(
                "Table {} player {} {} {amount}",
                self.table_id,
                player.nickname,
                label.label()
            );

            let msg = Message::PlayerActed {
                player_id: player.player_id,
                nickname: player.nickname.clone(),
                action: label,
                amount,
                is_bot: player.is_bot(),
            };
            self.broadcast(msg).await;
        }

        self.next_turn().await;
        self.broadcast_game_update().await;

        true
    }

    /// Validates and applies an action, returns the action label and the chips
    /// put in the pot.
    fn apply_action(&mut self, idx: usize, action: PlayerAction) -> Option<(ActionLabel, Chips)> {
        let table_bet = self.current_bet;
        let player = self.players.get_mut(idx)?;
        if !player.can_act() {
            return None;
        }

        let (label, amount) = match action {
            PlayerAction::Fold => {
                player.fold();
                (ActionLabel::Fold, Chips::ZERO)
            }
            PlayerAction::Check => {
                if player.bet != table_bet {
                    return None;
                }

                (ActionLabel::Check, Chips::ZERO)
            }
            PlayerAction::Call => {
                let amount = player.put_in(table_bet - player.bet);
                let label = if player.is_all_in {
                    ActionLabel::AllIn
                } else if amount == Chips::ZERO {
                    ActionLabel::Check
                } else {
                    ActionLabel::Call
                };

                (label, amount)
            }
            PlayerAction::Raise(increment) => {
                if increment == Chips::ZERO {
                    return None;
                }

                let amount = player.put_in(table_bet + increment - player.bet);

                // A short all in doesn't reopen the betting.
                if player.bet > table_bet {
                    self.last_raise = player.bet - table_bet;
                    self.current_bet = player.bet;
                    self.acted.clear();
                }

                let label = if player.is_all_in {
                    ActionLabel::AllIn
                } else {
                    ActionLabel::Raise
                };

                (label, amount)
            }
        };

        player.action = Some(label);
        self.acted.insert(player.player_id);
        self.pot += amount;

        Some((label, amount))
    }

    /// Checks if all players in the hand have acted.
    fn is_round_complete(&self) -> bool {
        if self.players.count_in_hand() < 2 {
            return true;
        }

        let mut can_act = self.players.iter().filter(|p| p.can_act());
        match self.players.count_can_act() {
            0 => true,
            // A lone player facing an all in must still call or fold.
            1 => can_act.all(|p| p.bet >= self.current_bet),
            _ => can_act.all(|p| p.bet == self.current_bet && self.acted.contains(&p.player_id)),
        }
    }

    /// Moves the turn to the next player or ends the betting round.
    async fn next_turn(&mut self) {
        self.cancel();

        if self.players.count_in_hand() < 2 {
            self.enter_showdown().await;
        } else if self.is_round_complete() {
            self.complete_round().await;
        } else {
            self.players.advance_turn();
            self.schedule(Step::Turn, self.config.turn_delay);
        }
    }

    /// Ends the betting round and deals the next street.
    async fn complete_round(&mut self) {
        self.cancel();

        self.players.end_round();
        self.current_bet = Chips::ZERO;
        self.last_raise = self.config.big_blind;
        self.acted.clear();

        match self.phase {
            Phase::PreFlop => {
                self.deck.burn();
                for _ in 0..3 {
                    self.board.push(self.deck.deal());
                }

                self.phase = Phase::Flop;
            }
            Phase::Flop | Phase::Turn => {
                self.deck.burn();
                self.board.push(self.deck.deal());

                self.phase = if self.phase == Phase::Flop {
                    Phase::Turn
                } else {
                    Phase::River
                };
            }
            Phase::River => {
                self.enter_showdown().await;
                return;
            }
            Phase::Waiting | Phase::Showdown => return,
        }

        debug!("Table {} dealt {} board {:?}", self.table_id, self.phase, self.board);

        if self.players.count_can_act() > 1 {
            let current = self.players.next_can_act(self.players.dealer());
            self.players.set_current(current);
            self.schedule(Step::Turn, self.config.round_delay);
        } else {
            self.schedule(Step::NextStreet, self.config.skip_delay);
        }

        self.broadcast_game_update().await;
    }

    /// Compares hands and pays the winners.
    async fn enter_showdown(&mut self) {
        self.cancel();

        self.phase = Phase::Showdown;
        self.players.end_round();
        self.current_bet = Chips::ZERO;
        self.acted.clear();

        // Players in the hand in seat order after the dealer.
        let in_hand = self
            .players
            .seats_after(self.players.dealer())
            .filter(|&idx| self.players.get(idx).is_some_and(Player::in_hand))
            .collect::<Vec<_>>();

        let pot = self.pot;
        self.pot = Chips::ZERO;

        let mut payoffs = Vec::new();
        let mut hands = None;

        match in_hand.as_slice() {
            [] => warn!("Table {} no players in hand, {pot} chips lost", self.table_id),
            [idx] => {
                // If one player left gets all the chips.
                if let Some(player) = self.players.get_mut(*idx) {
                    player.chips += pot;
                    payoffs.push(HandPayoff {
                        player_id: player.player_id,
                        nickname: player.nickname.clone(),
                        chips: pot,
                    });
                }
            }
            seats => {
                let rankings = seats
                    .iter()
                    .filter_map(|&idx| {
                        let player = self.players.get(idx)?;
                        let PlayerCards::Cards(c1, c2) = player.hole_cards else {
                            return None;
                        };

                        let mut cards = vec![c1, c2];
                        cards.extend_from_slice(&self.board);
                        Some((idx, HandRanking::eval(&cards)))
                    })
                    .collect::<Vec<_>>();

                let best = rankings.iter().map(|(_, r)| r).max().cloned();
                let winners = rankings
                    .iter()
                    .filter(|(_, r)| Some(r) == best.as_ref())
                    .map(|(idx, _)| *idx)
                    .collect::<Vec<_>>();

                payoffs = self.split_pot(pot, &winners);

                let revealed = rankings
                    .iter()
                    .filter_map(|(idx, ranking)| {
                        let player = self.players.get(*idx)?;
                        Some(RevealedHand {
                            player_id: player.player_id,
                            nickname: player.nickname.clone(),
                            cards: player.hole_cards,
                            hand_name: ranking.category().name().to_string(),
                            best: ranking.hand().to_vec(),
                        })
                    })
                    .collect();
                hands = Some(revealed);
            }
        }

        for payoff in &payoffs {
            info!(
                "Table {} player {} won {}",
                self.table_id, payoff.nickname, payoff.chips
            );
        }

        self.broadcast(Message::EndHand { payoffs, pot, hands })
            .await;

        self.players.end_hand();
        self.schedule(Step::StartHand, self.config.new_hand_delay);
        self.broadcast_game_update().await;
    }

    /// Splits the pot equally among the winners.
    fn split_pot(&mut self, pot: Chips, winners: &[usize]) -> Vec<HandPayoff> {
        if winners.is_empty() {
            warn!("Table {} no winners, {pot} chips lost", self.table_id);
            return Vec::new();
        }

        let share = pot / winners.len() as u32;
        let odd = pot % winners.len() as u32;

        let mut payoffs = Vec::with_capacity(winners.len());
        for (n, &idx) in winners.iter().enumerate() {
            let Some(player) = self.players.get_mut(idx) else {
                continue;
            };

            let mut chips = share;
            if n == 0 && self.config.odd_chips == OddChips::FirstWinner {
                chips += odd;
            }

            player.chips += chips;
            payoffs.push(HandPayoff {
                player_id: player.player_id,
                nickname: player.nickname.clone(),
                chips,
            });
        }

        if odd > Chips::ZERO && self.config.odd_chips == OddChips::Discard {
            warn!(
                "Table {} split pot {pot} discarded {odd} chips",
                self.table_id
            );
        }

        payoffs
    }

    /// The last human left during a hand, give back the chips and wait.
    fn abandon_hand(&mut self) {
        self.cancel();

        for player in self.players.iter_mut() {
            player.chips += player.committed;
            self.pot -= player.committed;
            player.committed = Chips::ZERO;
        }

        if self.pot > Chips::ZERO {
            warn!(
                "Table {} hand abandoned, {} chips lost",
                self.table_id, self.pot
            );
        }

        let _ = self.players.start_hand();
        self.phase = Phase::Waiting;
        self.board.clear();
        self.pot = Chips::ZERO;
        self.current_bet = Chips::ZERO;
        self.acted.clear();

        info!("Table {} hand abandoned", self.table_id);
    }

    /// The table state as seen by the given player.
    fn snapshot_for(&self, viewer: &PlayerId) -> TableSnapshot {
        let players = self
            .players
            .iter()
            .map(|p| {
                let cards = match p.hole_cards {
                    PlayerCards::Cards(..) if &p.player_id == viewer => p.hole_cards,
                    PlayerCards::Cards(..) if p.in_hand() => PlayerCards::Covered,
                    _ => PlayerCards::None,
                };

                PlayerUpdate {
                    player_id: p.player_id,
                    nickname: p.nickname.clone(),
                    chips: p.chips,
                    bet: p.bet,
                    action: p.action,
                    cards,
                    is_bot: p.is_bot(),
                    has_folded: p.has_folded,
                    is_all_in: p.is_all_in,
                    has_button: p.has_button,
                }
            })
            .collect();

        TableSnapshot {
            table_id: self.table_id,
            phase: self.phase,
            players,
            board: self.board.clone(),
            pot: self.pot,
            current_bet: self.current_bet,
            dealer: self.players.dealer(),
            current_player: self.players.current_player().map(|p| p.player_id),
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            paused: self.paused,
        }
    }

    /// Send each human player the game state they can see.
    async fn broadcast_game_update(&self) {
        for player in self.players.iter().filter(|p| !p.is_bot()) {
            let msg = Message::GameUpdate(self.snapshot_for(&player.player_id));
            player.send(msg).await;
        }
    }

    /// Broadcast a message to all players at the table.
    async fn broadcast(&self, msg: Message) {
        for player in self.players.iter() {
            player.send(msg.clone()).await;
        }
    }
}
