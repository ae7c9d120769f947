// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Console transport, reads commands from stdin and prints table events.
use anyhow::{Result, bail};
use log::info;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    signal,
    sync::{broadcast, mpsc},
};

use holdem_core::{
    message::{Message, PlayerAction, TableSnapshot},
    poker::{Chips, PlayerCards, PlayerId},
};

use crate::{config::TableConfig, table::TableMessage, table_manager::TableManager};

/// A command typed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// A betting action.
    Action(PlayerAction),
    /// Pause or resume the table.
    Pause,
    /// Leave the table.
    Quit,
}

/// Parses a command line, returns none for an empty line.
fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut tokens = line.split_whitespace();
    let Some(cmd) = tokens.next() else {
        return Ok(None);
    };

    let cmd = match cmd.to_lowercase().as_str() {
        "f" | "fold" => Command::Action(PlayerAction::Fold),
        "k" | "check" => Command::Action(PlayerAction::Check),
        "c" | "call" => Command::Action(PlayerAction::Call),
        "r" | "raise" => {
            let Some(amount) = tokens.next() else {
                bail!("Missing raise amount");
            };

            let Ok(amount) = amount.parse::<u32>() else {
                bail!("Invalid raise amount {amount}");
            };

            if amount == 0 {
                bail!("Raise amount must be positive");
            }

            Command::Action(PlayerAction::Raise(Chips::new(amount)))
        }
        "p" | "pause" => Command::Pause,
        "q" | "quit" => Command::Quit,
        cmd => bail!("Unknown command {cmd}"),
    };

    if tokens.next().is_some() {
        bail!("Too many arguments");
    }

    Ok(Some(cmd))
}

/// Prints table events for the console player.
#[derive(Debug)]
struct Printer {
    player_id: PlayerId,
    last: Option<TableSnapshot>,
}

impl Printer {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            last: None,
        }
    }

    fn print(&mut self, msg: Message) {
        match msg {
            Message::TableJoined {
                table_id,
                chips,
                seats,
                ..
            } => {
                println!("Joined table {table_id} with {chips} chips, {seats} seats taken");
                println!("Commands: fold, check, call, raise <chips>, pause, quit");
            }
            Message::PlayerJoined {
                nickname, chips, ..
            } => println!("{nickname} joined with {chips} chips"),
            Message::PlayerLeft(player_id) => {
                let nickname = self.nickname(player_id);
                println!("{nickname} left the table");
            }
            Message::GameUpdate(snapshot) => {
                let phase_changed = self.last.as_ref().is_none_or(|s| s.phase != snapshot.phase);
                if phase_changed && snapshot.phase.is_betting() {
                    print_board(&snapshot);
                }

                self.last = Some(snapshot);
            }
            Message::PlayerActed {
                nickname,
                action,
                amount,
                ..
            } => {
                if amount > Chips::ZERO {
                    println!("{nickname} {} {amount}", action.label());
                } else {
                    println!("{nickname} {}", action.label());
                }
            }
            Message::TurnTimerStarted {
                player_id,
                duration_ms,
            } if player_id == self.player_id => self.print_turn(duration_ms),
            Message::TurnTimerStarted { .. } => {}
            Message::TurnTimerExpired => println!("Time is up, you folded"),
            Message::EndHand {
                payoffs,
                pot,
                hands,
            } => {
                for hand in hands.unwrap_or_default() {
                    let cards = match hand.cards {
                        PlayerCards::Cards(c1, c2) => format!("{c1} {c2}"),
                        _ => String::from("-"),
                    };

                    let best = hand
                        .best
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(" ");
                    println!("{} shows {cards}: {} ({best})", hand.nickname, hand.hand_name);
                }

                for payoff in payoffs {
                    println!("{} wins {} of {pot}", payoff.nickname, payoff.chips);
                }
            }
            Message::Paused(true) => println!("Table paused"),
            Message::Paused(false) => println!("Table resumed"),
            Message::ActionResponse(_) | Message::TogglePause => {}
        }
    }

    fn print_turn(&self, duration_ms: u64) {
        let Some(snapshot) = &self.last else {
            return;
        };

        let Some(me) = snapshot.players.iter().find(|p| p.player_id == self.player_id) else {
            return;
        };

        if let PlayerCards::Cards(c1, c2) = me.cards {
            println!("Your cards {c1} {c2}, chips {}", me.chips);
        }

        let to_call = snapshot.current_bet - me.bet;
        let secs = duration_ms / 1000;
        if to_call > Chips::ZERO {
            println!("Pot {}, {to_call} to call [{secs}s]", snapshot.pot);
        } else {
            println!("Pot {}, check or raise [{secs}s]", snapshot.pot);
        }
    }

    fn nickname(&self, player_id: PlayerId) -> String {
        self.last
            .as_ref()
            .and_then(|s| s.players.iter().find(|p| p.player_id == player_id))
            .map(|p| p.nickname.clone())
            .unwrap_or_else(|| player_id.to_string())
    }
}

fn print_board(snapshot: &TableSnapshot) {
    let board = snapshot
        .board
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    if board.is_empty() {
        println!("--- {} ---", snapshot.phase);
    } else {
        println!("--- {} --- {board}", snapshot.phase);
    }

    for p in &snapshot.players {
        let button = if p.has_button { " (D)" } else { "" };
        println!("  {}{button}: {} chips", p.nickname, p.chips);
    }
}

/// Runs a table with one console player until the player quits.
pub async fn run(config: TableConfig, nickname: &str) -> Result<()> {
    let shutdown_signal = signal::ctrl_c();
    tokio::pin!(shutdown_signal);

    let (shutdown_broadcast_tx, _) = broadcast::channel(1);
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel(1);

    let manager = TableManager::new(config, &shutdown_broadcast_tx, &shutdown_complete_tx);

    let player_id = manager.new_player_id();
    let (table_tx, mut table_rx) = mpsc::channel(128);
    let table = manager.join(player_id, nickname, table_tx).await?;

    let mut printer = Printer::new(player_id);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let res = loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Received shutdown signal...");
                break Ok(());
            }
            res = lines.next_line() => match res {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(Some(Command::Action(action))) => {
                        table.message(player_id, Message::ActionResponse(action)).await;
                    }
                    Ok(Some(Command::Pause)) => {
                        table.message(player_id, Message::TogglePause).await;
                    }
                    Ok(Some(Command::Quit)) => break Ok(()),
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                },
                Ok(None) => break Ok(()),
                Err(err) => break Err(err.into()),
            },
            msg = table_rx.recv() => match msg {
                Some(TableMessage::Send(msg)) => printer.print(msg),
                Some(TableMessage::PlayerLeft) => {
                    println!("You have no chips left");
                    break Ok(());
                }
                Some(TableMessage::Close) | None => break Ok(()),
            },
        }
    };

    manager.leave(table.table_id(), player_id).await;
    drop(table);

    // Notify all tables to start shutdown then wait for all tables to
    // terminate and drop their shutdown channel.
    let _ = shutdown_broadcast_tx.send(());
    drop(manager);
    drop(shutdown_broadcast_tx);
    drop(shutdown_complete_tx);
    let _ = shutdown_complete_rx.recv().await;

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        let parse = |s: &str| parse_command(s).unwrap();

        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("fold"), Some(Command::Action(PlayerAction::Fold)));
        assert_eq!(parse("K"), Some(Command::Action(PlayerAction::Check)));
        assert_eq!(parse(" call "), Some(Command::Action(PlayerAction::Call)));
        assert_eq!(
            parse("raise 120"),
            Some(Command::Action(PlayerAction::Raise(Chips::new(120))))
        );
        assert_eq!(parse("pause"), Some(Command::Pause));
        assert_eq!(parse("q"), Some(Command::Quit));
    }

    #[test]
    fn printer_tracks_table_events() {
        use holdem_core::{
            message::{ActionLabel, PlayerUpdate},
            poker::{Phase, TableId},
        };

        let me = PlayerId::new(1);
        let bot = PlayerId::new(u64::MAX);
        let seat = |player_id, nickname: &str| PlayerUpdate {
            player_id,
            nickname: nickname.to_string(),
            chips: Chips::new(1_000),
            bet: Chips::ZERO,
            action: None,
            cards: PlayerCards::None,
            is_bot: player_id == bot,
            has_folded: false,
            is_all_in: false,
            has_button: false,
        };

        let mut printer = Printer::new(me);
        assert_eq!(printer.nickname(bot), bot.to_string());

        let snapshot = TableSnapshot {
            table_id: TableId::new(1),
            phase: Phase::PreFlop,
            players: vec![seat(me, "Human"), seat(bot, "Alice")],
            board: Vec::new(),
            pot: Chips::new(30),
            current_bet: Chips::new(20),
            dealer: 0,
            current_player: Some(me),
            small_blind: Chips::new(10),
            big_blind: Chips::new(20),
            paused: false,
        };

        // Every table event is accepted by the printer.
        let msgs = vec![
            Message::GameUpdate(snapshot),
            Message::TurnTimerStarted {
                player_id: me,
                duration_ms: 10_000,
            },
            Message::PlayerActed {
                player_id: bot,
                nickname: "Alice".to_string(),
                action: ActionLabel::Call,
                amount: Chips::new(20),
                is_bot: true,
            },
            Message::TurnTimerExpired,
            Message::Paused(true),
            Message::EndHand {
                payoffs: Vec::new(),
                pot: Chips::new(60),
                hands: None,
            },
        ];

        for msg in msgs {
            printer.print(msg);
        }

        assert_eq!(printer.nickname(bot), "Alice");
        assert_eq!(printer.last.as_ref().unwrap().pot, Chips::new(30));
    }

    #[test]
    fn parse_errors() {
        assert!(parse_command("raise").is_err());
        assert!(parse_command("raise ten").is_err());
        assert!(parse_command("raise 0").is_err());
        assert!(parse_command("call 10").is_err());
        assert!(parse_command("allin").is_err());
    }
}
