// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A table where players play hands.
use anyhow::Result;
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Instant};
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    time::{self, Duration},
};

use holdem_core::{
    message::Message,
    poker::{PlayerId, TableId},
};

use crate::config::TableConfig;

mod player;
mod state;

use state::State;

/// Errors returned when joining a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// All human seats are taken.
    #[error("table is full")]
    TableFull,
    /// The player is already seated at this table.
    #[error("player has already joined")]
    AlreadyJoined,
    /// The table task has stopped.
    #[error("table is closed")]
    Closed,
}

/// A message sent to player connections.
#[derive(Debug)]
pub enum TableMessage {
    /// Sends a message to a client.
    Send(Message),
    /// The receiver left the table.
    PlayerLeft,
    /// Close a client connection.
    Close,
}

/// Handle to a table task, all table state is owned by the task.
#[derive(Debug)]
pub struct Table {
    /// This table id.
    table_id: TableId,
    /// Channel for sending commands.
    commands_tx: mpsc::Sender<TableCommand>,
}

/// Command for the table task.
#[derive(Debug)]
enum TableCommand {
    /// Join this table.
    Join {
        player_id: PlayerId,
        nickname: String,
        table_tx: mpsc::Sender<TableMessage>,
        resp_tx: oneshot::Sender<Result<(), TableError>>,
    },
    /// Leave this table, responds with the number of humans left.
    Leave {
        player_id: PlayerId,
        resp_tx: oneshot::Sender<usize>,
    },
    /// Handle a player message.
    Message { player_id: PlayerId, msg: Message },
}

impl Table {
    /// How often the table checks scheduled steps.
    const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Creates a new table and spawns its task.
    ///
    /// The table random numbers are seeded with `seed` if given.
    pub fn new(
        table_id: TableId,
        config: Arc<TableConfig>,
        seed: Option<u64>,
        shutdown_broadcast_rx: broadcast::Receiver<()>,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(128);

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut task = TableTask {
            table_id,
            state: State::with_rng(table_id, config, rng),
            commands_rx,
            shutdown_broadcast_rx,
            _shutdown_complete_tx: shutdown_complete_tx,
        };

        tokio::spawn(async move {
            if let Err(err) = task.run().await {
                error!("Table {} error {err}", task.table_id);
            }

            info!("Table task for table {} stopped", task.table_id);
        });

        Self {
            table_id,
            commands_tx,
        }
    }

    /// Returns this table id.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// A player joins this table.
    ///
    /// Returns error if the table is full or the player has already joined.
    pub async fn join(
        &self,
        player_id: PlayerId,
        nickname: &str,
        table_tx: mpsc::Sender<TableMessage>,
    ) -> Result<(), TableError> {
        let (resp_tx, resp_rx) = oneshot::channel();

        self.commands_tx
            .send(TableCommand::Join {
                player_id,
                nickname: nickname.to_string(),
                table_tx,
                resp_tx,
            })
            .await
            .map_err(|_| TableError::Closed)?;

        resp_rx.await.map_err(|_| TableError::Closed)?
    }

    /// A player leaves the table.
    ///
    /// Returns the number of humans still seated.
    pub async fn leave(&self, player_id: PlayerId) -> usize {
        let (resp_tx, resp_rx) = oneshot::channel();
        let cmd = TableCommand::Leave { player_id, resp_tx };
        if self.commands_tx.send(cmd).await.is_err() {
            return 0;
        }

        resp_rx.await.unwrap_or_default()
    }

    /// Handle a message from a player.
    pub async fn message(&self, player_id: PlayerId, msg: Message) {
        let _ = self
            .commands_tx
            .send(TableCommand::Message { player_id, msg })
            .await;
    }
}

struct TableTask {
    /// This table identifier.
    table_id: TableId,
    /// The table state.
    state: State,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// Channel for listening shutdown notification.
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    /// Sender that drops when this table is done.
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl TableTask {
    async fn run(&mut self) -> Result<()> {
        let mut ticks = time::interval(Table::TICK_INTERVAL);
        ticks.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        let res = loop {
            tokio::select! {
                // Server is shutting down exit this handler.
                _ = self.shutdown_broadcast_rx.recv() => break Ok(()),
                _ = ticks.tick() => {
                    self.state.tick(Instant::now()).await;
                }
                // We have received a command from a player connection.
                res = self.commands_rx.recv() => match res {
                    Some(TableCommand::Join { player_id, nickname, table_tx, resp_tx }) => {
                        let res = self.state.join(player_id, &nickname, table_tx).await;
                        let _ = resp_tx.send(res);
                    }
                    Some(TableCommand::Leave { player_id, resp_tx }) => {
                        let humans = self.state.leave(&player_id).await;
                        let _ = resp_tx.send(humans);
                    }
                    Some(TableCommand::Message { player_id, msg }) => {
                        self.state.message(&player_id, msg).await;
                    }
                    None => break Ok(()),
                },
            }
        };

        self.state.close().await;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTable {
        table: Table,
        _shutdown_broadcast_tx: broadcast::Sender<()>,
        _shutdown_complete_rx: mpsc::Receiver<()>,
    }

    impl TestTable {
        fn new(config: TableConfig) -> Self {
            let (shutdown_complete_tx, shutdown_complete_rx) = mpsc::channel(1);
            let (shutdown_broadcast_tx, _) = broadcast::channel(1);
            let table = Table::new(
                TableId::new(1),
                Arc::new(config),
                Some(42),
                shutdown_broadcast_tx.subscribe(),
                shutdown_complete_tx,
            );

            Self {
                table,
                _shutdown_broadcast_tx: shutdown_broadcast_tx,
                _shutdown_complete_rx: shutdown_complete_rx,
            }
        }
    }

    #[tokio::test]
    async fn join_and_leave() {
        let tt = TestTable::new(TableConfig::default());
        let (tx, mut rx) = mpsc::channel(128);

        let p1 = PlayerId::new(1);
        tt.table.join(p1, "Human", tx.clone()).await.unwrap();
        assert_eq!(
            tt.table.join(p1, "Human", tx.clone()).await,
            Err(TableError::AlreadyJoined)
        );
        assert_eq!(
            tt.table.join(PlayerId::new(2), "Other", tx).await,
            Err(TableError::TableFull)
        );

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, TableMessage::Send(Message::TableJoined { .. })));

        assert_eq!(tt.table.leave(p1).await, 0);
    }

    #[tokio::test]
    async fn shutdown_closes_connections() {
        let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel::<()>(1);
        let (shutdown_broadcast_tx, _) = broadcast::channel(1);
        let table = Table::new(
            TableId::new(1),
            Arc::new(TableConfig::default()),
            Some(1),
            shutdown_broadcast_tx.subscribe(),
            shutdown_complete_tx,
        );

        let (tx, mut rx) = mpsc::channel(128);
        table.join(PlayerId::new(1), "Human", tx).await.unwrap();

        let _ = shutdown_broadcast_tx.send(());
        assert!(shutdown_complete_rx.recv().await.is_none());

        let mut closed = false;
        while let Some(msg) = rx.recv().await {
            closed |= matches!(msg, TableMessage::Close);
        }

        assert!(closed);
        assert_eq!(table.leave(PlayerId::new(1)).await, 0);
    }
}
