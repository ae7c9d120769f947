// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Tables registry.
use ahash::AHashMap;
use anyhow::{Result, bail};
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use holdem_core::poker::{PlayerId, TableId};

use crate::{
    config::TableConfig,
    table::{Table, TableError, TableMessage},
};

/// The tables players can join, tables are created on demand.
#[derive(Debug, Clone)]
pub struct TableManager(Arc<Mutex<Shared>>);

#[derive(Debug)]
struct Shared {
    tables: AHashMap<TableId, Arc<Table>>,
    next_table_id: u32,
    next_player_id: u64,
    config: Arc<TableConfig>,
    shutdown_broadcast_tx: broadcast::Sender<()>,
    shutdown_complete_tx: mpsc::Sender<()>,
}

impl TableManager {
    /// Creates a new manager with no tables.
    pub fn new(
        config: TableConfig,
        shutdown_broadcast_tx: &broadcast::Sender<()>,
        shutdown_complete_tx: &mpsc::Sender<()>,
    ) -> Self {
        let state = Shared {
            tables: AHashMap::default(),
            next_table_id: 1,
            next_player_id: 1,
            config: Arc::new(config),
            shutdown_broadcast_tx: shutdown_broadcast_tx.clone(),
            shutdown_complete_tx: shutdown_complete_tx.clone(),
        };

        Self(Arc::new(Mutex::new(state)))
    }

    /// Allocates a new human player id.
    pub fn new_player_id(&self) -> PlayerId {
        let mut shared = self.0.lock();
        let player_id = PlayerId::new(shared.next_player_id);
        shared.next_player_id += 1;
        player_id
    }

    /// Creates a new table and spawns its task.
    pub fn create_table(&self) -> Arc<Table> {
        let mut shared = self.0.lock();

        let table_id = TableId::new(shared.next_table_id);
        shared.next_table_id += 1;

        // Each table gets its own seed so tables don't deal the same cards.
        let seed = shared
            .config
            .seed
            .map(|seed| seed.wrapping_add(table_id.id() as u64));

        let table = Arc::new(Table::new(
            table_id,
            shared.config.clone(),
            seed,
            shared.shutdown_broadcast_tx.subscribe(),
            shared.shutdown_complete_tx.clone(),
        ));

        shared.tables.insert(table_id, table.clone());
        info!("Created table {table_id}");

        table
    }

    /// Returns the table with the given id.
    pub fn get(&self, table_id: TableId) -> Option<Arc<Table>> {
        self.0.lock().tables.get(&table_id).cloned()
    }

    /// Removes a table, the table task stops when all handles are dropped.
    pub fn evict(&self, table_id: TableId) -> Option<Arc<Table>> {
        let table = self.0.lock().tables.remove(&table_id);
        if table.is_some() {
            info!("Evicted table {table_id}");
        }

        table
    }

    /// Returns the number of tables.
    pub fn count(&self) -> usize {
        self.0.lock().tables.len()
    }

    /// A player joins the first table with a free seat, or a new table.
    pub async fn join(
        &self,
        player_id: PlayerId,
        nickname: &str,
        table_tx: mpsc::Sender<TableMessage>,
    ) -> Result<Arc<Table>> {
        // Don't hold the lock while waiting for the table tasks.
        let mut tables = self.0.lock().tables.values().cloned().collect::<Vec<_>>();
        tables.sort_by_key(|t| t.table_id());

        for table in tables {
            match table.join(player_id, nickname, table_tx.clone()).await {
                Ok(()) => return Ok(table),
                Err(TableError::AlreadyJoined) => {
                    bail!("Player {player_id} already joined table {}", table.table_id())
                }
                Err(_) => continue,
            }
        }

        let table = self.create_table();
        if let Err(err) = table.join(player_id, nickname, table_tx).await {
            self.evict(table.table_id());
            bail!("Player {player_id} cannot join a new table: {err}");
        }

        Ok(table)
    }

    /// A player leaves a table, the table is evicted when no humans are left.
    pub async fn leave(&self, table_id: TableId, player_id: PlayerId) {
        let Some(table) = self.get(table_id) else {
            return;
        };

        if table.leave(player_id).await == 0 {
            self.evict(table_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestManager {
        manager: TableManager,
        _shutdown_broadcast_tx: broadcast::Sender<()>,
        _shutdown_complete_rx: mpsc::Receiver<()>,
    }

    impl TestManager {
        fn new(max_humans: usize) -> Self {
            let config = TableConfig {
                max_humans,
                seed: Some(7),
                ..TableConfig::default()
            };

            let (shutdown_complete_tx, shutdown_complete_rx) = mpsc::channel(1);
            let (shutdown_broadcast_tx, _) = broadcast::channel(1);
            let manager = TableManager::new(config, &shutdown_broadcast_tx, &shutdown_complete_tx);

            Self {
                manager,
                _shutdown_broadcast_tx: shutdown_broadcast_tx,
                _shutdown_complete_rx: shutdown_complete_rx,
            }
        }
    }

    struct TestPlayer {
        player_id: PlayerId,
        tx: mpsc::Sender<TableMessage>,
        _rx: mpsc::Receiver<TableMessage>,
    }

    impl TestPlayer {
        fn new(tm: &TestManager) -> Self {
            let (tx, rx) = mpsc::channel(1024);
            Self {
                player_id: tm.manager.new_player_id(),
                tx,
                _rx: rx,
            }
        }

        async fn join(&self, tm: &TestManager) -> Result<Arc<Table>> {
            tm.manager.join(self.player_id, "nn", self.tx.clone()).await
        }
    }

    #[tokio::test]
    async fn create_get_evict() {
        let tm = TestManager::new(1);
        assert_eq!(tm.manager.count(), 0);

        let t1 = tm.manager.create_table();
        let t2 = tm.manager.create_table();
        assert_ne!(t1.table_id(), t2.table_id());
        assert_eq!(tm.manager.count(), 2);

        let found = tm.manager.get(t1.table_id()).unwrap();
        assert_eq!(found.table_id(), t1.table_id());

        assert!(tm.manager.evict(t1.table_id()).is_some());
        assert!(tm.manager.get(t1.table_id()).is_none());
        assert!(tm.manager.evict(t1.table_id()).is_none());
        assert_eq!(tm.manager.count(), 1);
    }

    #[tokio::test]
    async fn joins_fill_tables_first() {
        let tm = TestManager::new(2);

        let p1 = TestPlayer::new(&tm);
        let p2 = TestPlayer::new(&tm);
        let p3 = TestPlayer::new(&tm);
        assert_ne!(p1.player_id, p2.player_id);

        let t1 = p1.join(&tm).await.unwrap();
        let t2 = p2.join(&tm).await.unwrap();
        assert_eq!(t1.table_id(), t2.table_id());
        assert_eq!(tm.manager.count(), 1);

        // The first table is full.
        let t3 = p3.join(&tm).await.unwrap();
        assert_ne!(t3.table_id(), t1.table_id());
        assert_eq!(tm.manager.count(), 2);

        // Joining twice fails.
        assert!(p1.join(&tm).await.is_err());
    }

    #[tokio::test]
    async fn last_human_leaving_evicts_table() {
        let tm = TestManager::new(2);

        let p1 = TestPlayer::new(&tm);
        let p2 = TestPlayer::new(&tm);
        let table = p1.join(&tm).await.unwrap();
        p2.join(&tm).await.unwrap();

        tm.manager.leave(table.table_id(), p1.player_id).await;
        assert!(tm.manager.get(table.table_id()).is_some());

        tm.manager.leave(table.table_id(), p2.player_id).await;
        assert!(tm.manager.get(table.table_id()).is_none());
        assert_eq!(tm.manager.count(), 0);

        // Leaving an evicted table is a no op.
        tm.manager.leave(table.table_id(), p2.player_id).await;
    }
}
