// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em table engine.
//!
//! Each [Table] runs in its own task that owns the table state, players join
//! tables through the [TableManager] and receive [TableMessage]s on their
//! channel.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod config;
pub mod console;
pub mod table;
pub mod table_manager;

pub use config::{BotConfig, OddChips, TableConfig};
pub use table::{Table, TableError, TableMessage};
pub use table_manager::TableManager;
