// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Result, bail};
use clap::Parser;
use log::error;
use std::time::Duration;

use holdem_core::poker::Chips;
use holdem_server::{
    config::{BotConfig, OddChips, TableConfig},
    console,
};

#[derive(Debug, Parser)]
struct Cli {
    /// The player nickname.
    #[clap(long, short, default_value = "Player")]
    nickname: String,
    /// The small blind.
    #[clap(long, default_value_t = 10)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 20)]
    big_blind: u32,
    /// The chips each player starts with.
    #[clap(long, default_value_t = 1_000)]
    buy_in: u32,
    /// The table bots as a list of name:difficulty.
    #[clap(
        long,
        value_delimiter = ',',
        default_value = "Alice:easy,Bob:medium,Charlie:hard"
    )]
    bots: Vec<BotConfig>,
    /// Seconds a player has to act.
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=600))]
    action_timeout: u64,
    /// Seed for shuffling and bot decisions.
    #[clap(long)]
    seed: Option<u64>,
    /// What to do with the chips left from a split pot.
    #[clap(long, value_enum, default_value_t = OddChips::Discard)]
    odd_chips: OddChips,
}

async fn run(cli: Cli) -> Result<()> {
    if cli.small_blind == 0 || cli.small_blind > cli.big_blind {
        bail!(
            "Invalid blinds {}/{}, the small blind must be positive and not above the big blind",
            cli.small_blind,
            cli.big_blind
        );
    }

    if cli.bots.is_empty() {
        bail!("At least one bot is needed");
    }

    let config = TableConfig {
        small_blind: Chips::new(cli.small_blind),
        big_blind: Chips::new(cli.big_blind),
        buy_in: Chips::new(cli.buy_in),
        bots: cli.bots,
        action_timeout: Duration::from_secs(cli.action_timeout),
        seed: cli.seed,
        odd_chips: cli.odd_chips,
        ..TableConfig::default()
    };

    console::run(config, &cli.nickname).await
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{e}");
    }
}
