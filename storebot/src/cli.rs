//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "storebot")]
#[command(about = "Store demo bot over an HTTP activity endpoint", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; flags override PORT and BOT_ENV).
    Run {
        #[arg(short, long)]
        port: Option<u16>,
        /// Development wiring: emulator transport and the /sdk management API.
        #[arg(long)]
        dev: bool,
    },
}

/// Load BotConfig from environment, applying CLI overrides.
pub fn load_config(port: Option<u16>, dev: bool) -> Result<BotConfig> {
    BotConfig::load(port, dev)
}
