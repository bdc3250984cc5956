//! storebot binary. Config from env (.env supported) and CLI flags.

use anyhow::Result;
use clap::Parser;
use storebot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { port, dev } => {
            let config = load_config(port, dev)?;
            run_bot(config).await
        }
    }
}
