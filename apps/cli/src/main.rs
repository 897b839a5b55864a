//! KitGuide CLI — robotics kit tutoring backend.
//!
//! Serves the chat API and runs one-off kit lookups and chat turns
//! against the local kit dataset.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
