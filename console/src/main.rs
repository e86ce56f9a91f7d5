//! License issuer console.
//!
//! Usage:
//!   issuer-console --base-url https://licensing.example.com login -u acme
//!   issuer-console licenses list
//!
//! The credential is kept in a state file between invocations.

use std::io;

use anyhow::Result;
use clap::Parser;
use issuer_console::{Cli, Console};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let mut console = Console::new(&cli, io::stdout())?;
    console.run(cli.command).await
}
