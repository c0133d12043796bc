//! ProjectBook CLI: turn the year's project listing into a printable book.
//!
//! Logs in through the SSO gateway, scrapes every project title and
//! description, and renders them into a single PDF.

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
