//! orgscrape CLI: extract nonprofit organization profiles from web pages.
//!
//! Scrapes one or more URLs from the terminal, or serves the scrape API.

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
