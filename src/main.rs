mod aggregate;
mod cli;
mod config;
mod error;
mod hierarchy;
mod output;
mod reader;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting pipetree - CI/CD usage export converter");
    cli.execute()?;

    Ok(())
}
