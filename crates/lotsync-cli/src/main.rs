//! Lotsync - dealer inventory feed reconciliation
//!
//! A CLI tool that imports a dealer feed and replaces each lot's persisted
//! inventory with what the feed says is on the lot.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
