//! CLI definition using clap

use clap::{Parser, Subcommand};
use lotsync_types::{LotType, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lotsync")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Full-replace import of dealer inventory feeds")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Inventory store directory. Uses config value if not specified.
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Acquire the dealer feed and reconcile it into the inventory
    Import {
        /// Feed file name. Uses config value if not specified.
        #[arg(long)]
        file: Option<String>,

        /// Base URL or local directory to acquire the feed from
        #[arg(long)]
        source: Option<String>,

        /// Stop once the feed is acquired
        #[arg(long)]
        acquire_only: bool,
    },

    /// List persisted inventory
    Inventory {
        /// Dealer id. Lists known lots if not specified.
        #[arg(long, short = 'd')]
        dealer: Option<i64>,

        /// Restrict to one lot type
        #[arg(long, short = 't')]
        lot_type: Option<LotType>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set feed file name
        #[arg(long)]
        set_file: Option<String>,

        /// Set feed source (URL or directory)
        #[arg(long)]
        set_source: Option<String>,

        /// Set feed working directory
        #[arg(long)]
        set_work_dir: Option<PathBuf>,

        /// Set inventory store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Enable/disable processing after acquisition
        #[arg(long)]
        set_processing: Option<bool>,

        /// Set last-modified-by tag for importer writes
        #[arg(long)]
        set_actor: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
