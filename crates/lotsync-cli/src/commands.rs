//! Command handlers

use std::path::PathBuf;

use lotsync_app::app::{list_inventory, list_lots, run_import, ImportOptions};
use lotsync_app::config::Config;
use lotsync_types::{LotType, OutputFormat, Result};

use crate::cli::{Cli, Commands};
use crate::output::{output_inventory, output_lots, output_run_summary};

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Import {
            file,
            source,
            acquire_only,
        } => cmd_import(&config, file, source, acquire_only, output_format),
        Commands::Inventory { dealer, lot_type } => {
            cmd_inventory(&config, dealer, lot_type, output_format)
        }
        Commands::Config {
            show,
            set_file,
            set_source,
            set_work_dir,
            set_store_dir,
            set_processing,
            set_actor,
            set_output,
            reset,
        } => cmd_config(
            show,
            ConfigChanges {
                file: set_file,
                source: set_source,
                work_dir: set_work_dir,
                store_dir: set_store_dir,
                processing: set_processing,
                actor: set_actor,
                output: set_output,
            },
            reset,
        ),
    }
}

fn cmd_import(
    config: &Config,
    file: Option<String>,
    source: Option<String>,
    acquire_only: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let mut options = ImportOptions::new().with_acquire_only(acquire_only);
    if let Some(file) = file {
        options = options.with_filename(file);
    }
    if let Some(source) = source {
        options = options.with_source(source);
    }

    let summary = run_import(config, &options)?;
    output_run_summary(output_format, &summary)
}

fn cmd_inventory(
    config: &Config,
    dealer: Option<i64>,
    lot_type: Option<LotType>,
    output_format: OutputFormat,
) -> Result<()> {
    match dealer {
        Some(dealer_id) => {
            let vehicles = list_inventory(config, dealer_id, lot_type)?;
            output_inventory(output_format, &vehicles)
        }
        None => {
            let lots: Vec<_> = list_lots(config)?
                .into_iter()
                .filter(|lot| lot_type.map_or(true, |t| lot.lot_type == t))
                .collect();
            output_lots(output_format, &lots)
        }
    }
}

/// Values to write into the config file
struct ConfigChanges {
    file: Option<String>,
    source: Option<String>,
    work_dir: Option<PathBuf>,
    store_dir: Option<PathBuf>,
    processing: Option<bool>,
    actor: Option<String>,
    output: Option<OutputFormat>,
}

fn cmd_config(show: bool, changes: ConfigChanges, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(file) = changes.file {
        config.feed_filename = file;
        modified = true;
    }

    if let Some(source) = changes.source {
        config.feed_source = source;
        modified = true;
    }

    if let Some(work_dir) = changes.work_dir {
        config.work_dir = Some(work_dir);
        modified = true;
    }

    if let Some(store_dir) = changes.store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(do_processing) = changes.processing {
        config.do_processing = do_processing;
        modified = true;
    }

    if let Some(actor) = changes.actor {
        config.actor = actor;
        modified = true;
    }

    if let Some(output_format) = changes.output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
