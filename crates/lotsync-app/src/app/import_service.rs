//! Import Service - feed acquisition and full-replace reconciliation
//!
//! The service resolves per-invocation overrides against the configuration,
//! opens the file-backed store and the CSV importer, and hands both to a
//! `FullReplaceRunner`.

use lotsync_domain::model::RunSummary;
use lotsync_domain::repository::InventoryRepository;
use lotsync_domain::service::FullReplaceRunner;
use lotsync_types::{Lot, LotType, Result, Vehicle};
use tracing::info;

use crate::config::Config;
use crate::repository::{open_feed_importer, open_inventory_repo};

/// Per-invocation overrides for an import
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Feed file name override
    pub filename: Option<String>,

    /// Feed source override (URL or directory)
    pub source: Option<String>,

    /// Stop after acquisition
    pub acquire_only: bool,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(mut self, filename: String) -> Self {
        self.filename = Some(filename);
        self
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_acquire_only(mut self, acquire_only: bool) -> Self {
        self.acquire_only = acquire_only;
        self
    }

    /// Config with these overrides applied
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(ref filename) = self.filename {
            config.feed_filename = filename.clone();
        }
        if let Some(ref source) = self.source {
            config.feed_source = source.clone();
        }
        if self.acquire_only {
            config.do_processing = false;
        }
        config
    }
}

/// Acquire the configured feed if needed and reconcile it into the store
pub fn run_import(config: &Config, options: &ImportOptions) -> Result<RunSummary> {
    let config = options.apply(config);
    let repo = open_inventory_repo(&config)?;
    let importer = open_feed_importer(&config);

    info!(
        feed = %config.feed_filename,
        source = %importer.source(),
        store = %config.store_dir()?.display(),
        "starting import"
    );
    FullReplaceRunner::new(config.run_config()).run(&importer, &repo)
}

/// Persisted vehicles of a dealer, for one lot type or both, in id order
pub fn list_inventory(
    config: &Config,
    dealer_id: i64,
    lot_type: Option<LotType>,
) -> Result<Vec<Vehicle>> {
    let repo = open_inventory_repo(config)?;
    let lot_types = match lot_type {
        Some(lot_type) => vec![lot_type],
        None => vec![LotType::New, LotType::Used],
    };

    let mut vehicles = Vec::new();
    for lot_type in lot_types {
        vehicles.extend(repo.query(dealer_id, lot_type)?);
    }
    vehicles.sort_by_key(|v| v.id);
    Ok(vehicles)
}

/// Lots that have persisted vehicles
pub fn list_lots(config: &Config) -> Result<Vec<Lot>> {
    Ok(open_inventory_repo(config)?.lots())
}
