//! Repository and importer adapters for the infrastructure layer

use lotsync_infra::feed::CsvFeedImporter;
use lotsync_infra::persistence::FileInventoryRepository;
use lotsync_types::Result;

use crate::config::Config;

/// Open file-based inventory repository
pub fn open_inventory_repo(config: &Config) -> Result<FileInventoryRepository> {
    let store_dir = config.store_dir()?;
    FileInventoryRepository::open(store_dir)
}

/// CSV feed importer for the configured source and working directory
pub fn open_feed_importer(config: &Config) -> CsvFeedImporter {
    CsvFeedImporter::new(config.feed_source(), config.work_dir())
}
