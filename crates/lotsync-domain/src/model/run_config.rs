//! Settings for a single import run

use lotsync_types::IMPORT_ACTOR;

/// Behaviour of a FullReplaceRunner
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Feed file this run is concerned with, with no directory prefix
    pub filename: String,
    /// When false the run stops once the feed is acquired
    pub do_processing: bool,
    /// Tag recorded as last-modified-by on importer writes
    pub actor: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filename: "dealer_import.csv".to_string(),
            do_processing: true,
            actor: IMPORT_ACTOR.to_string(),
        }
    }
}

impl RunConfig {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_processing(mut self, do_processing: bool) -> Self {
        self.do_processing = do_processing;
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}
