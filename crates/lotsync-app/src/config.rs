//! Configuration management for lotsync
//!
//! Config stored at: ~/.config/lotsync/config.toml

use lotsync_domain::model::RunConfig;
use lotsync_infra::feed::{FeedSource, DEFAULT_FEED_URL};
use lotsync_types::{ConfigError, OutputFormat, Result, IMPORT_ACTOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Feed file name, without directory
    #[serde(default = "default_feed_filename")]
    pub feed_filename: String,

    /// Base URL or local directory the feed is acquired from
    #[serde(default = "default_feed_source")]
    pub feed_source: String,

    /// Where acquired feeds are kept (default: system temp dir)
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Inventory store directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Reconcile after acquiring; false stops after acquisition
    #[serde(default = "default_true")]
    pub do_processing: bool,

    /// Last-modified-by tag for importer writes
    #[serde(default = "default_actor")]
    pub actor: String,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_feed_filename() -> String {
    "dealer_import.csv".to_string()
}

fn default_feed_source() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_actor() -> String {
    IMPORT_ACTOR.to_string()
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_filename: default_feed_filename(),
            feed_source: default_feed_source(),
            work_dir: None,
            store_dir: None,
            do_processing: true,
            actor: default_actor(),
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("lotsync");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the inventory store directory
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("lotsync");
        Ok(store_dir)
    }

    /// Get the feed working directory
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn feed_source(&self) -> FeedSource {
        FeedSource::parse(&self.feed_source)
    }

    /// Runner settings carried by this config
    pub fn run_config(&self) -> RunConfig {
        RunConfig::default()
            .with_filename(self.feed_filename.clone())
            .with_processing(self.do_processing)
            .with_actor(self.actor.clone())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a specific file; a missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lotsync Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "Feed file:      {}", self.feed_filename)?;
        writeln!(f, "Feed source:    {}", self.feed_source)?;
        writeln!(f, "Work dir:       {}", self.work_dir().display())?;
        writeln!(
            f,
            "Store dir:      {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Processing:     {}", self.do_processing)?;
        writeln!(f, "Actor:          {}", self.actor)?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
