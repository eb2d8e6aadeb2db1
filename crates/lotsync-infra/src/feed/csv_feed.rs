//! CSV dealer feed: acquired over HTTP or copied from a directory

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::StringRecord;
use lotsync_domain::repository::FeedImporter;
use lotsync_types::{Error, Result, Vehicle};
use tracing::{debug, info};

use super::translator::translate;

/// Public location of the demo dealer feed
pub const DEFAULT_FEED_URL: &str = "https://gist.githubusercontent.com/mm53bar/26bd794c9245191f7407a5c7441c4969/raw/87df2a61b650a43001c875cb203df7929580ba90/";

/// Where feed files are fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Base URL; the feed name is appended
    Url(String),
    /// Local directory holding feed files
    Directory(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` locations are URLs, anything else a directory
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            FeedSource::Url(source.to_string())
        } else {
            FeedSource::Directory(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// One data row of the feed with the feed's heading row
#[derive(Debug, Clone)]
pub struct CsvFeedRecord {
    pub headings: Arc<StringRecord>,
    pub values: StringRecord,
}

/// Importer for the CSV dealer feed
pub struct CsvFeedImporter {
    source: FeedSource,
    work_dir: PathBuf,
}

impl CsvFeedImporter {
    pub fn new(source: FeedSource, work_dir: PathBuf) -> Self {
        Self { source, work_dir }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Where an acquired feed is kept
    pub fn working_path(&self, filename: &str) -> PathBuf {
        self.work_dir.join(filename)
    }

    fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        let failed = |reason: String| Error::Acquisition {
            name: filename.to_string(),
            reason,
        };

        match &self.source {
            FeedSource::Url(base) => {
                let url = format!("{}/{}", base.trim_end_matches('/'), filename);
                let resp = reqwest::blocking::get(&url)
                    .map_err(|e| failed(format!("GET {}: {}", url, e)))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(failed(format!("GET {}: status {}", url, status.as_u16())));
                }
                let body = resp
                    .bytes()
                    .map_err(|e| failed(format!("reading response from {}: {}", url, e)))?;
                Ok(body.to_vec())
            }
            FeedSource::Directory(dir) => {
                let path = dir.join(filename);
                fs::read(&path).map_err(|e| failed(format!("{}: {}", path.display(), e)))
            }
        }
    }
}

/// At least one byte of the file can be read
fn has_content(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buf = [0u8; 1];
    matches!(file.read(&mut buf), Ok(1))
}

impl FeedImporter for CsvFeedImporter {
    type Record = CsvFeedRecord;

    fn acquire_records(&self, filename: &str) -> Result<()> {
        let bytes = self.fetch(filename)?;
        fs::create_dir_all(&self.work_dir)?;
        let path = self.working_path(filename);
        fs::write(&path, &bytes)?;
        info!(source = %self.source, path = %path.display(), bytes = bytes.len(), "feed acquired");
        Ok(())
    }

    fn has_acquired(&self, filename: &str) -> bool {
        has_content(&self.working_path(filename))
    }

    fn load_records(&self, filename: &str) -> Result<Vec<CsvFeedRecord>> {
        let path = self.working_path(filename);
        let mut reader = csv::Reader::from_path(&path)?;
        let headings = Arc::new(reader.headers()?.clone());

        let mut records = Vec::new();
        for values in reader.records() {
            records.push(CsvFeedRecord {
                headings: Arc::clone(&headings),
                values: values?,
            });
        }
        debug!(path = %path.display(), headings = headings.len(), records = records.len(), "feed staged");
        Ok(records)
    }

    fn process_record(&self, record: &CsvFeedRecord) -> Result<Vehicle> {
        Ok(translate(&record.headings, &record.values)?)
    }
}
