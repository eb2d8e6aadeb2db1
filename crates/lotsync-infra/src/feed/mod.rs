//! Feed importers

mod csv_feed;
mod translator;

pub use csv_feed::{CsvFeedImporter, CsvFeedRecord, FeedSource, DEFAULT_FEED_URL};
pub use translator::translate;
