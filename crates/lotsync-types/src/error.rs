//! Error types for lotsync

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Errors translating a single feed record into a vehicle
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Unable to process unknown heading '{heading}' in column {column}")]
    UnknownHeading { heading: String, column: usize },

    #[error("Unable to parse {field} ({value})")]
    InvalidValue { field: &'static str, value: String },

    #[error("Record has {values} values for {headings} headings")]
    ShapeMismatch { headings: usize, values: usize },
}

/// Persistence operation that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Query,
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Query => write!(f, "query"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Acquiring {name}: {reason}")]
    Acquisition { name: String, reason: String },

    #[error("Processing record {index}: {source}")]
    Translation {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Persistence {operation} failed for {vehicle}: {source}")]
    Persistence {
        operation: Operation,
        vehicle: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Wrap a store failure with the operation and subject it concerned
    pub fn persistence(operation: Operation, vehicle: impl std::fmt::Display, source: Error) -> Self {
        Error::Persistence {
            operation,
            vehicle: vehicle.to_string(),
            source: Box::new(source),
        }
    }

    /// Attach a record's feed position to a translation failure
    pub fn translation(index: usize, source: Error) -> Self {
        Error::Translation {
            index,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_message_carries_index() {
        let err = Error::translation(
            3,
            RecordError::UnknownHeading {
                heading: "Colour".to_string(),
                column: 7,
            }
            .into(),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Processing record 3:"), "{}", msg);
        assert!(msg.contains("'Colour' in column 7"), "{}", msg);
    }

    #[test]
    fn test_persistence_message() {
        let err = Error::persistence(Operation::Delete, "#4", Error::NotFound("vehicle 4".to_string()));
        assert_eq!(
            err.to_string(),
            "Persistence delete failed for #4: Not found: vehicle 4"
        );
    }
}
