//! Error handling for field and weather remediation.
//!
//! Every failure carries an [`ErrorKind`] so callers can tell load-time
//! problems (which abort the run) from row-level data problems.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a [`MajiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Connection,
    Query,
    SchemaMismatch,
    Parse,
    DataQuality,
    Config,
    Internal,
}

#[derive(Error, Debug)]
pub enum MajiError {
    #[error("Could not reach source {location}: {reason}")]
    Connection { location: String, reason: String },

    #[error("Query failed: {reason}")]
    Query {
        reason: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("Schema mismatch in {table}: missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        table: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Unparseable weather message at row {row}: {message:?} ({reason})")]
    Parse {
        row: usize,
        message: String,
        reason: String,
    },

    #[error("Data quality check failed at row {row}: {reason}")]
    DataQuality { row: usize, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl MajiError {
    /// Create a connection error for an unreachable location
    pub fn connection(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connection {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a data quality error for a single row
    pub fn data_quality(row: usize, reason: impl Into<String>) -> Self {
        Self::DataQuality {
            row,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MajiError::Connection { .. } => ErrorKind::Connection,
            MajiError::Query { .. } => ErrorKind::Query,
            MajiError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            MajiError::Parse { .. } => ErrorKind::Parse,
            MajiError::DataQuality { .. } => ErrorKind::DataQuality,
            MajiError::Config { .. } => ErrorKind::Config,
            MajiError::Io(_) | MajiError::Polars(_) => ErrorKind::Internal,
        }
    }

    /// Load-time errors mean the run cannot proceed at all
    pub fn is_load_time(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Connection | ErrorKind::Query | ErrorKind::SchemaMismatch
        )
    }
}

impl From<rusqlite::Error> for MajiError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Query {
            reason: error.to_string(),
            source: Some(error),
        }
    }
}

pub type Result<T> = std::result::Result<T, MajiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            MajiError::connection("db.sqlite", "missing").kind(),
            ErrorKind::Connection
        );
        assert_eq!(MajiError::config("bad").kind(), ErrorKind::Config);
        assert_eq!(
            MajiError::data_quality(3, "negative elevation").kind(),
            ErrorKind::DataQuality
        );
    }

    #[test]
    fn test_load_time_classification() {
        let schema = MajiError::SchemaMismatch {
            table: "field".to_string(),
            missing: vec!["Elevation".to_string()],
            unexpected: vec![],
        };
        assert!(schema.is_load_time());
        assert!(!MajiError::data_quality(0, "x").is_load_time());
    }
}
