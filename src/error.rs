//! Error types for pitchboard

use thiserror::Error;

/// Common result type for pitchboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Problems with the shape or contents of the pitch file. Always fatal at load.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing required column '{column}' in {path}")]
    MissingColumn { path: String, column: &'static str },

    #[error("bad record at line {line} of {path}: {message}")]
    InvalidRow {
        path: String,
        line: u64,
        message: String,
    },

    #[error("could not read header of {path}: {source}")]
    Header { path: String, source: csv::Error },
}

#[derive(Error, Debug)]
pub enum Error {
    /// The pitch file could not be opened
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A filter left nothing to show
    #[error("no data: {0}")]
    EmptySelection(String),

    /// A rate statistic whose denominator is zero
    #[error("{statistic} is undefined: zero {denominator}")]
    UndefinedStatistic {
        statistic: &'static str,
        denominator: &'static str,
    },

    /// Logo or stadium image not found on disk
    #[error("{kind} image not found at {path}")]
    AssetMissing { kind: &'static str, path: String },

    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Errors that only affect one panel of a page rather than the whole session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EmptySelection(_) | Error::UndefinedStatistic { .. } | Error::AssetMissing { .. }
        )
    }
}
