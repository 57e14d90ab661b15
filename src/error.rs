//! Error types for the pacgrid crate

use thiserror::Error;

/// Main error type for the pacgrid crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("level row {line} has {got} cells, expected {expected}")]
    RaggedLevel {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid character '{character}' at column {x}, row {y}")]
    InvalidLevelCharacter { character: char, x: usize, y: usize },

    #[error("level must contain exactly one player cell, found {count}")]
    PlayerCount { count: usize },

    #[error("level is empty")]
    EmptyLevel,

    #[error("episode already over")]
    EpisodeOver,

    #[error("invalid hyperparameter {name}={value} (must be finite and within [0, 1])")]
    InvalidHyperparameter { name: String, value: f64 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
