//! Error types for the cardsweep-core library.

use thiserror::Error;

/// Main error type for the cardsweep library.
#[derive(Error, Debug)]
pub enum SweepError {
    /// The pipeline was started with no documents at all.
    #[error("no documents supplied")]
    NoDocuments,

    /// The extraction worker pool could not be built.
    #[error("worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the cardsweep library.
pub type Result<T> = std::result::Result<T, SweepError>;
