//! Crate-level error types.
//!
//! [`NokeyError`] unifies every error source (configuration, HTTP, JSON,
//! response validation, terminal and file I/O) behind a single enum so
//! callers can match on the variant they care about while still using the
//! `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NokeyError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum NokeyError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The data service answered with a non-success status.
    ///
    /// `message` is the `detail` field of the error body when present,
    /// otherwise the canonical reason phrase of `status`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A decoded response violated the OHLCV data contract.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Writing an export artifact failed.
    #[error("export error: {0}")]
    Export(String),

    /// The terminal could not be set up, drawn, or restored.
    #[error("terminal error: {0}")]
    Terminal(String),

    /// Filesystem I/O failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for NokeyError {
    fn from(err: std::io::Error) -> Self {
        NokeyError::Io(err.to_string())
    }
}
