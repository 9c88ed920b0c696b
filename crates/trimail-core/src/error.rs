//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] trimail_api::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
