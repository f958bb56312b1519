//! Error types for the Airtable client.

use thiserror::Error;

/// Result type for Airtable client operations.
pub type Result<T> = std::result::Result<T, AirtableError>;

/// Airtable client errors.
#[derive(Debug, Error)]
pub enum AirtableError {
    /// HTTP transport error (connection failed, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API error (non-2xx response: bad auth, unknown table, rate limit)
    #[error("Airtable API error (status {status}): {message}")]
    Api { status: u16, message: String },
}
