//! Typed errors for the QA pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can
//! match on the failing stage and react per-variant.

use std::fmt;

use thiserror::Error;

use crate::validate::CredentialField;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The pipeline stage an error originated from.
///
/// Every user-facing failure message carries one of these so the user
/// learns *which* step broke, never a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Locator,
    Fetch,
    Export,
    Agent,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Locator => "base URL parsing",
            Stage::Fetch => "record fetch",
            Stage::Export => "CSV export",
            Stage::Agent => "answer generation",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while answering a question.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more credential format checks failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A query was attempted before configuration succeeded
    #[error("pipeline is not configured")]
    NotConfigured,

    /// Question submitted while blank
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Base URL does not have the expected two-segment path shape
    #[error("invalid base URL: {input}")]
    InvalidLocator { input: String },

    /// Remote record-store call failed (auth, network, rate limit)
    #[error("record fetch failed: {0}")]
    Fetch(#[from] airtable_client::AirtableError),

    /// Writing the exported dataset failed
    #[error("export failed: {0}")]
    Export(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The QA agent could not produce an answer
    #[error("agent failed: {reason}")]
    Agent { reason: String },

    /// A stage exceeded its caller-specified deadline
    #[error("timed out during {stage}")]
    Timeout { stage: Stage },

    /// The query was cancelled
    #[error("query cancelled during {stage}")]
    Cancelled { stage: Stage },
}

impl PipelineError {
    /// Which stage this error belongs to, for user-facing reporting.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Validation(_)
            | PipelineError::NotConfigured
            | PipelineError::EmptyQuestion => Stage::Configuration,
            PipelineError::InvalidLocator { .. } => Stage::Locator,
            PipelineError::Fetch(_) => Stage::Fetch,
            PipelineError::Export(_) => Stage::Export,
            PipelineError::Agent { .. } => Stage::Agent,
            PipelineError::Timeout { stage } | PipelineError::Cancelled { stage } => *stage,
        }
    }
}

/// Configuration-time failure listing every credential that failed its
/// format check by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub failed: Vec<CredentialField>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid credential format: ")?;
        for (i, field) in self.failed.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
