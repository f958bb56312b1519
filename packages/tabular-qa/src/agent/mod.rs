//! The QA agent seam.
//!
//! The pipeline treats the agent as a black box: given a CSV file and a
//! natural-language question, it returns a natural-language answer.
//! Implementations wrap specific LLM providers and own their prompting
//! and response parsing.

pub mod openai;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub use openai::{AgentConfig, OpenAiAgent, KNOWN_MODELS};

/// A natural-language question answerer over a tabular file.
#[async_trait]
pub trait QaAgent: Send + Sync {
    /// Answer `question` using the table serialized at `table_csv`.
    ///
    /// Failures surface as [`crate::PipelineError::Agent`] with the
    /// provider's reported reason, never a generic message.
    async fn answer(&self, table_csv: &Path, question: &str) -> Result<String>;
}
