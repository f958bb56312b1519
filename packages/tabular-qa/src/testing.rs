//! Mock implementations for testing.
//!
//! Useful for exercising the pipeline without real LLM calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::agent::QaAgent;
use crate::error::{PipelineError, Result};

/// Record of a call made to the mock agent.
#[derive(Debug, Clone)]
pub struct MockAgentCall {
    pub table_csv: PathBuf,
    pub question: String,
    /// Contents of the table file at call time, captured because the
    /// real file is deleted when the query finishes.
    pub table_contents: String,
}

/// A mock QA agent returning deterministic, configurable answers.
///
/// Clones share the canned answers and the call log, so a clone kept
/// outside the pipeline can assert on calls made inside it.
#[derive(Clone, Default)]
pub struct MockAgent {
    /// Canned answers keyed by question
    answers: Arc<RwLock<HashMap<String, String>>>,

    /// Answer for questions without a canned entry
    default_answer: String,

    /// When set, every call fails with this reason
    fail_with: Option<String>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAgentCall>>>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self {
            default_answer: "mock answer".to_string(),
            ..Default::default()
        }
    }

    /// Add a canned answer for a question (builder pattern).
    pub fn with_answer(self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers
            .write()
            .unwrap()
            .insert(question.into(), answer.into());
        self
    }

    /// Set the answer used when no canned entry matches.
    pub fn with_default_answer(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = answer.into();
        self
    }

    /// Make every call fail with the given reason.
    pub fn failing_with(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn calls(&self) -> Vec<MockAgentCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl QaAgent for MockAgent {
    async fn answer(&self, table_csv: &Path, question: &str) -> Result<String> {
        let table_contents = std::fs::read_to_string(table_csv).unwrap_or_default();
        self.calls.write().unwrap().push(MockAgentCall {
            table_csv: table_csv.to_path_buf(),
            question: question.to_string(),
            table_contents,
        });

        if let Some(reason) = &self.fail_with {
            return Err(PipelineError::Agent {
                reason: reason.clone(),
            });
        }

        let answers = self.answers.read().unwrap();
        Ok(answers
            .get(question)
            .cloned()
            .unwrap_or_else(|| self.default_answer.clone()))
    }
}
