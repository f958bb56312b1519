//! OpenAI-backed QA agent.
//!
//! One chat completion at temperature 0: the exported CSV goes into the
//! system prompt, the user's question is the single user message, and
//! the assistant's text is the answer.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::agent::QaAgent;
use crate::credentials::SecretString;
use crate::error::{PipelineError, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat models known to handle tabular reasoning well. Informational
/// only; any chat-completion model id is accepted.
pub const KNOWN_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4.1", "gpt-4.1-mini"];

const SYSTEM_PROMPT: &str = "You are a data analyst. Answer the user's question using only \
the CSV table below. The `id` column holds record identifiers. Be concise and factual; \
if the table cannot answer the question, say so.";

/// Configuration for the OpenAI agent.
///
/// The model id is a plain parameter rather than a separate code path
/// per model.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model: String,
    pub base_url: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }
}

impl AgentConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API origin. Used by tests to point at a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct OpenAiAgent {
    client: reqwest::Client,
    api_key: SecretString,
    config: AgentConfig,
}

impl OpenAiAgent {
    pub fn new(api_key: SecretString, config: AgentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn agent_err(reason: impl Into<String>) -> PipelineError {
    PipelineError::Agent {
        reason: reason.into(),
    }
}

#[async_trait]
impl QaAgent for OpenAiAgent {
    async fn answer(&self, table_csv: &Path, question: &str) -> Result<String> {
        let table = tokio::fs::read_to_string(table_csv)
            .await
            .map_err(|e| agent_err(format!("could not read exported table: {e}")))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": format!("{SYSTEM_PROMPT}\n\n{table}")},
                {"role": "user", "content": question},
            ],
        });

        tracing::debug!(model = %self.config.model, table_bytes = table.len(), "Asking agent");

        let url = format!("{}/chat/completions", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| agent_err(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(agent_err(format!("API returned {status}: {body}")));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| agent_err(format!("malformed completion response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| agent_err("completion contained no answer text"))
    }
}
