//! Natural-language question answering over Airtable tables.
//!
//! The pipeline: validate three user-supplied credentials, parse the
//! base URL into base and table identifiers, fetch every record of the
//! table, flatten them into a CSV file, and hand the file plus the
//! question to an LLM-backed agent that returns a textual answer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tabular_qa::{AgentConfig, Credentials, OpenAiAgent, Pipeline, QueryOptions};
//!
//! let creds = Credentials::new(api_key, pat, base_url);
//! let agent = OpenAiAgent::new(creds.api_key.clone(), AgentConfig::default());
//!
//! let mut pipeline = Pipeline::new(agent);
//! pipeline.configure(creds)?;
//!
//! let answer = pipeline.ask("how many records are there?", &QueryOptions::default()).await?;
//! println!("{}", answer.text);
//! ```
//!
//! # Modules
//!
//! - [`validate`] - format checks for the three credentials
//! - [`locator`] - base URL to identifier parsing
//! - [`export`] - record flattening and CSV serialization
//! - [`agent`] - the QA agent seam and the OpenAI implementation
//! - [`pipeline`] - the orchestrator and its state machine
//! - [`testing`] - mock agent for tests

pub mod agent;
pub mod credentials;
pub mod error;
pub mod export;
pub mod locator;
pub mod pipeline;
pub mod testing;
pub mod validate;

pub use agent::{AgentConfig, OpenAiAgent, QaAgent, KNOWN_MODELS};
pub use credentials::{Credentials, SecretString};
pub use error::{PipelineError, Result, Stage, ValidationError};
pub use export::{export_csv, ExportedCsv};
pub use locator::{parse_base_url, BaseLocator};
pub use pipeline::{Answer, Pipeline, PipelineState, QueryOptions};
pub use testing::MockAgent;
pub use validate::{api_key_valid, base_url_valid, pat_valid, CredentialField};

// The record type callers see is the client's.
pub use airtable_client::Record;
