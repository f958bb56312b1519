//! The answer pipeline.
//!
//! Composes validation, locator parsing, record fetch, CSV export and
//! the QA agent into a single query path. Owns no state beyond the
//! configured session and the machine tracking where a query stands.

use std::future::Future;
use std::time::Duration;

use airtable_client::AirtableClient;
use tokio_util::sync::CancellationToken;

use crate::agent::QaAgent;
use crate::credentials::Credentials;
use crate::error::{PipelineError, Result, Stage};
use crate::export::export_csv;
use crate::locator::parse_base_url;

/// Where the pipeline currently stands.
///
/// `Unconfigured → Configured → Querying → Answered`, with `Failed`
/// reachable from any state. Re-querying from `Answered` or `Failed`
/// returns to `Querying`; a failed configuration attempt leaves the
/// state (and any previously stored credentials) untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Unconfigured,
    Configured,
    Querying,
    Answered,
    Failed,
}

/// Per-query limits. Both default to off, matching the original
/// behavior of waiting indefinitely.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Deadline applied separately to the fetch and agent stages.
    pub timeout: Option<Duration>,

    /// Cooperative cancellation for the blocking stages.
    pub cancel: Option<CancellationToken>,
}

/// A successful answer, with the record count the agent saw.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub record_count: usize,
}

struct Session {
    credentials: Credentials,
    airtable: AirtableClient,
}

/// The orchestrator. One query runs at a time per pipeline instance;
/// `ask` takes `&mut self`, so overlap is rejected at compile time.
pub struct Pipeline<A: QaAgent> {
    agent: A,
    session: Option<Session>,
    state: PipelineState,
    airtable_base_url: Option<String>,
}

impl<A: QaAgent> Pipeline<A> {
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            session: None,
            state: PipelineState::Unconfigured,
            airtable_base_url: None,
        }
    }

    /// Point the record fetcher at a different API origin. Used by
    /// tests to substitute a mock server.
    pub fn with_airtable_base_url(mut self, url: impl Into<String>) -> Self {
        self.airtable_base_url = Some(url.into());
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Validate and store credentials, moving to `Configured`.
    ///
    /// A failed check reports every offending field and leaves any
    /// previously configured session in place.
    pub fn configure(&mut self, credentials: Credentials) -> Result<()> {
        credentials.validate()?;

        let mut airtable = AirtableClient::new(credentials.pat.expose().to_string());
        if let Some(url) = &self.airtable_base_url {
            airtable = airtable.with_base_url(url.clone());
        }

        self.session = Some(Session {
            credentials,
            airtable,
        });
        self.state = PipelineState::Configured;
        tracing::info!("Pipeline configured");
        Ok(())
    }

    /// Run one full query: parse the base URL, fetch all records,
    /// export them to CSV, ask the agent.
    ///
    /// On success the state becomes `Answered`; any stage failure moves
    /// to `Failed` with the error identifying the stage of origin.
    /// Stored credentials survive query failures.
    pub async fn ask(&mut self, question: &str, opts: &QueryOptions) -> Result<Answer> {
        let result = match self.session.as_ref() {
            None => Err(PipelineError::NotConfigured),
            Some(_) if question.trim().is_empty() => Err(PipelineError::EmptyQuestion),
            Some(_) => {
                self.state = PipelineState::Querying;
                // Reborrow after the state write so the mutation and the
                // query's shared borrows never overlap.
                let session = self.session.as_ref().ok_or(PipelineError::NotConfigured)?;
                run_query(session, &self.agent, question, opts).await
            }
        };
        match &result {
            Ok(answer) => {
                self.state = PipelineState::Answered;
                tracing::info!(record_count = answer.record_count, "Query answered");
            }
            Err(err) => {
                self.state = PipelineState::Failed;
                tracing::warn!(stage = %err.stage(), error = %err, "Query failed");
            }
        }
        result
    }
}

async fn run_query<A: QaAgent>(
    session: &Session,
    agent: &A,
    question: &str,
    opts: &QueryOptions,
) -> Result<Answer> {
    let locator = parse_base_url(&session.credentials.base_url)?;
    tracing::debug!(base_id = %locator.base_id, table_id = %locator.table_id, "Parsed locator");

    let records = bounded(opts, Stage::Fetch, async {
        session
            .airtable
            .list_all(&locator.base_id, &locator.table_id)
            .await
            .map_err(PipelineError::from)
    })
    .await?;

    let exported = export_csv(&records)?;

    let text = bounded(opts, Stage::Agent, async {
        agent.answer(exported.path(), question).await
    })
    .await?;

    // Exported file is deleted here, once the agent is done with it.
    Ok(Answer {
        text,
        record_count: exported.row_count(),
    })
}

/// Run a stage under the query's timeout and cancellation token.
async fn bounded<T>(
    opts: &QueryOptions,
    stage: Stage,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let work = async {
        match &opts.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(PipelineError::Cancelled { stage }),
                    res = fut => res,
                }
            }
            None => fut.await,
        }
    };
    match opts.timeout {
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .map_err(|_| PipelineError::Timeout { stage })?,
        None => work.await,
    }
}
