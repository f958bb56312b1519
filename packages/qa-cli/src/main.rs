//! Ask natural-language questions about an Airtable table.
//!
//! Credentials come from flags or the environment; nothing is
//! persisted between runs.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tabular_qa::{
    AgentConfig, Credentials, OpenAiAgent, Pipeline, QueryOptions, KNOWN_MODELS,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "qa",
    about = "Natural-language question answering over an Airtable table",
    after_help = "Credentials fall back to the OPENAI_API_KEY, AIRTABLE_PAT and \
AIRTABLE_URL environment variables (a .env file is honored). Practical table \
size is bounded by the Airtable Web API's listing limits (around 100 records)."
)]
struct Cli {
    /// Question to ask about the table
    question: String,

    /// Airtable base URL (https://airtable.com/app.../tbl...)
    #[arg(long)]
    base_url: Option<String>,

    /// OpenAI API key (sk-...)
    #[arg(long)]
    api_key: Option<String>,

    /// Airtable personal access token (pat...)
    #[arg(long)]
    pat: Option<String>,

    /// Chat model to answer with
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Per-stage timeout in seconds for the fetch and answer calls
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Flag value if given, else the named environment variable.
fn flag_or_env(flag: Option<String>, flag_name: &str, var: &str) -> Result<String> {
    match flag {
        Some(value) => Ok(value),
        None => env::var(var).with_context(|| format!("--{flag_name} not given and {var} not set")),
    }
}

async fn run(cli: Cli) -> Result<String> {
    let credentials = Credentials::new(
        flag_or_env(cli.api_key, "api-key", "OPENAI_API_KEY")?,
        flag_or_env(cli.pat, "pat", "AIRTABLE_PAT")?,
        flag_or_env(cli.base_url, "base-url", "AIRTABLE_URL")?,
    );

    if !KNOWN_MODELS.contains(&cli.model.as_str()) {
        tracing::warn!(model = %cli.model, "Model is not in the known-good list; proceeding anyway");
    }

    let agent = OpenAiAgent::new(
        credentials.api_key.clone(),
        AgentConfig::default().with_model(cli.model),
    );

    let mut pipeline = Pipeline::new(agent);
    pipeline.configure(credentials)?;

    let opts = QueryOptions {
        timeout: cli.timeout_secs.map(Duration::from_secs),
        cancel: None,
    };

    let answer = pipeline.ask(&cli.question, &opts).await?;
    Ok(answer.text)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(answer) => {
            println!("{answer}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Tag pipeline failures with their stage of origin.
            let message = match err.downcast_ref::<tabular_qa::PipelineError>() {
                Some(pipeline_err) => format!("{} failed: {pipeline_err}", pipeline_err.stage()),
                None => format!("{err:#}"),
            };
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
