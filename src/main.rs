use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ragdesk::{
    AppConfig, GroundedAnswerer, OllamaClientBuilder, QueryService, TenantId, ingest::load_corpus,
};
use thiserror::Error;

/// ragdesk - grounded question answering over per-tenant documents
#[derive(Parser)]
#[command(name = "ragdesk")]
#[command(about = "Answer questions from a tenant's own documents, with sources")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Answer a question from one tenant's documents
    Query(QueryCommand),
    /// Show how many documents each tenant has loaded
    Health,
}

/// Answer a question
#[derive(Parser)]
struct QueryCommand {
    /// The question to answer
    #[arg(value_name = "QUESTION")]
    question: String,

    #[command(flatten)]
    caller: Caller,

    /// Generate the answer with the language model instead of listing excerpts
    #[arg(long)]
    grounded: bool,
}

/// Who is asking: a tenant id directly, or an API key that maps to one
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Caller {
    /// Tenant identifier
    #[arg(short, long, value_name = "TENANT")]
    tenant: Option<String>,

    /// API key resolved through RAGDESK_API_KEYS
    #[arg(short = 'k', long, value_name = "KEY")]
    api_key: Option<String>,
}

/// Errors caused by caller input rather than by the system.
#[derive(Debug, Error)]
enum UserError {
    #[error("Question cannot be empty")]
    EmptyQuestion,
    #[error("Invalid API key")]
    InvalidApiKey,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let result = AppConfig::from_env().and_then(|config| match &cli.command {
        Commands::Query(cmd) => handle_query(cmd, &config),
        Commands::Health => handle_health(&config),
    });

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs the log subscriber. `RUST_LOG` overrides the verbosity flag.
///
/// Logs go to stderr so stdout only carries command output.
fn init_tracing(verbose: u8, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "ragdesk=info",
        1 => "ragdesk=debug",
        _ => "ragdesk=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match format {
        LogFormat::Text => fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Determines if an error is a user error (vs internal error).
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<UserError>().is_some()
}

/// Resolves the caller to a tenant id.
fn resolve_tenant(caller: &Caller, config: &AppConfig) -> Result<TenantId> {
    if let Some(tenant) = &caller.tenant {
        return Ok(TenantId::new(tenant.as_str()));
    }

    let key = caller.api_key.as_deref().unwrap_or_default();
    config
        .api_keys
        .resolve(key)
        .cloned()
        .ok_or_else(|| UserError::InvalidApiKey.into())
}

/// Builds the query service from the configured corpus and model settings.
fn build_service(config: &AppConfig, grounded: bool) -> Result<QueryService> {
    let corpus = load_corpus(&config.data_dir, &config.tenant_folders)
        .context("Failed to load corpus")?;
    let service = QueryService::new(Arc::new(corpus)).with_top_k(config.top_k);

    if !grounded {
        return Ok(service);
    }

    let client = OllamaClientBuilder::new()
        .base_url(config.ollama_host.as_str())
        .timeout(config.llm_timeout)
        .build()
        .context("Failed to create Ollama client")?;

    let answerer = GroundedAnswerer::new(Arc::new(client))
        .model(config.model.as_str())
        .temperature(config.temperature)
        .max_context_chars(config.max_context_chars);

    Ok(service.with_answerer(answerer))
}

/// Handles the query command by printing the result as JSON.
fn handle_query(cmd: &QueryCommand, config: &AppConfig) -> Result<()> {
    if cmd.question.trim().is_empty() {
        return Err(UserError::EmptyQuestion.into());
    }

    let tenant = resolve_tenant(&cmd.caller, config)?;
    let service = build_service(config, cmd.grounded)?;
    let result = service.query(&tenant, &cmd.question);

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to encode query result")?
    );
    Ok(())
}

/// Handles the health command by printing per-tenant document counts.
fn handle_health(config: &AppConfig) -> Result<()> {
    let service = build_service(config, false)?;
    let report = serde_json::json!({
        "ok": true,
        "docs": service.document_counts(),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to encode health report")?
    );
    Ok(())
}
