//! Application configuration.
//!
//! Values come from environment variables (an optional `.env` file is loaded
//! by the binary first). Every setting has a default, so an empty
//! environment yields a working configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::answerer::{DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_TEMPERATURE};
use crate::auth::ApiKeys;
use crate::models::TenantId;
use crate::ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::service::DEFAULT_TOP_K;

pub const DATA_DIR_VAR: &str = "RAGDESK_DATA_DIR";
pub const TENANTS_VAR: &str = "RAGDESK_TENANTS";
pub const API_KEYS_VAR: &str = "RAGDESK_API_KEYS";
pub const OLLAMA_HOST_VAR: &str = "OLLAMA_HOST";
pub const OLLAMA_MODEL_VAR: &str = "OLLAMA_MODEL";
pub const TEMPERATURE_VAR: &str = "RAGDESK_TEMPERATURE";
pub const LLM_TIMEOUT_VAR: &str = "RAGDESK_LLM_TIMEOUT_SECS";
pub const MAX_CONTEXT_CHARS_VAR: &str = "RAGDESK_MAX_CONTEXT_CHARS";
pub const TOP_K_VAR: &str = "RAGDESK_TOP_K";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TENANTS: &str = "A=tenantA,B=tenantB";

/// Runtime settings for loading the corpus and reaching the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Corpus root; each tenant's folder lives directly below it.
    pub data_dir: PathBuf,
    /// Tenant id and folder name under `data_dir`, in declaration order.
    pub tenant_folders: Vec<(TenantId, String)>,
    /// Caller API keys.
    pub api_keys: ApiKeys,
    pub ollama_host: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on one model call.
    pub llm_timeout: Duration,
    /// Evidence budget, in characters.
    pub max_context_chars: usize,
    /// Hits returned per query.
    pub top_k: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            tenant_folders: vec![
                (TenantId::new("A"), "tenantA".to_string()),
                (TenantId::new("B"), "tenantB".to_string()),
            ],
            api_keys: ApiKeys::new(),
            ollama_host: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            llm_timeout: DEFAULT_TIMEOUT,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if any value is malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value. Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if any value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let data_dir = lookup(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let tenants = lookup(TENANTS_VAR).unwrap_or_else(|| DEFAULT_TENANTS.to_string());
        let tenant_folders = parse_pairs(&tenants)
            .with_context(|| format!("Invalid {TENANTS_VAR}"))?
            .into_iter()
            .map(|(tenant, folder)| (TenantId::new(tenant), folder))
            .collect();

        let api_keys = match lookup(API_KEYS_VAR) {
            Some(raw) => parse_pairs(&raw)
                .with_context(|| format!("Invalid {API_KEYS_VAR}"))?
                .into_iter()
                .map(|(key, tenant)| (key, TenantId::new(tenant)))
                .collect(),
            None => defaults.api_keys,
        };

        let llm_timeout_secs: u64 =
            parse_var(&lookup, LLM_TIMEOUT_VAR)?.unwrap_or(defaults.llm_timeout.as_secs());
        if llm_timeout_secs == 0 {
            bail!("Invalid {LLM_TIMEOUT_VAR}: timeout must be greater than zero");
        }

        let temperature = parse_var(&lookup, TEMPERATURE_VAR)?.unwrap_or(defaults.temperature);
        if !temperature.is_finite() || temperature < 0.0 {
            bail!("Invalid {TEMPERATURE_VAR}: {temperature} is not a non-negative number");
        }

        Ok(Self {
            data_dir,
            tenant_folders,
            api_keys,
            ollama_host: lookup(OLLAMA_HOST_VAR).unwrap_or(defaults.ollama_host),
            model: lookup(OLLAMA_MODEL_VAR).unwrap_or(defaults.model),
            temperature,
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            max_context_chars: parse_var(&lookup, MAX_CONTEXT_CHARS_VAR)?
                .unwrap_or(defaults.max_context_chars),
            top_k: parse_var(&lookup, TOP_K_VAR)?.unwrap_or(defaults.top_k),
        })
    }
}

/// Parses an optional numeric variable, naming it in the error.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {name}: {raw:?}"))
        })
        .transpose()
}

/// Parses `key=value` pairs separated by commas.
///
/// Whitespace around items is ignored, as are empty items.
fn parse_pairs(input: &str) -> Result<Vec<(String, String)>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (key, value) = item
                .split_once('=')
                .with_context(|| format!("expected key=value, got {item:?}"))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                bail!("expected key=value, got {item:?}");
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
