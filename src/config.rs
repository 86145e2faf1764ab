//! Application constants and startup configuration.
//!
//! Secrets are read from the process environment once, at startup.
//! A missing or malformed secret is a fatal error: the server never binds
//! without a usable LLM configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Health Assistant";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_WATSONX_URL: &str = "WATSONX_URL";
pub const ENV_WATSONX_APIKEY: &str = "WATSONX_APIKEY";
pub const ENV_WATSONX_PROJECT_ID: &str = "WATSONX_PROJECT_ID";
pub const ENV_WATSONX_MODEL_ID: &str = "WATSONX_MODEL_ID";
pub const ENV_WATSONX_IAM_URL: &str = "WATSONX_IAM_URL";
pub const ENV_BIND: &str = "HEALTH_ASSISTANT_BIND";
pub const ENV_SESSION_TIMEOUT: &str = "HEALTH_ASSISTANT_SESSION_TIMEOUT_SECS";

pub const DEFAULT_MODEL_ID: &str = "ibm/granite-3-2-8b-instruct";
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Sessions idle longer than this are evicted (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 1800;

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "health_assistant_lib=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Watsonx credentials missing: {0} is not set")]
    MissingSecret(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Credentials and endpoints for the hosted LLM.
#[derive(Clone)]
pub struct WatsonxSecrets {
    pub url: String,
    pub api_key: String,
    pub project_id: String,
    pub model_id: String,
    pub iam_url: String,
}

// The API key never reaches logs.
impl std::fmt::Debug for WatsonxSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonxSecrets")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("model_id", &self.model_id)
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

/// Everything `run()` needs before the server starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub watsonx: WatsonxSecrets,
    pub bind_addr: SocketAddr,
    pub session_timeout: Duration,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, ENV_WATSONX_URL)?;
        let api_key = required(&lookup, ENV_WATSONX_APIKEY)?;
        let project_id = required(&lookup, ENV_WATSONX_PROJECT_ID)?;

        let url = url.trim_end_matches('/').to_string();
        require_http_scheme(ENV_WATSONX_URL, &url)?;

        let iam_url = optional(&lookup, ENV_WATSONX_IAM_URL)
            .unwrap_or_else(|| DEFAULT_IAM_URL.to_string());
        require_http_scheme(ENV_WATSONX_IAM_URL, &iam_url)?;

        let model_id = optional(&lookup, ENV_WATSONX_MODEL_ID)
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        let bind_raw = optional(&lookup, ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: ENV_BIND,
            reason: e.to_string(),
        })?;

        let timeout_secs = match optional(&lookup, ENV_SESSION_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: ENV_SESSION_TIMEOUT,
                reason: e.to_string(),
            })?,
            None => DEFAULT_SESSION_TIMEOUT_SECS,
        };

        Ok(Self {
            watsonx: WatsonxSecrets {
                url,
                api_key,
                project_id,
                model_id,
                iam_url,
            },
            bind_addr,
            session_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::MissingSecret(key))
}

/// Blank values count as absent.
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_http_scheme(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: "expected an http(s) URL".into(),
        })
    }
}
