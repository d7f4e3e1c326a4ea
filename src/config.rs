use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::explain::ollama::DEFAULT_MODEL;
use crate::session_store::DEFAULT_SESSION_TTL;

/// Application-level constants
pub const APP_NAME: &str = "Symptom Triage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 60;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "symptom_triage=debug,tower_http=debug,info"
    } else {
        "symptom_triage=info,tower_http=info,warn"
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var} ({value}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the optional explanation generator.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory holding `conditions.json` and `symptom_aliases.json`.
    /// `None` uses the built-in knowledge base.
    pub knowledge_dir: Option<PathBuf>,
    pub session_ttl: Duration,
    /// `None` disables explanations.
    pub ollama: Option<OllamaSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            knowledge_dir: None,
            session_ttl: DEFAULT_SESSION_TTL,
            ollama: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = parse_var("TRIAGE_HOST", get("TRIAGE_HOST"))?
            .unwrap_or_else(|| IpAddr::from([0, 0, 0, 0]));
        let port = parse_var("PORT", get("PORT"))?.unwrap_or(DEFAULT_PORT);
        let knowledge_dir = get("TRIAGE_KNOWLEDGE_DIR").map(PathBuf::from);

        let session_ttl = parse_positive_secs("TRIAGE_SESSION_TTL_SECS", get("TRIAGE_SESSION_TTL_SECS"))?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL);

        let ollama = match get("OLLAMA_URL") {
            Some(base_url) => Some(OllamaSettings {
                base_url,
                model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_secs: parse_positive_secs("OLLAMA_TIMEOUT_SECS", get("OLLAMA_TIMEOUT_SECS"))?
                    .unwrap_or(DEFAULT_OLLAMA_TIMEOUT_SECS),
            }),
            None => None,
        };

        Ok(Self {
            host,
            port,
            knowledge_dir,
            session_ttl,
            ollama,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::Invalid {
                var,
                value: v.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// A whole number of seconds; zero is rejected.
fn parse_positive_secs(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match parse_var::<u64>(var, value)? {
        Some(0) => Err(ConfigError::Invalid {
            var,
            value: "0".into(),
            reason: "must be positive".into(),
        }),
        secs => Ok(secs),
    }
}
