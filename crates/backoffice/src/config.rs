//! Backoffice configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VIVAHA_API_BASE_URL` - Base URL of the bureau API
//! - `VIVAHA_API_TOKEN` - API token injected on every request
//!
//! ## Optional
//! - `VIVAHA_ROLE` - Acting role, `admin` or `employee` (default: employee)
//! - `VIVAHA_ACTOR_ID` - Employee id of the acting user (scopes the
//!   "mine" roster views)
//! - `VIVAHA_HTTP_TIMEOUT_SECS` - Transport timeout (default: 30)
//! - `VIVAHA_FILTER_STATE_PATH` - Where roster filter state persists
//!   (default: `.vivaha-filters.json` in the working directory)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use vivaha_core::{EmployeeId, Role};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FILTER_STATE_PATH: &str = ".vivaha-filters.json";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Backoffice application configuration.
#[derive(Debug, Clone)]
pub struct BackofficeConfig {
    /// Base URL of the bureau API
    pub base_url: Url,
    /// API token (redacted in Debug output)
    pub api_token: SecretString,
    /// Acting role
    pub role: Role,
    /// Employee id of the acting user, when known
    pub actor_id: Option<EmployeeId>,
    /// Transport-level timeout for every request
    pub http_timeout: Duration,
    /// Where roster filter state persists between sessions
    pub filter_state_path: PathBuf,
}

impl BackofficeConfig {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing, a
    /// value fails to parse, or the token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Split out from [`Self::from_env`] so tests can supply variables
    /// without mutating process state.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::from_env`].
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = require(&var, "VIVAHA_API_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("VIVAHA_API_BASE_URL".to_string(), e.to_string())
        })?;

        let token = require(&var, "VIVAHA_API_TOKEN")?;
        validate_secret("VIVAHA_API_TOKEN", &token)?;

        let role = match var("VIVAHA_ROLE") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("VIVAHA_ROLE".to_string(), e))?,
            None => Role::Employee,
        };

        let actor_id = var("VIVAHA_ACTOR_ID")
            .filter(|id| !id.is_empty())
            .map(EmployeeId::new);

        let http_timeout = match var("VIVAHA_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "VIVAHA_HTTP_TIMEOUT_SECS".to_string(),
                    format!("expected seconds, got `{raw}`"),
                )
            })?),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let filter_state_path = var("VIVAHA_FILTER_STATE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_FILTER_STATE_PATH), PathBuf::from);

        Ok(Self {
            base_url,
            api_token: SecretString::from(token),
            role,
            actor_id,
            http_timeout,
            filter_state_path,
        })
    }

    /// Expose the token for header construction.
    #[must_use]
    pub fn token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

fn require(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    var(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("contains placeholder pattern `{pattern}`"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<BackofficeConfig, ConfigError> {
        let map = vars(pairs);
        BackofficeConfig::from_vars(|name| map.get(name).cloned())
    }

    #[test]
    fn test_minimal_config() {
        let config = load(&[
            ("VIVAHA_API_BASE_URL", "https://api.bureau.test"),
            ("VIVAHA_API_TOKEN", "tok-5f2a9c41d8"),
        ])
        .expect("config");

        assert_eq!(config.base_url.as_str(), "https://api.bureau.test/");
        assert_eq!(config.role, Role::Employee);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(
            config.filter_state_path,
            PathBuf::from(".vivaha-filters.json")
        );
    }

    #[test]
    fn test_missing_token_fails() {
        let err = load(&[("VIVAHA_API_BASE_URL", "https://api.bureau.test")])
            .expect_err("missing token");
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "VIVAHA_API_TOKEN"));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[
            ("VIVAHA_API_BASE_URL", "https://api.bureau.test"),
            ("VIVAHA_API_TOKEN", "your-token-here"),
        ])
        .expect_err("placeholder token");
        assert!(matches!(err, ConfigError::InsecureSecret(..)));
    }

    #[test]
    fn test_role_and_actor_parse() {
        let config = load(&[
            ("VIVAHA_API_BASE_URL", "https://api.bureau.test"),
            ("VIVAHA_API_TOKEN", "tok-5f2a9c41d8"),
            ("VIVAHA_ROLE", "admin"),
            ("VIVAHA_ACTOR_ID", "e-42"),
            ("VIVAHA_HTTP_TIMEOUT_SECS", "5"),
        ])
        .expect("config");
        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.actor_id, Some(EmployeeId::new("e-42")));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_url_and_bad_timeout_fail() {
        assert!(matches!(
            load(&[
                ("VIVAHA_API_BASE_URL", "not a url"),
                ("VIVAHA_API_TOKEN", "tok-5f2a9c41d8"),
            ]),
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "VIVAHA_API_BASE_URL"
        ));
        assert!(matches!(
            load(&[
                ("VIVAHA_API_BASE_URL", "https://api.bureau.test"),
                ("VIVAHA_API_TOKEN", "tok-5f2a9c41d8"),
                ("VIVAHA_HTTP_TIMEOUT_SECS", "soon"),
            ]),
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "VIVAHA_HTTP_TIMEOUT_SECS"
        ));
    }
}
