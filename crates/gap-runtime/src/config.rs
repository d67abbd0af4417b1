//! # Runtime Configuration
//!
//! Defaults, environment overrides and validation.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GAP_INDEXER_URL` | `indexer.url` |
//! | `GAP_BACKEND_URL` | `backend.url` |
//! | `GAP_API_TOKEN` | `backend.api_token` |
//! | `GAP_HTTP_TIMEOUT_MS` | `indexer.timeout`, `backend.timeout` |
//! | `GAP_POLL_INTERVAL_MS` | `reconcile.poll_interval_ms` |
//! | `GAP_POLL_MAX_ATTEMPTS` | `reconcile.max_attempts` |
//! | `GAP_ZERODEV_PROJECT_ID` | `gasless.zerodev_project_id` |
//! | `GAP_ALCHEMY_API_KEY` | `gasless.alchemy_api_key` |
//! | `GAP_GASLESS_DISABLED_CHAINS` | `gasless.disabled_chains` (comma separated) |

use gap_02_reconciliation::{ReconcileConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use shared_types::ChainId;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct GapConfig {
    pub indexer: IndexerConfig,
    pub backend: BackendConfig,
    pub reconcile: ReconcileSettings,
    pub gasless: GaslessSettings,
}

/// Read indexer endpoint.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://gapapi.karmahq.xyz".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Funding-platform backend (status changes, permissions, off-chain revoke).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    /// Bearer token for authenticated endpoints.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "https://gapapi.karmahq.xyz".to_string(),
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Poll parameters shared by every mutation flow.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub max_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl ReconcileSettings {
    pub fn to_reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig::new(self.max_attempts, Duration::from_millis(self.poll_interval_ms))
    }
}

/// Gasless provider credentials and overrides.
#[derive(Debug, Clone, Default)]
pub struct GaslessSettings {
    pub zerodev_project_id: Option<String>,
    pub alchemy_api_key: Option<String>,
    /// Chains to disable on top of the built-in table.
    pub disabled_chains: Vec<ChainId>,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} URL must not be empty")]
    EmptyUrl(&'static str),

    #[error("{0} URL must start with http:// or https://, got {1}")]
    InvalidUrl(&'static str, String),

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Max poll attempts must be greater than zero")]
    ZeroAttempts,

    #[error("HTTP timeout must be greater than zero")]
    ZeroTimeout,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("[gap-runtime] Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

fn check_url(name: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::EmptyUrl(name));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl(name, url.to_string()));
    }
    Ok(())
}

impl GapConfig {
    /// Defaults overridden by `GAP_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = env_var("GAP_INDEXER_URL") {
            config.indexer.url = url;
        }
        if let Some(url) = env_var("GAP_BACKEND_URL") {
            config.backend.url = url;
        }
        config.backend.api_token = env_var("GAP_API_TOKEN");

        if let Some(ms) = parse_env::<u64>("GAP_HTTP_TIMEOUT_MS") {
            config.indexer.timeout = Duration::from_millis(ms);
            config.backend.timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_env("GAP_POLL_INTERVAL_MS") {
            config.reconcile.poll_interval_ms = ms;
        }
        if let Some(attempts) = parse_env("GAP_POLL_MAX_ATTEMPTS") {
            config.reconcile.max_attempts = attempts;
        }

        config.gasless.zerodev_project_id = env_var("GAP_ZERODEV_PROJECT_ID");
        config.gasless.alchemy_api_key = env_var("GAP_ALCHEMY_API_KEY");
        if let Some(list) = env_var("GAP_GASLESS_DISABLED_CHAINS") {
            config.gasless.disabled_chains = parse_chain_list(&list);
        }

        config
    }

    /// Reject configurations the runtime cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("Indexer", &self.indexer.url)?;
        check_url("Backend", &self.backend.url)?;
        if self.indexer.timeout.is_zero() || self.backend.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.reconcile.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.reconcile.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

/// Parse `"10, 8453,abc"` into known-good chain ids, skipping junk.
fn parse_chain_list(list: &str) -> Vec<ChainId> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<ChainId>() {
            Ok(chain) => Some(chain),
            Err(e) => {
                warn!("[gap-runtime] {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reconcile.max_attempts, 1000);
        assert_eq!(config.reconcile.poll_interval_ms, 1500);
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = GapConfig::default();
        config.reconcile.poll_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = GapConfig::default();
        config.reconcile.max_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = GapConfig::default();
        config.indexer.url = "  ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyUrl("Indexer")));

        let mut config = GapConfig::default();
        config.backend.url = "ftp://example.org".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl("Backend", _))
        ));
    }

    #[test]
    fn test_parse_chain_list_skips_junk() {
        assert_eq!(
            parse_chain_list("10, 8453,,abc"),
            vec![ChainId::OPTIMISM, ChainId::BASE]
        );
    }

    #[test]
    fn test_reconcile_config_conversion() {
        let settings = ReconcileSettings {
            max_attempts: 5,
            poll_interval_ms: 200,
        };
        let config = settings.to_reconcile_config();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.poll_interval, Duration::from_millis(200));
    }
}
