// src/config.rs
// =============================================================================
// Static defaults and the validated fetch configuration.
//
// Every default here can be overridden from the command line or the
// environment (see cli.rs). FetchConfig::validate rejects settings the
// fetch engine could never make progress with; it runs when a config is
// built and again when an engine is created from it.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// Maximum number of URLs processed at the same time.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 51;

/// Attempts allowed per URL before a transient failure becomes terminal.
pub const DEFAULT_RETRY_LIMIT: usize = 5;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Name of the reconciled JSON artifact.
pub const DEFAULT_OUTPUT_FILE: &str = "result.json";

/// Status code recorded when no response was obtained.
pub const STATUS_CODE_DEFAULT: u16 = 0;

/// Redirects followed before reqwest gives up on a request.
pub const MAX_REDIRECTS: usize = 10;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36";

// Rejected configurations. These are programmer/operator mistakes, so they
// fail at construction time instead of surfacing per URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency limit must be at least 1, got {0}")]
    ConcurrencyLimit(usize),

    #[error("retry limit must be at least 1, got {0}")]
    RetryLimit(usize),

    #[error("request timeout must be greater than zero")]
    Timeout,

    #[error("user agent must not be empty")]
    UserAgent,
}

/// Settings for one FetchEngine.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub concurrency_limit: usize,
    pub retry_limit: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl FetchConfig {
    pub fn new(
        concurrency_limit: usize,
        retry_limit: usize,
        request_timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            concurrency_limit,
            retry_limit,
            request_timeout,
            user_agent: user_agent.into(),
            accept_invalid_certs: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the fetch engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::ConcurrencyLimit(self.concurrency_limit));
        }
        if self.retry_limit == 0 {
            return Err(ConfigError::RetryLimit(self.retry_limit));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Timeout);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::UserAgent);
        }
        Ok(())
    }

    /// Skip TLS certificate verification for every request in the batch.
    pub fn with_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            retry_limit: DEFAULT_RETRY_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}
