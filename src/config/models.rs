//! Configuration data structures for the Vadu client.
//!
//! This module defines the schema for the client settings: the session
//! (endpoints, client identity, token lifetime), the retry policy and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{Result, VaduError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The root configuration object for the client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Endpoints, client identity and credential lifetime.
    #[serde(default)]
    pub session: SessionConfig,

    /// Attempt budgets and backoff schedule.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings shared read-only by the executor and the credential cache.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL every API path is resolved against.
    /// Default: `https://www.vadu.com.br`
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Full URL of the token exchange.
    /// Default: `https://www.vadu.com.br/vadu.dll/Autenticacao/JSONPegarToken`
    #[serde(default = "default_login_endpoint")]
    pub login_endpoint: String,

    /// Pre-shared client secret exchanged for a bearer token.
    /// Default: empty (falls back to `VADU_CLIENT_TOKEN` when loaded).
    #[serde(default)]
    pub client_identity: String,

    /// Cookie header value required by the login exchange.
    /// Default: empty (falls back to `VADU_COOKIE` when loaded).
    #[serde(default)]
    pub cookie: String,

    /// Credential lifetime used when the server does not send one.
    /// Default: `1800` (30 minutes)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,

    /// Timeout for each API attempt.
    /// Default: `30`
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Timeout for the login exchange.
    /// Default: `10`
    #[serde(default = "default_login_timeout")]
    pub login_timeout_seconds: u64,
}

/// Attempt budgets and backoff schedule for the request executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts for ordinary operations.
    /// Default: `3`
    #[serde(default = "default_standard_attempts")]
    pub standard_attempts: u32,

    /// Attempts for the status polling operation.
    /// Default: `5`
    #[serde(default = "default_polling_attempts")]
    pub polling_attempts: u32,

    /// Delay before the second attempt, in milliseconds.
    /// Default: `500`
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Growth factor applied to the delay after each attempt.
    /// Default: `2.0`
    #[serde(default = "default_multiplier")]
    pub backoff_multiplier: f64,

    /// Ceiling for a single delay, in milliseconds.
    /// Default: `30000`
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

/// Settings for logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl SessionConfig {
    /// Session against the production host with the given identity and cookie.
    pub fn new(client_identity: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            client_identity: client_identity.into(),
            cookie: cookie.into(),
            ..Self::default()
        }
    }

    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    pub fn with_login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = endpoint.into();
        self
    }

    /// Sub-second remainders round up to the next whole second.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl_seconds = whole_seconds(ttl);
        self
    }

    /// Sub-second remainders round up to the next whole second.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_seconds = whole_seconds(timeout);
        self
    }

    /// Reject settings that cannot work: a zero token lifetime or timeout.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("session.token_ttl_seconds", self.token_ttl_seconds),
            ("session.request_timeout_seconds", self.request_timeout_seconds),
            ("session.login_timeout_seconds", self.login_timeout_seconds),
        ];
        for (key, value) in checks {
            if value == 0 {
                return Err(VaduError::Config(format!("{} must be positive", key)));
            }
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_seconds)
    }

    /// Join an API path onto the configured base URL.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Custom Debug impl that never logs the client identity
impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("api_endpoint", &self.api_endpoint)
            .field("login_endpoint", &self.login_endpoint)
            .field("client_identity", &"[REDACTED]")
            .field("cookie", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("login_timeout_seconds", &self.login_timeout_seconds)
            .finish()
    }
}

// Default trait implementations linking to custom logic

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            login_endpoint: default_login_endpoint(),
            client_identity: String::new(),
            cookie: String::new(),
            token_ttl_seconds: default_token_ttl(),
            request_timeout_seconds: default_request_timeout(),
            login_timeout_seconds: default_login_timeout(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            standard_attempts: default_standard_attempts(),
            polling_attempts: default_polling_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            backoff_multiplier: default_multiplier(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

// Helper functions for serde defaults and shared constants
fn default_api_endpoint() -> String {
    "https://www.vadu.com.br".to_string()
}

fn default_login_endpoint() -> String {
    "https://www.vadu.com.br/vadu.dll/Autenticacao/JSONPegarToken".to_string()
}

fn default_token_ttl() -> u64 {
    1800 // 30 minutes
}

fn default_request_timeout() -> u64 {
    30
}

fn default_login_timeout() -> u64 {
    10
}

fn default_standard_attempts() -> u32 {
    3
}

fn default_polling_attempts() -> u32 {
    5
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_backoff() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let session = SessionConfig::default();
        assert_eq!(session.api_endpoint, "https://www.vadu.com.br");
        assert!(session.login_endpoint.ends_with("/JSONPegarToken"));
        assert_eq!(session.token_ttl(), Duration::from_secs(30 * 60));
        assert_eq!(session.login_timeout(), Duration::from_secs(10));
        assert!(session.client_identity.is_empty());
    }

    #[test]
    fn test_api_url_joins_without_double_slash() {
        let session = SessionConfig::default().with_api_endpoint("http://localhost:1234/");
        assert_eq!(
            session.api_url("/api-analise-cnpjcpf/v1/erp/analise"),
            "http://localhost:1234/api-analise-cnpjcpf/v1/erp/analise"
        );
    }

    #[test]
    fn test_sub_second_durations_round_up() {
        let session = SessionConfig::default()
            .with_token_ttl(Duration::from_millis(500))
            .with_request_timeout(Duration::from_millis(1500));
        assert_eq!(session.token_ttl_seconds, 1);
        assert_eq!(session.request_timeout_seconds, 2);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_zero_durations_rejected() {
        assert!(SessionConfig::default().validate().is_ok());

        let session = SessionConfig::default().with_token_ttl(Duration::ZERO);
        assert!(matches!(session.validate(), Err(VaduError::Config(_))));

        let session = SessionConfig::default().with_request_timeout(Duration::ZERO);
        let err = session.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_seconds"));
    }

    #[test]
    fn test_debug_redacts_identity() {
        let session = SessionConfig::new("super-secret-identity", "session=abc");
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret-identity"));
        assert!(!debug.contains("session=abc"));
    }
}
