//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the client,
//! supporting multiple output formats and providing utilities to prevent
//! bearer tokens and client identities from leaking into logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{VaduError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Longest prefix of a token that may ever appear in a log line.
pub const MASK_PREFIX_LEN: usize = 5;

lazy_static! {
    static ref BEARER_PATTERN: Regex =
        Regex::new(r"(?i)(bearer\s+)[^\s\x22']+").expect("bearer pattern is valid");
    static ref TOKEN_FIELD_PATTERN: Regex =
        Regex::new(r#"("token"\s*:\s*")[^"]*(")"#).expect("token field pattern is valid");
}

/// Initializes the global tracing subscriber.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`. Returns an error if a global subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // Configure filter from environment or config file
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "compact" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    installed.map_err(|e| VaduError::Internal(format!("Failed to install logger: {}", e)))
}

/// Masks a credential so only a short prefix survives.
///
/// At most [`MASK_PREFIX_LEN`] characters are shown, and never more than half
/// of the token, so short tokens are not revealed in full. Works on `char`
/// boundaries, so multi-byte input cannot cause an out-of-range slice.
pub fn mask_token(token: &str) -> String {
    let visible = MASK_PREFIX_LEN.min(token.chars().count() / 2);
    let prefix: String = token.chars().take(visible).collect();
    format!("{}...", prefix)
}

/// Sanitizes sensitive information from log messages.
///
/// Replaces the value of `Bearer <token>` headers and `"token": "..."` JSON
/// fields with a masked form, so response bodies and request dumps can be
/// logged or embedded in errors safely.
pub fn sanitize(input: &str) -> String {
    let masked = BEARER_PATTERN.replace_all(input, "${1}[REDACTED]");
    TOKEN_FIELD_PATTERN
        .replace_all(&masked, "${1}[REDACTED]${2}")
        .into_owned()
}
