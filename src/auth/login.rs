// Login exchange: client identity for a bearer token
// Author: kelexine (https://github.com/kelexine)

use super::{Clock, Credential};
use crate::config::SessionConfig;
use crate::error::{snippet, VaduError, Result};
use crate::transport::{HttpRequest, Transport};
use crate::utils::logging::mask_token;
use reqwest::Method;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Operation name used in errors, logs and metrics.
pub const LOGIN_OPERATION: &str = "login";

/// Body returned by the token endpoint.
#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Lifetime in seconds, when the server chooses to send one.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Exchange the configured client identity for a fresh credential.
///
/// Sends exactly one request; no retries happen here. Failures are classified:
/// - empty identity or zero TTL: `Config`, nothing is sent
/// - 401/403: `Authorization`
/// - 5xx or network failure: `TransientServer` (one attempt)
/// - other non-200: `UnexpectedStatus`
/// - undecodable body or empty token: `MalformedResponse`
pub async fn exchange(
    transport: &dyn Transport,
    session: &SessionConfig,
    clock: &dyn Clock,
) -> Result<Credential> {
    info!("Starting login exchange against {}", session.login_endpoint);

    if session.client_identity.trim().is_empty() {
        error!("Login aborted: client identity is not configured");
        return Err(VaduError::Config(
            "Client identity is not set (configure session.client_identity or VADU_CLIENT_TOKEN)"
                .to_string(),
        ));
    }
    if session.token_ttl().is_zero() {
        error!("Login aborted: token TTL is zero");
        return Err(VaduError::Config(
            "session.token_ttl_seconds must be positive".to_string(),
        ));
    }

    let request = HttpRequest::new(Method::GET, &session.login_endpoint, session.login_timeout())
        .header("Content-Type", "application/json")
        .header("Authorization", session.client_identity.clone())
        .header("Cookie", session.cookie.clone());

    let issued_at = clock.now();
    let response = transport.send(request).await.map_err(|e| {
        error!("Login request to {} failed: {}", session.login_endpoint, e);
        if e.is_retryable() {
            VaduError::TransientServer {
                operation: LOGIN_OPERATION.to_string(),
                attempts: 1,
                status: None,
                cause: e.to_string(),
            }
        } else {
            VaduError::Request {
                operation: LOGIN_OPERATION.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    match response.status {
        200 => {}
        401 | 403 => {
            warn!("Login rejected with HTTP {}", response.status);
            return Err(VaduError::Authorization {
                operation: LOGIN_OPERATION.to_string(),
                status: response.status,
                body: snippet(&response.body),
            });
        }
        status if status >= 500 => {
            error!("Token endpoint failed with HTTP {}", status);
            return Err(VaduError::TransientServer {
                operation: LOGIN_OPERATION.to_string(),
                attempts: 1,
                status: Some(status),
                cause: format!("HTTP {}: {}", status, snippet(&response.body)),
            });
        }
        status => {
            error!("Unexpected login status HTTP {}", status);
            return Err(VaduError::UnexpectedStatus {
                operation: LOGIN_OPERATION.to_string(),
                status,
                body: snippet(&response.body),
            });
        }
    }

    let parsed: LoginResponse = serde_json::from_slice(&response.body).map_err(|e| {
        error!("Failed to parse login response: {}", e);
        VaduError::MalformedResponse {
            operation: LOGIN_OPERATION.to_string(),
            reason: e.to_string(),
            snippet: snippet(&response.body),
        }
    })?;

    if parsed.token.trim().is_empty() {
        return Err(VaduError::MalformedResponse {
            operation: LOGIN_OPERATION.to_string(),
            reason: "empty token".to_string(),
            snippet: snippet(&response.body),
        });
    }

    let credential = match parsed.expires_in {
        Some(seconds) if seconds > 0 => {
            Credential::issue(parsed.token, issued_at, Duration::from_secs(seconds as u64))
                .map_err(|e| {
                    error!("Login response carries an unusable expires_in: {}", seconds);
                    VaduError::MalformedResponse {
                        operation: LOGIN_OPERATION.to_string(),
                        reason: format!("expires_in {}: {}", seconds, e),
                        snippet: snippet(&response.body),
                    }
                })?
        }
        _ => Credential::issue(parsed.token, issued_at, session.token_ttl())?,
    };
    debug!(
        "Login succeeded, token {} valid for {}s",
        mask_token(credential.value()),
        credential.expires_in_seconds(issued_at)
    );
    Ok(credential)
}
