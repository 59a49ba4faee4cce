//! Resilient request execution.
//!
//! The [`Executor`] runs one logical remote operation: it obtains a bearer token
//! from the [`CredentialCache`], builds the authenticated request, sends it
//! through the [`Transport`] and classifies the outcome. Network failures and
//! HTTP 5xx are retried with exponential backoff up to the operation's
//! [`RetryPolicy`]; every other non-200 status ends the operation at once.
//!
//! Per call the state moves `Building -> Sending -> Succeeded`, or
//! `Sending -> (retryable) -> Sending` until the budget is spent, or
//! `Sending -> TerminalFailure`.

// Author: kelexine (https://github.com/kelexine)

mod operation;

pub use operation::Operation;

use crate::auth::CredentialCache;
use crate::config::SessionConfig;
use crate::error::{snippet, TransportError, VaduError, Result};
use crate::metrics;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::utils::logging::mask_token;
use crate::utils::retry::is_retryable_status;
use backoff::backoff::Backoff;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn, Instrument};

/// Executes operations against the API with cached credentials and retries.
#[derive(Clone)]
pub struct Executor {
    session: Arc<SessionConfig>,
    transport: Arc<dyn Transport>,
    credentials: CredentialCache,
}

/// Why one attempt did not produce a usable response.
enum AttemptFailure {
    Network(TransportError),
    Status(HttpResponse),
}

impl AttemptFailure {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptFailure::Network(e) => e.is_retryable(),
            AttemptFailure::Status(response) => is_retryable_status(response.status),
        }
    }

    fn describe(&self) -> String {
        match self {
            AttemptFailure::Network(e) => e.to_string(),
            AttemptFailure::Status(response) => {
                format!("HTTP {}: {}", response.status, snippet(&response.body))
            }
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            AttemptFailure::Network(_) => None,
            AttemptFailure::Status(response) => Some(response.status),
        }
    }
}

impl Executor {
    pub fn new(
        session: Arc<SessionConfig>,
        transport: Arc<dyn Transport>,
        credentials: CredentialCache,
    ) -> Self {
        Self {
            session,
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Run `operation` to completion and decode its response.
    ///
    /// Dropping the returned future aborts the in-flight attempt and any
    /// pending backoff sleep.
    pub async fn execute<T: DeserializeOwned>(&self, operation: Operation<T>) -> Result<T> {
        let span = tracing::info_span!(
            "vadu_operation",
            operation = operation.name(),
            request_id = %uuid::Uuid::new_v4().simple(),
        );

        let name = operation.name();
        let start = Instant::now();
        let result = self.run(operation).instrument(span).await;
        metrics::record_operation(name, result.is_ok(), start.elapsed().as_secs_f64());
        result
    }

    async fn run<T: DeserializeOwned>(&self, operation: Operation<T>) -> Result<T> {
        // Credential failures are not transport flakiness: no retry here.
        let token = self.credentials.get_token().await?;
        let request = self.build_request(&operation, &token);
        let policy = operation.policy();
        let name = operation.name();

        let mut backoff = policy.backoff();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(
                "{} attempt {}/{} with token {}",
                name,
                attempt,
                policy.max_attempts,
                mask_token(&token)
            );

            let failure = match self.transport.send(request.clone()).await {
                Ok(response) if response.status == 200 => {
                    metrics::record_attempt(name, "success");
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", name, attempt);
                    }
                    return operation.decode(&response.body);
                }
                Ok(response) => AttemptFailure::Status(response),
                Err(e) => AttemptFailure::Network(e),
            };

            if !failure.is_retryable() {
                metrics::record_attempt(name, "terminal");
                return Err(self.terminal_error(name, failure, &token));
            }

            metrics::record_attempt(name, "retryable");

            if attempt >= policy.max_attempts {
                error!(
                    "{} failed after {} attempt(s): {}",
                    name,
                    attempt,
                    failure.describe()
                );
                return Err(VaduError::TransientServer {
                    operation: name.to_string(),
                    attempts: attempt,
                    status: failure.status(),
                    cause: failure.describe(),
                });
            }

            let delay = backoff.next_backoff().unwrap_or(policy.max_backoff);
            warn!(
                "{} failed (attempt {}/{}): {}; retrying after {}ms",
                name,
                attempt,
                policy.max_attempts,
                failure.describe(),
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn build_request<T>(&self, operation: &Operation<T>, token: &str) -> HttpRequest {
        let mut request = HttpRequest::new(
            operation.method().clone(),
            self.session.api_url(operation.path()),
            self.session.request_timeout(),
        )
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json");

        if operation.sends_cookie() {
            request = request.header("Cookie", self.session.cookie.clone());
        }
        if let Some(body) = operation.body() {
            request = request.body(body.clone());
        }
        request
    }

    fn terminal_error(&self, name: &str, failure: AttemptFailure, token: &str) -> VaduError {
        match failure {
            AttemptFailure::Network(e) => {
                error!("{} could not be sent: {}", name, e);
                VaduError::Request {
                    operation: name.to_string(),
                    message: e.to_string(),
                }
            }
            AttemptFailure::Status(response) if matches!(response.status, 401 | 403) => {
                warn!("{} rejected with HTTP {}", name, response.status);
                self.credentials.invalidate_token(token);
                VaduError::Authorization {
                    operation: name.to_string(),
                    status: response.status,
                    body: snippet(&response.body),
                }
            }
            AttemptFailure::Status(response) => {
                error!(
                    "{} failed with HTTP {} - Response body: {}",
                    name,
                    response.status,
                    snippet(&response.body)
                );
                VaduError::UnexpectedStatus {
                    operation: name.to_string(),
                    status: response.status,
                    body: snippet(&response.body),
                }
            }
        }
    }
}
