//! In-memory bearer credential cache.
//!
//! The `CredentialCache` hands out a currently valid bearer token, performing a
//! login exchange lazily on a miss. The cached credential lives behind a
//! `parking_lot::RwLock<Option<Arc<Credential>>>`: a write replaces the whole
//! `Arc` at once, so readers see either the old credential or the new one,
//! never a value without its expiry.
//!
//! Refreshes are not single-flight. Concurrent callers that all observe a miss
//! may each run a login exchange; the last one to finish wins the slot.

// Author: kelexine (https://github.com/kelexine)

use super::{login, Clock, Credential};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::metrics;
use crate::transport::Transport;
use crate::utils::logging::mask_token;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared, cloneable handle to the credential slot of one client identity.
#[derive(Clone)]
pub struct CredentialCache {
    slot: Arc<RwLock<Option<Arc<Credential>>>>,
    session: Arc<SessionConfig>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl CredentialCache {
    pub fn new(
        session: Arc<SessionConfig>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
            session,
            transport,
            clock,
        }
    }

    /// Acquire a valid bearer token, logging in if necessary.
    ///
    /// 1. Fast path: the cached credential is still valid, return it.
    /// 2. Otherwise run one login exchange and store the result.
    ///
    /// Nothing is written when the exchange fails or the future is dropped
    /// before it completes.
    pub async fn get_token(&self) -> Result<String> {
        if let Some(credential) = self.valid_credential() {
            metrics::record_credential_hit();
            debug!("Credential cache hit ({})", mask_token(credential.value()));
            return Ok(credential.value().to_string());
        }

        metrics::record_credential_miss();
        debug!("Credential cache miss; performing login exchange");

        let credential = match login::exchange(
            self.transport.as_ref(),
            &self.session,
            self.clock.as_ref(),
        )
        .await
        {
            Ok(credential) => {
                metrics::record_login(true);
                Arc::new(credential)
            }
            Err(e) => {
                metrics::record_login(false);
                warn!("Login exchange failed: {}", e);
                return Err(e);
            }
        };

        {
            let mut slot = self.slot.write();
            *slot = Some(Arc::clone(&credential));
        }

        info!(
            "New token {} cached until {}",
            mask_token(credential.value()),
            credential.expires_at()
        );
        Ok(credential.value().to_string())
    }

    /// Drop the cached credential; the next `get_token` logs in again.
    pub fn invalidate(&self) {
        let removed = self.slot.write().take();
        if removed.is_some() {
            metrics::record_invalidation("explicit");
            info!("Cached credential invalidated");
        }
    }

    /// Drop the cached credential only if it still holds `token`.
    ///
    /// Used after the API rejects a token, so that a fresher credential stored
    /// by a concurrent caller survives. Returns whether anything was removed.
    pub fn invalidate_token(&self, token: &str) -> bool {
        let mut slot = self.slot.write();
        let matches = slot
            .as_ref()
            .map(|credential| credential.value() == token)
            .unwrap_or(false);

        if matches {
            *slot = None;
            metrics::record_invalidation("rejected");
            warn!("Credential {} rejected by the API; invalidated", mask_token(token));
        }
        matches
    }

    /// The cached credential, valid or not.
    pub fn current(&self) -> Option<Arc<Credential>> {
        self.slot.read().clone()
    }

    fn valid_credential(&self) -> Option<Arc<Credential>> {
        let now = self.clock.now();
        self.slot
            .read()
            .as_ref()
            .filter(|credential| credential.is_valid_at(now))
            .cloned()
    }
}
