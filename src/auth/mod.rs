// Bearer credential management module
// Author: kelexine (https://github.com/kelexine)

mod cache;
pub mod login;

pub use cache::CredentialCache;

use crate::error::{VaduError, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A bearer token together with its validity window.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    value: String,
    #[zeroize(skip)]
    issued_at: DateTime<Utc>,
    #[zeroize(skip)]
    expires_at: DateTime<Utc>,
}

// Custom Debug impl that never logs the token
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("value", &crate::utils::logging::mask_token(&self.value))
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Credential {
    /// Issue a credential valid for `ttl` from `issued_at`.
    ///
    /// A zero TTL is rejected: `expires_at` must lie strictly after `issued_at`.
    /// So is a TTL that would push `expires_at` past the representable range.
    pub fn issue(value: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Result<Self> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| VaduError::Config(format!("Token TTL out of range: {}", e)))?;
        if ttl <= chrono::Duration::zero() {
            return Err(VaduError::Config("Token TTL must be positive".to_string()));
        }
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| VaduError::Config("Token TTL out of range".to_string()))?;

        Ok(Self {
            value: value.into(),
            issued_at,
            expires_at,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Valid iff `now` is strictly before the expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Get remaining time until expiry in seconds
    pub fn expires_in_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to, for deterministic expiry.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
        *self.now.lock() += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
