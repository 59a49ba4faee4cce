// Error types for the Vadu client
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

/// Upper bound on the response body excerpt kept inside errors.
pub const SNIPPET_LIMIT: usize = 512;

#[derive(Error, Debug)]
pub enum VaduError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{operation}: authorization rejected (HTTP {status}): {body}")]
    Authorization {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation}: transient failure after {attempts} attempt(s): {cause}")]
    TransientServer {
        operation: String,
        attempts: u32,
        status: Option<u16>,
        cause: String,
    },

    #[error("{operation}: malformed response: {reason} (body: {snippet})")]
    MalformedResponse {
        operation: String,
        reason: String,
        snippet: String,
    },

    #[error("{operation}: unexpected HTTP {status}: {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation}: request could not be sent: {message}")]
    Request { operation: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authorization,
    TransientServer,
    MalformedResponse,
    UnexpectedStatus,
    Validation,
    Internal,
}

impl VaduError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaduError::Config(_) | VaduError::ConfigParsing(_) => ErrorKind::Configuration,
            VaduError::Authorization { .. } => ErrorKind::Authorization,
            VaduError::TransientServer { .. } => ErrorKind::TransientServer,
            VaduError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            VaduError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            VaduError::Validation(_) => ErrorKind::Validation,
            VaduError::Request { .. } | VaduError::Json(_) | VaduError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether a caller may reasonably try the whole operation again later.
    ///
    /// Only transient server failures qualify; the executor has already spent
    /// its own attempt budget by the time one of these reaches the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VaduError::TransientServer { .. })
    }

    /// HTTP status associated with the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            VaduError::Authorization { status, .. } | VaduError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            VaduError::TransientServer { status, .. } => *status,
            _ => None,
        }
    }

    /// Number of attempts spent before giving up.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            VaduError::TransientServer { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Name of the remote operation that failed.
    pub fn operation(&self) -> Option<&str> {
        match self {
            VaduError::Authorization { operation, .. }
            | VaduError::TransientServer { operation, .. }
            | VaduError::MalformedResponse { operation, .. }
            | VaduError::UnexpectedStatus { operation, .. }
            | VaduError::Request { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

/// Network-level failure reported by a [`crate::transport::Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The request did not complete within its timeout.
    Timeout,
    /// No connection could be established.
    Connect,
    /// The connection dropped while reading the body.
    Body,
    /// The request itself is invalid (bad URL, bad header value, redirect loop).
    Request,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, TransportErrorKind::Request)
    }
}

/// Bounded, sanitized excerpt of a response body for diagnostics.
pub fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let sanitized = crate::utils::logging::sanitize(&text);
    if sanitized.chars().count() <= SNIPPET_LIMIT {
        return sanitized;
    }
    let mut cut: String = sanitized.chars().take(SNIPPET_LIMIT).collect();
    cut.push_str("...");
    cut
}

pub type Result<T> = std::result::Result<T, VaduError>;
