// vadu - Client SDK for the Vadu credit-analysis API
// Author: kelexine (https://github.com/kelexine)

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod models;
pub mod transport;
pub mod utils;

pub use auth::{Clock, Credential, CredentialCache, ManualClock, SystemClock};
pub use client::{VaduClient, VaduClientBuilder, MAX_DETAILED_RECORDS, MAX_IDENTIFIERS};
pub use config::{AppConfig, LoggingConfig, RetryConfig, SessionConfig};
pub use error::{ErrorKind, Result, TransportError, TransportErrorKind, VaduError};
pub use executor::{Executor, Operation};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use utils::retry::RetryPolicy;
