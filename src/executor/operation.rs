// Operation descriptor consumed by the executor
// Author: kelexine (https://github.com/kelexine)

use crate::error::{snippet, VaduError, Result};
use crate::utils::retry::RetryPolicy;
use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::error;

/// Describes one remote call: method, path relative to the API endpoint,
/// optional JSON body, retry policy, and the type the response decodes into.
#[derive(Debug, Clone)]
pub struct Operation<T> {
    name: &'static str,
    method: Method,
    path: String,
    body: Option<Bytes>,
    send_cookie: bool,
    policy: RetryPolicy,
    _response: PhantomData<fn() -> T>,
}

impl<T> Operation<T> {
    pub fn new(name: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            name,
            method,
            path: path.into(),
            body: None,
            send_cookie: false,
            policy: RetryPolicy::default(),
            _response: PhantomData,
        }
    }

    pub fn get(name: &'static str, path: impl Into<String>) -> Self {
        Self::new(name, Method::GET, path)
    }

    /// POST with `body` serialized to JSON up front.
    pub fn post<B: Serialize + ?Sized>(
        name: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self> {
        let encoded = serde_json::to_vec(body)?;
        Ok(Self::new(name, Method::POST, path).with_body(Bytes::from(encoded)))
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach the session cookie to the request.
    pub fn with_cookie(mut self) -> Self {
        self.send_cookie = true;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn sends_cookie(&self) -> bool {
        self.send_cookie
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<T: DeserializeOwned> Operation<T> {
    /// Decode a 200 response body.
    pub fn decode(&self, body: &[u8]) -> Result<T> {
        serde_json::from_slice(body).map_err(|e| {
            error!("Failed to parse {} response: {}", self.name, e);
            VaduError::MalformedResponse {
                operation: self.name.to_string(),
                reason: e.to_string(),
                snippet: snippet(body),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        id: u64,
    }

    #[test]
    fn test_post_serializes_body() {
        let op: Operation<Echo> =
            Operation::post("echo", "/echo", &serde_json::json!({"id": 7})).unwrap();
        assert_eq!(op.method(), &Method::POST);
        assert_eq!(op.body().unwrap().as_ref(), br#"{"id":7}"#);
        assert!(!op.sends_cookie());
    }

    #[test]
    fn test_decode_failure_is_malformed() {
        let op: Operation<Echo> = Operation::get("echo", "/echo");
        assert_eq!(op.decode(br#"{"id": 3}"#).unwrap(), Echo { id: 3 });

        let err = op.decode(b"<html>oops</html>").unwrap_err();
        match err {
            VaduError::MalformedResponse { operation, snippet, .. } => {
                assert_eq!(operation, "echo");
                assert!(snippet.contains("<html>"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
