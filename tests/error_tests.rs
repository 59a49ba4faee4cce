// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use vadu::error::{snippet, SNIPPET_LIMIT};
use vadu::{ErrorKind, TransportError, TransportErrorKind, VaduError};

fn transient() -> VaduError {
    VaduError::TransientServer {
        operation: "analysis_status".to_string(),
        attempts: 5,
        status: Some(503),
        cause: "HTTP 503".to_string(),
    }
}

#[test]
fn test_error_display_messages() {
    let errors = vec![
        VaduError::Config("Client identity is not set".to_string()),
        VaduError::Authorization {
            operation: "login".to_string(),
            status: 401,
            body: "denied".to_string(),
        },
        transient(),
        VaduError::MalformedResponse {
            operation: "analysis_summary".to_string(),
            reason: "expected value".to_string(),
            snippet: "<html>".to_string(),
        },
        VaduError::UnexpectedStatus {
            operation: "analysis_summary".to_string(),
            status: 404,
            body: "not found".to_string(),
        },
        VaduError::Validation("identifier list is empty".to_string()),
        VaduError::Internal("boom".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_transient_error_carries_attempts_and_status() {
    let error = transient();
    assert_eq!(error.kind(), ErrorKind::TransientServer);
    assert!(error.is_retryable());
    assert_eq!(error.attempts(), Some(5));
    assert_eq!(error.status(), Some(503));
    assert_eq!(error.operation(), Some("analysis_status"));
    assert!(format!("{}", error).contains("after 5 attempt(s)"));
}

#[test]
fn test_only_transient_errors_are_retryable() {
    let terminal = vec![
        VaduError::Config("x".to_string()),
        VaduError::Authorization {
            operation: "login".to_string(),
            status: 403,
            body: String::new(),
        },
        VaduError::UnexpectedStatus {
            operation: "submit_batch".to_string(),
            status: 400,
            body: String::new(),
        },
        VaduError::Request {
            operation: "submit_batch".to_string(),
            message: "invalid URL".to_string(),
        },
        VaduError::Validation("x".to_string()),
    ];

    for error in terminal {
        assert!(!error.is_retryable(), "{:?} should be terminal", error);
        assert_eq!(error.attempts(), None);
    }
}

#[test]
fn test_error_kinds() {
    assert_eq!(VaduError::Config("x".to_string()).kind(), ErrorKind::Configuration);
    assert_eq!(VaduError::Validation("x".to_string()).kind(), ErrorKind::Validation);

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: VaduError = json_error.into();
    assert_eq!(error.kind(), ErrorKind::Internal);
}

#[test]
fn test_authorization_error_reports_status() {
    let error = VaduError::Authorization {
        operation: "list_analysis_groups".to_string(),
        status: 403,
        body: "forbidden".to_string(),
    };
    assert_eq!(error.status(), Some(403));
    assert!(format!("{}", error).contains("HTTP 403"));
}

#[test]
fn test_transport_error_retryability() {
    assert!(TransportError::timeout("timed out").is_retryable());
    assert!(TransportError::connect("refused").is_retryable());
    assert!(TransportError::new(TransportErrorKind::Body, "reset").is_retryable());
    assert!(!TransportError::new(TransportErrorKind::Request, "bad url").is_retryable());
}

#[test]
fn test_snippet_is_bounded_and_redacted() {
    let long = "x".repeat(SNIPPET_LIMIT * 3);
    let cut = snippet(long.as_bytes());
    assert!(cut.chars().count() <= SNIPPET_LIMIT + 3);
    assert!(cut.ends_with("..."));

    let leaked = snippet(br#"{"token":"eyJhbGciOiJIUzI1NiJ9.secret"}"#);
    assert!(!leaked.contains("eyJhbGciOiJIUzI1NiJ9"));
    assert!(leaked.contains("[REDACTED]"));
}
