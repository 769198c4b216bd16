//! Shared utilities for integration testing.

use std::io;

use fastcgi_gateway::{Gateway, RequestOutcome, ResponseBuffer};

/// Builds a request environment list from `KEY=VALUE` literals.
pub fn env(pairs: &[&str]) -> Vec<String> {
    pairs.iter().map(|s| s.to_string()).collect()
}

/// Environment for a bodyless request of `method` at `path`.
pub fn request_env(method: &str, path: &str) -> Vec<String> {
    env(&[
        &format!("REQUEST_METHOD={method}"),
        &format!("DOCUMENT_URI={path}"),
        &format!("REQUEST_URI={path}"),
        "SERVER_PROTOCOL=HTTP/1.1",
        "CONTENT_LENGTH=0",
    ])
}

/// Runs a bodyless request through `gateway` and returns the outcome.
pub fn drive(gateway: &Gateway, method: &str, path: &str) -> RequestOutcome {
    gateway.handle(request_env(method, path), io::empty(), io::sink())
}

/// Unwraps a completed outcome that carries a response.
#[allow(dead_code)]
pub fn expect_response(outcome: RequestOutcome) -> ResponseBuffer {
    match outcome {
        RequestOutcome::Completed {
            response: Some(response),
            ..
        } => response,
        other => panic!("expected a response, got {other:?}"),
    }
}
