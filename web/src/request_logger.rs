//! Structured request logging middleware
//!
//! Emits one tracing event per request with method, path, status and timing.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Maximum length for logged query strings before truncation
const MAX_QUERY_LENGTH: usize = 30;

/// Truncation suffix for long values
const TRUNCATION_SUFFIX: &str = "...";

/// Request logging middleware
///
/// Successful and client-error responses are logged at `info`, server errors
/// at `warn`.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(truncate_value).unwrap_or_default();

    let response = next.run(request).await;
    let latency_ms = start_time.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        tracing::warn!(%method, %path, %query, status, latency_ms, "request failed");
    } else {
        tracing::info!(%method, %path, %query, status, latency_ms, "request handled");
    }

    response
}

/// Truncate a value to [`MAX_QUERY_LENGTH`] characters
fn truncate_value(value: &str) -> String {
    if value.chars().count() <= MAX_QUERY_LENGTH {
        value.to_string()
    } else {
        let kept: String = value
            .chars()
            .take(MAX_QUERY_LENGTH - TRUNCATION_SUFFIX.len())
            .collect();
        format!("{kept}{TRUNCATION_SUFFIX}")
    }
}
