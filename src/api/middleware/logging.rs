use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::logging::ACCESS_TARGET;

/// Emit one access-log event per request on the `access` target.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = sanitize_query(request.uri().query().unwrap_or(""));

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_success() || status.is_redirection() || status.is_informational() {
        info!(
            target: ACCESS_TARGET,
            request_id = %request_id,
            method = %method,
            path = %path,
            query = %query,
            status = status.as_u16(),
            duration_ms,
            "Request completed"
        );
    } else {
        warn!(
            target: ACCESS_TARGET,
            request_id = %request_id,
            method = %method,
            path = %path,
            query = %query,
            status = status.as_u16(),
            duration_ms,
            "Request failed"
        );
    }

    response
}

/// Mask credential-looking query values before they reach the logs
fn sanitize_query(query: &str) -> String {
    const SENSITIVE: [&str; 4] = ["api_key", "token", "password", "secret"];

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE.contains(&key) => format!("{}=***", key),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
