use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::error;
use utoipa::ToSchema;

use super::app_error::classify;
use super::codes::ErrorCode;
use crate::metrics::registry::ERRORS_TRANSLATED_TOTAL;

/// Body used when the envelope itself cannot be serialized.
const FALLBACK_BODY: &str = r#"{"errorCode":"UNKNOWN"}"#;

/// Structured error response
///
/// Every failed request carries exactly this shape, whatever the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    #[serde(rename = "errorCode")]
    pub error_code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(error_code: ErrorCode) -> Self {
        Self { error_code }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        ERRORS_TRANSLATED_TOTAL
            .with_label_values(&[self.error_code.as_str()])
            .inc();

        let status = self.error_code.status_code();
        match serde_json::to_vec(&self) {
            Ok(bytes) => json_response(status, bytes),
            Err(e) => {
                error!(error = %e, "Failed to serialize error response");
                fallback_response()
            }
        }
    }
}

/// Error returned by request handlers.
///
/// Wraps any error so handlers can use `?` freely; converting it into a
/// response is the single place where failures are classified and logged.
#[derive(Debug)]
pub struct ApiError(pub anyhow::Error);

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        classify(&self.0)
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        // {:?} on anyhow prints the whole cause chain and a backtrace if captured
        error!(
            error_code = %code,
            status = code.status_code().as_u16(),
            "Request failed: {:?}",
            self.0
        );

        ErrorResponse::new(code).into_response()
    }
}

/// Response for a panic caught while handling a request.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };

    error!(
        error_code = %ErrorCode::Unknown,
        status = ErrorCode::Unknown.status_code().as_u16(),
        panic = %detail,
        "Handler panicked"
    );

    ErrorResponse::new(ErrorCode::Unknown).into_response()
}

/// Fallback for requests that match no route.
pub async fn not_found() -> ErrorResponse {
    ErrorResponse::new(ErrorCode::NotFound)
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

fn fallback_response() -> Response {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        FALLBACK_BODY.as_bytes().to_vec(),
    )
}
