use thiserror::Error;

use super::codes::ErrorCode;

/// A failure that business logic has classified with an [`ErrorCode`].
///
/// The message is for operators only; it is logged but never sent to clients.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, format!("Not found: {}", what.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

/// Classify any error for the client.
///
/// The first [`AppError`] found in the cause chain wins, so context added with
/// `anyhow::Context` on top of a classified error keeps its code.
pub fn classify(error: &anyhow::Error) -> ErrorCode {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<AppError>())
        .map(|app| app.code)
        .unwrap_or(ErrorCode::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_classify_app_error() {
        let err = anyhow::Error::new(AppError::conflict("already exists"));
        assert_eq!(classify(&err), ErrorCode::Conflict);
    }

    #[test]
    fn test_classify_generic_error_is_unknown() {
        let err = anyhow!("connection reset by peer");
        assert_eq!(classify(&err), ErrorCode::Unknown);

        let io = anyhow::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk on fire",
        ));
        assert_eq!(classify(&io), ErrorCode::Unknown);
    }

    #[test]
    fn test_classify_sees_through_context() {
        let result: Result<(), AppError> = Err(AppError::validation("name is empty"));
        let err = result.context("creating session").unwrap_err();
        assert_eq!(classify(&err), ErrorCode::ValidationError);
    }

    #[test]
    fn test_helpers_carry_code_and_message() {
        let err = AppError::not_found("session 42");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("session 42"));
        assert_eq!(err.to_string(), "NOT_FOUND: Not found: session 42");

        assert_eq!(AppError::unauthorized("x").code, ErrorCode::Unauthorized);
        assert_eq!(AppError::forbidden("x").code, ErrorCode::Forbidden);
        assert_eq!(AppError::upstream("x").code, ErrorCode::UpstreamError);
        assert_eq!(AppError::unavailable("x").code, ErrorCode::ServiceUnavailable);
    }
}
