//! Error taxonomy and translation of failures into API responses

pub mod app_error;
pub mod codes;
pub mod response;

pub use app_error::{classify, AppError};
pub use codes::ErrorCode;
pub use response::{not_found, panic_response, ApiError, ErrorResponse};
