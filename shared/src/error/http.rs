//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::InvalidPage | Self::RegistrationNotFound => StatusCode::NOT_FOUND,

            // 502 Bad Gateway (remote provider failed)
            Self::GatewayError => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, duplicate email, already paid, signature)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
