//! Unified error codes for the symposium backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Registration errors
//! - 2xxx: Payment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Requested page does not exist
    InvalidPage = 8,

    // ==================== 1xxx: Registration ====================
    /// Registration not found
    RegistrationNotFound = 1001,
    /// Email already used by another registration
    EmailAlreadyRegistered = 1002,
    /// Registration has already been paid
    RegistrationAlreadyPaid = 1003,
    /// Registration was marked failed and accepts no payment
    RegistrationClosed = 1004,

    // ==================== 2xxx: Payment ====================
    /// Payment signature did not verify
    SignatureInvalid = 2002,
    /// Required payment parameters missing
    PaymentParamsMissing = 2003,
    /// Payment gateway returned an error or was unreachable
    GatewayError = 2004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::InvalidPage => "Invalid page.",

            // Registration
            ErrorCode::RegistrationNotFound => "Registration not found",
            ErrorCode::EmailAlreadyRegistered => {
                "This email is already registered. Please use a different email address."
            }
            ErrorCode::RegistrationAlreadyPaid => "This registration has already been paid for.",
            ErrorCode::RegistrationClosed => "Payment for this registration has failed",

            // Payment
            ErrorCode::SignatureInvalid => "Payment signature verification failed",
            ErrorCode::PaymentParamsMissing => "Missing payment parameters",
            ErrorCode::GatewayError => "Payment gateway error",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::InvalidPage),

            // Registration
            1001 => Ok(ErrorCode::RegistrationNotFound),
            1002 => Ok(ErrorCode::EmailAlreadyRegistered),
            1003 => Ok(ErrorCode::RegistrationAlreadyPaid),
            1004 => Ok(ErrorCode::RegistrationClosed),

            // Payment
            2002 => Ok(ErrorCode::SignatureInvalid),
            2003 => Ok(ErrorCode::PaymentParamsMissing),
            2004 => Ok(ErrorCode::GatewayError),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
