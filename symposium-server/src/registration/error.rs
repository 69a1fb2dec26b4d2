//! Registration flow errors and their HTTP mapping

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::RepoError;
use crate::payment::GatewayError;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Email already registered")]
    Duplicate,

    #[error("Registration not found")]
    NotFound,

    #[error("Registration already paid")]
    AlreadyPaid,

    /// Registration was marked failed; it accepts no further payment
    #[error("Registration closed")]
    RegistrationClosed,

    #[error("Signature verification failed")]
    Signature,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] RepoError),
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;

impl From<RegistrationError> for AppError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::Validation(fields) => AppError::validation_fields(fields),
            RegistrationError::Duplicate => AppError::new(ErrorCode::EmailAlreadyRegistered),
            RegistrationError::NotFound => AppError::new(ErrorCode::RegistrationNotFound),
            RegistrationError::AlreadyPaid => AppError::new(ErrorCode::RegistrationAlreadyPaid),
            RegistrationError::RegistrationClosed => AppError::new(ErrorCode::RegistrationClosed),
            RegistrationError::Signature => AppError::new(ErrorCode::SignatureInvalid),
            RegistrationError::Gateway(err) => {
                tracing::error!(error = %err, "Payment gateway error");
                AppError::with_message(ErrorCode::GatewayError, format!("Order creation failed: {err}"))
            }
            RegistrationError::Store(err) => {
                tracing::error!(error = %err, "Registration store error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RegistrationError::Validation(FieldErrors::new()), StatusCode::BAD_REQUEST),
            (RegistrationError::Duplicate, StatusCode::BAD_REQUEST),
            (RegistrationError::NotFound, StatusCode::NOT_FOUND),
            (RegistrationError::AlreadyPaid, StatusCode::BAD_REQUEST),
            (RegistrationError::RegistrationClosed, StatusCode::BAD_REQUEST),
            (RegistrationError::Signature, StatusCode::BAD_REQUEST),
            (
                RegistrationError::Gateway(GatewayError::InvalidResponse("x".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                RegistrationError::Store(RepoError::Corrupt("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).http_status(), status);
        }
    }

    #[test]
    fn test_store_error_message_is_generic() {
        let app: AppError = RegistrationError::Store(RepoError::Corrupt("secret detail".into())).into();
        assert_eq!(app.message, "Internal server error");
    }

    #[test]
    fn test_validation_fields_carried() {
        let fields = FieldErrors::from([("email".to_string(), "Invalid email format".to_string())]);
        let app: AppError = RegistrationError::Validation(fields).into();
        assert_eq!(app.details.unwrap()["email"], "Invalid email format");
    }
}
