//! Bridge from store errors to the API error type
//!
//! Registration-flow errors map through `RegistrationError`; handlers that
//! read the store directly (content listings, health) use this conversion.
//! Store details are logged and never sent to clients.

use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = %e, "Store error");
        AppError::new(ErrorCode::InternalError)
    }
}
