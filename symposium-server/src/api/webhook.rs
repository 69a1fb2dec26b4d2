//! Razorpay webhook handler
//!
//! POST /payment/webhook/: raw body, signed via `X-Razorpay-Signature`

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::registration::{RegistrationError, WebhookOutcome};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Handle incoming Razorpay webhook events
///
/// Must receive the raw body (not JSON) for HMAC verification. Store errors
/// answer 500 so the gateway redelivers; everything else that verified is
/// acknowledged with 200.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match state.registrations.handle_webhook(&body, signature).await {
        Ok(outcome) => {
            if let WebhookOutcome::UnknownOrder = outcome {
                tracing::info!("Webhook acknowledged for unknown order");
            }
            StatusCode::OK
        }
        Err(RegistrationError::Signature | RegistrationError::Validation(_)) => {
            StatusCode::BAD_REQUEST
        }
        Err(e) => {
            tracing::error!(error = %e, "Webhook processing failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
