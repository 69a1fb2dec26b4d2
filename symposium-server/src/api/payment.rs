//! Payment API handlers
//!
//! POST /payment/create-order/: open a gateway order for a registration
//! POST /payment/verify/: checkout callback: verify signature, mark paid
//!
//! Field names are `order_id`, `payment_id`, `signature`; the
//! `razorpay_`-prefixed names emitted by the checkout widget are accepted too.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};

use crate::registration::PaymentOrder;
use crate::state::AppState;

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub registration_id: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default, alias = "razorpay_order_id")]
    pub order_id: Option<String>,
    #[serde(default, alias = "razorpay_payment_id")]
    pub payment_id: Option<String>,
    #[serde(default, alias = "razorpay_signature")]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(flatten)]
    pub order: PaymentOrder,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: &'static str,
    pub registration_id: i64,
}

// ── Helpers ──

/// Registration id as a positive integer, given as a JSON number or numeric string
fn parse_registration_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn bad_body(e: JsonRejection) -> AppError {
    tracing::debug!(error = %e, "Rejected payment body");
    AppError::invalid_request(format!("Invalid JSON body: {}", e.body_text()))
}

// ── POST /payment/create-order/ ──

pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<Json<CreateOrderResponse>> {
    let Json(req) = body.map_err(bad_body)?;

    let registration_id = match &req.registration_id {
        Value::Null => {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Registration ID is required",
            ));
        }
        // non-numeric ids cannot name a registration
        other => parse_registration_id(other)
            .ok_or_else(|| AppError::new(ErrorCode::RegistrationNotFound))?,
    };

    let order = state.registrations.initiate_payment(registration_id).await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order,
    }))
}

// ── POST /payment/verify/ ──

pub async fn verify_payment(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> AppResult<Json<VerifyResponse>> {
    let Json(req) = body.map_err(bad_body)?;

    let (Some(order_id), Some(payment_id), Some(signature)) = (
        non_empty(req.order_id),
        non_empty(req.payment_id),
        non_empty(req.signature),
    ) else {
        return Err(AppError::new(ErrorCode::PaymentParamsMissing));
    };

    let confirmed = state
        .registrations
        .confirm_payment(&order_id, &payment_id, &signature)
        .await?;

    Ok(Json(VerifyResponse {
        success: true,
        message: "Payment verified successfully",
        registration_id: confirmed.registration_id,
    }))
}
