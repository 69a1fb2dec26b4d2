//! Registration API handlers
//!
//! POST /registration/create/: validate + persist a pending registration
//! GET  /registration/{id}/: registration details for the payment page

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::RegistrationDetail;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub registration_id: i64,
    pub message: &'static str,
    pub registration_fee: Decimal,
}

// ── POST /registration/create/ ──

pub async fn create_registration(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateResponse>)> {
    let Json(payload) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected registration body");
        AppError::invalid_request(format!("Invalid JSON body: {}", e.body_text()))
    })?;

    let created = state.registrations.create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            success: true,
            registration_id: created.registration_id,
            message: "Registration created successfully. Proceed to payment.",
            registration_fee: created.registration_fee,
        }),
    ))
}

// ── GET /registration/{id}/ ──

pub async fn get_registration(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<RegistrationDetail>> {
    let registration_id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::new(ErrorCode::RegistrationNotFound))?;

    let detail = state.registrations.get(registration_id).await?;
    Ok(ApiResponse::success(detail))
}
