//! API routes for the symposium server

pub mod content;
pub mod health;
pub mod payment;
pub mod registration;
pub mod webhook;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;

/// Create the API router (no transport layers)
pub fn create_router(state: AppState) -> Router {
    // Public content
    let content = Router::new()
        .route("/brochures/", get(content::list_brochures))
        .route("/events/", get(content::list_events))
        .route("/team/", get(content::list_team));

    // Registration flow
    let registration = Router::new()
        .route("/registration/create/", post(registration::create_registration))
        .route("/registration/{id}/", get(registration::get_registration));

    // Payments (webhook is signature-verified, raw body)
    let payments = Router::new()
        .route("/payment/create-order/", post(payment::create_order))
        .route("/payment/verify/", post(payment::verify_payment))
        .route("/payment/webhook/", post(webhook::handle_webhook));

    Router::new()
        .route("/health/", get(health::health_check))
        .merge(content)
        .merge(registration)
        .merge(payments)
        .with_state(state)
}

/// Router with CORS and request tracing, as served
pub fn app(state: AppState, config: &Config) -> Router {
    create_router(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Any origin in development; otherwise only the configured origins, with credentials
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}
