//! symposium-server: event registration and payment backend
//!
//! - Promotional content listings (brochures, timeline, team)
//! - Attendee registration with field validation and duplicate-email checks
//! - Razorpay orders, checkout signature verification and webhooks
//! - Confirmation and admin alert emails

pub mod api;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod logger;
pub mod payment;
pub mod registration;
pub mod state;
pub mod validation;

pub use config::Config;
pub use state::AppState;
