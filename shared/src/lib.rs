//! Shared types for the symposium backend
//!
//! Error system, domain models, the fixed event catalog and small utilities
//! used by the server crate and its tests.

pub mod catalog;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
