//! Promotional content models (brochures, schedule, team)
//!
//! Read-mostly records managed outside this service and rendered as stored.

use serde::{Deserialize, Serialize};

/// Downloadable brochure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brochure {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Media path of the PDF (relative to the media root, or absolute URL)
    pub pdf_file: String,
    pub cover_image: Option<String>,
    pub upload_date: i64,
    pub is_active: bool,
    pub order: i64,
}

/// Timeline (schedule) entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimelineEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub event_date: String,
    /// `HH:MM:SS`
    pub event_time: String,
    pub duration: String,
    pub location: String,
    pub order: i64,
}

/// Organizing team member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub photo: Option<String>,
    pub bio: String,
    pub email: String,
    pub linkedin: String,
    pub order: i64,
}
