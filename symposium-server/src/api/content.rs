//! Promotional content endpoints
//!
//! GET /brochures/: paginated active brochures
//! GET /events/: timeline
//! GET /team/: organising team

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Brochure, TeamMember, TimelineEvent};

use crate::db::content;
use crate::state::AppState;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 12;

// ── Request / Response types ──

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct BrochureView {
    #[serde(flatten)]
    pub brochure: Brochure,
    pub pdf_url: String,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberView {
    #[serde(flatten)]
    pub member: TeamMember,
    pub photo_url: Option<String>,
}

// ── Helpers ──

/// Absolute URL for a stored media path; absolute URLs pass through
pub fn media_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Page size from the query: invalid or non-positive → default, capped at the max
fn page_size(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(size) if size > 0 => size.min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// 1-based page number; `last` selects the final page
fn page_number(raw: Option<&str>, last_page: i64) -> AppResult<i64> {
    let page = match raw.map(str::trim) {
        None | Some("") => 1,
        Some("last") => last_page,
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| AppError::new(ErrorCode::InvalidPage))?,
    };
    if page < 1 || page > last_page {
        return Err(AppError::new(ErrorCode::InvalidPage));
    }
    Ok(page)
}

fn page_link(page: i64, size: Option<i64>) -> String {
    match size {
        Some(size) => format!("/brochures/?page={page}&page_size={size}"),
        None => format!("/brochures/?page={page}"),
    }
}

// ── GET /brochures/ ──

pub async fn list_brochures(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BrochureView>>> {
    let size = page_size(query.page_size.as_deref());
    let count = content::count_active_brochures(&state.db.pool).await?;
    // an empty listing still has one (empty) first page
    let last_page = ((count + size - 1) / size).max(1);
    let page = page_number(query.page.as_deref(), last_page)?;

    let brochures =
        content::list_active_brochures(&state.db.pool, size, (page - 1) * size).await?;

    let link_size = query.page_size.as_ref().map(|_| size);
    let results = brochures
        .into_iter()
        .map(|brochure| BrochureView {
            pdf_url: media_url(&state.media_base_url, &brochure.pdf_file),
            cover_image_url: brochure
                .cover_image
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| media_url(&state.media_base_url, p)),
            brochure,
        })
        .collect();

    Ok(Json(Page {
        count,
        next: (page < last_page).then(|| page_link(page + 1, link_size)),
        previous: (page > 1).then(|| page_link(page - 1, link_size)),
        results,
    }))
}

// ── GET /events/ ──

pub async fn list_events(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TimelineEvent>>> {
    let events = content::list_timeline_events(&state.db.pool).await?;
    Ok(ApiResponse::list(events))
}

// ── GET /team/ ──

pub async fn list_team(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TeamMemberView>>> {
    let members = content::list_team_members(&state.db.pool).await?;
    let views = members
        .into_iter()
        .map(|member| TeamMemberView {
            photo_url: member
                .photo
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| media_url(&state.media_base_url, p)),
            member,
        })
        .collect();
    Ok(ApiResponse::list(views))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url("http://localhost:8000/media/", "/brochures/a.pdf"),
            "http://localhost:8000/media/brochures/a.pdf"
        );
        assert_eq!(
            media_url("http://cdn", "https://other/x.png"),
            "https://other/x.png"
        );
    }

    #[test]
    fn test_page_size_rules() {
        assert_eq!(page_size(None), 6);
        assert_eq!(page_size(Some("3")), 3);
        assert_eq!(page_size(Some("50")), 12);
        assert_eq!(page_size(Some("0")), 6);
        assert_eq!(page_size(Some("-2")), 6);
        assert_eq!(page_size(Some("abc")), 6);
    }

    #[test]
    fn test_page_number_rules() {
        assert_eq!(page_number(None, 3).unwrap(), 1);
        assert_eq!(page_number(Some("2"), 3).unwrap(), 2);
        assert_eq!(page_number(Some("last"), 3).unwrap(), 3);
        assert_eq!(
            page_number(Some("4"), 3).unwrap_err().code,
            ErrorCode::InvalidPage
        );
        assert!(page_number(Some("0"), 3).is_err());
        assert!(page_number(Some("two"), 3).is_err());
        assert_eq!(page_number(Some("1"), 1).unwrap(), 1);
    }
}
