//! Promotional content queries (brochures, timeline, team)

use shared::models::{Brochure, TeamMember, TimelineEvent};
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn count_active_brochures(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM brochure WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// One page of active brochures, `order` ascending then newest first
pub async fn list_active_brochures(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Brochure>> {
    let rows = sqlx::query_as(
        r#"SELECT id, title, description, pdf_file, cover_image, upload_date, is_active,
                  display_order AS "order"
           FROM brochure
           WHERE is_active = 1
           ORDER BY display_order ASC, upload_date DESC, id DESC
           LIMIT ? OFFSET ?"#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_timeline_events(pool: &SqlitePool) -> RepoResult<Vec<TimelineEvent>> {
    let rows = sqlx::query_as(
        r#"SELECT id, title, description, event_date, event_time, duration, location,
                  display_order AS "order"
           FROM timeline_event
           ORDER BY display_order, event_date, event_time"#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_team_members(pool: &SqlitePool) -> RepoResult<Vec<TeamMember>> {
    let rows = sqlx::query_as(
        r#"SELECT id, name, role, photo, bio, email, linkedin, display_order AS "order"
           FROM team_member
           ORDER BY display_order, id"#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn seed_brochure(pool: &SqlitePool, title: &str, order: i64, uploaded: i64, active: bool) {
        sqlx::query(
            "INSERT INTO brochure (title, description, pdf_file, upload_date, is_active, display_order)
             VALUES (?, '', 'brochures/pdfs/x.pdf', ?, ?, ?)",
        )
        .bind(title)
        .bind(uploaded)
        .bind(active)
        .bind(order)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_brochures_ordered_and_filtered() {
        let db = DbService::in_memory().await.unwrap();
        seed_brochure(&db.pool, "late", 2, 10, true).await;
        seed_brochure(&db.pool, "first-old", 1, 10, true).await;
        seed_brochure(&db.pool, "first-new", 1, 20, true).await;
        seed_brochure(&db.pool, "hidden", 0, 30, false).await;

        assert_eq!(count_active_brochures(&db.pool).await.unwrap(), 3);

        let page = list_active_brochures(&db.pool, 10, 0).await.unwrap();
        let titles: Vec<_> = page.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["first-new", "first-old", "late"]);
        assert_eq!(page[0].order, 1);

        let second = list_active_brochures(&db.pool, 2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].title, "late");
    }

    #[tokio::test]
    async fn test_timeline_and_team_ordering() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO timeline_event (title, event_date, event_time, display_order) VALUES
             ('Closing', '2025-03-02', '17:00:00', 1),
             ('Keynote', '2025-03-01', '10:00:00', 1),
             ('Opening', '2025-03-01', '09:00:00', 0)",
        )
        .execute(&db.pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO team_member (name, role, display_order) VALUES
             ('Second', 'Volunteer', 2), ('First', 'Lead', 1)",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let events = list_timeline_events(&db.pool).await.unwrap();
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Opening", "Keynote", "Closing"]);

        let team = list_team_members(&db.pool).await.unwrap();
        assert_eq!(team[0].name, "First");
        assert!(team[0].photo.is_none());
    }
}
