//! Registration queries
//!
//! The `pending → paid` transition is a single conditional UPDATE guarded on
//! `payment_status = 'pending'`; the returned row decides which caller
//! performed it.

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::models::{EventDetail, NewRegistration, PaymentStatus, Registration};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

/// Raw `registration` row; list columns are JSON text
#[derive(Debug, sqlx::FromRow)]
pub struct RegistrationRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub college: String,
    pub department: String,
    pub registration_fee: String,
    pub payment_status: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub registration_date: i64,
    pub payment_date: Option<i64>,
    pub num_events: i64,
    pub selected_events: String,
    pub event_details: String,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = RepoError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let registration_fee = Decimal::from_str(&row.registration_fee).map_err(|e| {
            RepoError::Corrupt(format!("registration {} fee: {e}", row.id))
        })?;
        let payment_status = PaymentStatus::from_db(&row.payment_status).ok_or_else(|| {
            RepoError::Corrupt(format!(
                "registration {} status: {}",
                row.id, row.payment_status
            ))
        })?;
        let selected_events: Vec<u8> = serde_json::from_str(&row.selected_events)
            .map_err(|e| RepoError::Corrupt(format!("registration {} events: {e}", row.id)))?;
        let event_details: Vec<EventDetail> = serde_json::from_str(&row.event_details)
            .map_err(|e| RepoError::Corrupt(format!("registration {} details: {e}", row.id)))?;

        Ok(Registration {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            college: row.college,
            department: row.department,
            registration_fee,
            payment_status,
            order_id: row.order_id,
            payment_id: row.payment_id,
            registration_date: row.registration_date,
            payment_date: row.payment_date,
            num_events: row.num_events,
            selected_events,
            event_details,
        })
    }
}

const COLUMNS: &str = "id, name, phone, email, college, department, registration_fee, \
     payment_status, order_id, payment_id, registration_date, payment_date, num_events, \
     selected_events, event_details";

fn to_json<T: serde::Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|e| RepoError::Corrupt(e.to_string()))
}

fn convert(row: Option<RegistrationRow>) -> RepoResult<Option<Registration>> {
    row.map(Registration::try_from).transpose()
}

/// Insert a `pending` registration; `num_events` is derived from the event list
pub async fn insert(
    pool: &SqlitePool,
    new: &NewRegistration,
    fee: Decimal,
    now: i64,
) -> RepoResult<Registration> {
    let row: RegistrationRow = sqlx::query_as(&format!(
        "INSERT INTO registration (name, phone, email, college, department, registration_fee, \
         payment_status, registration_date, num_events, selected_events, event_details) \
         VALUES (?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(&new.name)
    .bind(&new.phone)
    .bind(&new.email)
    .bind(&new.college)
    .bind(&new.department)
    .bind(fee.round_dp(2).to_string())
    .bind(now)
    .bind(new.num_events())
    .bind(to_json(&new.selected_events)?)
    .bind(to_json(&new.event_details)?)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Registration>> {
    let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM registration WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    convert(row)
}

pub async fn find_by_order_id(
    pool: &SqlitePool,
    order_id: &str,
) -> RepoResult<Option<Registration>> {
    let row = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM registration WHERE order_id = ?"
    ))
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    convert(row)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM registration WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Store the gateway order id on a pending registration that has none yet
///
/// Returns false when the registration is no longer pending or another
/// caller attached an order first.
pub async fn attach_order(pool: &SqlitePool, id: i64, order_id: &str) -> RepoResult<bool> {
    let result = sqlx::query(
        "UPDATE registration SET order_id = ? \
         WHERE id = ? AND payment_status = 'pending' AND order_id IS NULL",
    )
    .bind(order_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// `pending → paid` for the registration owning `order_id`
///
/// Returns the updated registration only to the caller that performed the
/// transition; `None` means it is no longer pending (or the order is unknown).
pub async fn mark_paid(
    pool: &SqlitePool,
    order_id: &str,
    payment_id: &str,
    signature: Option<&str>,
    now: i64,
) -> RepoResult<Option<Registration>> {
    let row = sqlx::query_as(&format!(
        "UPDATE registration \
         SET payment_status = 'paid', payment_id = ?, payment_signature = ?, payment_date = ? \
         WHERE order_id = ? AND payment_status = 'pending' \
         RETURNING {COLUMNS}"
    ))
    .bind(payment_id)
    .bind(signature)
    .bind(now)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    convert(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use serde_json::json;

    fn sample(email: &str) -> NewRegistration {
        NewRegistration {
            name: "A".into(),
            phone: "9876543210".into(),
            email: email.into(),
            college: "X".into(),
            department: "CS".into(),
            selected_events: vec![1, 3],
            event_details: vec![EventDetail {
                event_id: json!(1),
                sub_option: "Morning".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = DbService::in_memory().await.unwrap();
        let fee = Decimal::new(50000, 2);
        let reg = insert(&db.pool, &sample("a@b.com"), fee, 1_000)
            .await
            .unwrap();

        assert_eq!(reg.num_events, 2);
        assert_eq!(reg.payment_status, PaymentStatus::Pending);
        assert_eq!(reg.registration_fee, fee);
        assert!(reg.payment_date.is_none());

        let found = find_by_id(&db.pool, reg.id).await.unwrap().unwrap();
        assert_eq!(found.selected_events, vec![1, 3]);
        assert_eq!(found.event_details[0].sub_option, "Morning");
        assert!(email_exists(&db.pool, "a@b.com").await.unwrap());
        assert!(!email_exists(&db.pool, "other@b.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_email_violation() {
        let db = DbService::in_memory().await.unwrap();
        let fee = Decimal::new(50000, 2);
        insert(&db.pool, &sample("a@b.com"), fee, 1).await.unwrap();
        let err = insert(&db.pool, &sample("a@b.com"), fee, 2)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_mark_paid_only_once() {
        let db = DbService::in_memory().await.unwrap();
        let reg = insert(&db.pool, &sample("a@b.com"), Decimal::new(50000, 2), 1)
            .await
            .unwrap();
        assert!(attach_order(&db.pool, reg.id, "order_1").await.unwrap());
        assert!(!attach_order(&db.pool, reg.id, "order_racer").await.unwrap());

        let first = mark_paid(&db.pool, "order_1", "pay_1", Some("sig"), 5)
            .await
            .unwrap();
        let paid = first.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_date, Some(5));
        assert_eq!(paid.payment_id.as_deref(), Some("pay_1"));

        let second = mark_paid(&db.pool, "order_1", "pay_2", Some("sig"), 6)
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = find_by_order_id(&db.pool, "order_1").await.unwrap().unwrap();
        assert_eq!(stored.payment_id.as_deref(), Some("pay_1"));

        // paid is final: no further order attachment
        assert!(!attach_order(&db.pool, reg.id, "order_2").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_registration_is_not_paid() {
        let db = DbService::in_memory().await.unwrap();
        let reg = insert(&db.pool, &sample("a@b.com"), Decimal::new(50000, 2), 1)
            .await
            .unwrap();
        attach_order(&db.pool, reg.id, "order_9").await.unwrap();
        sqlx::query("UPDATE registration SET payment_status = 'failed' WHERE id = ?")
            .bind(reg.id)
            .execute(&db.pool)
            .await
            .unwrap();

        assert!(mark_paid(&db.pool, "order_9", "pay_9", None, 2)
            .await
            .unwrap()
            .is_none());
        let stored = find_by_id(&db.pool, reg.id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Failed);
        assert!(stored.payment_date.is_none());
    }

    #[tokio::test]
    async fn test_paid_requires_payment_date() {
        let db = DbService::in_memory().await.unwrap();
        let reg = insert(&db.pool, &sample("a@b.com"), Decimal::new(50000, 2), 1)
            .await
            .unwrap();
        let result = sqlx::query("UPDATE registration SET payment_status = 'paid' WHERE id = ?")
            .bind(reg.id)
            .execute(&db.pool)
            .await;
        assert!(result.is_err());
    }
}
