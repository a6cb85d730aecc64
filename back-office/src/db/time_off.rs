//! Time-off request queries

use shared::models::{TimeOffRequest, TimeOffStatus};
use sqlx::PgPool;

const COLUMNS: &str = "id, tenant_id, location_id, employee_id, employee_name, start_date, \
    end_date, reason, status, decided_by, decided_at, created_at";

pub async fn insert(pool: &PgPool, req: &TimeOffRequest) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO time_off_requests (
            id, tenant_id, location_id, employee_id, employee_name, start_date, end_date,
            reason, status, decided_by, decided_at, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(req.id)
    .bind(&req.tenant_id)
    .bind(req.location_id)
    .bind(req.employee_id)
    .bind(&req.employee_name)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(&req.reason)
    .bind(req.status)
    .bind(&req.decided_by)
    .bind(req.decided_at)
    .bind(req.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(
    pool: &PgPool,
    tenant_id: &str,
    id: i64,
) -> Result<Option<TimeOffRequest>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM time_off_requests WHERE tenant_id = $1 AND id = $2"
    ))
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_for_location(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
) -> Result<Vec<TimeOffRequest>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM time_off_requests
        WHERE tenant_id = $1 AND location_id = $2
        ORDER BY start_date, employee_name
        "#
    ))
    .bind(tenant_id)
    .bind(location_id)
    .fetch_all(pool)
    .await
}

/// Decide a pending request; `None` if it is no longer pending
pub async fn decide_if_pending(
    pool: &PgPool,
    tenant_id: &str,
    id: i64,
    status: TimeOffStatus,
    decided_by: &str,
    now: i64,
) -> Result<Option<TimeOffRequest>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE time_off_requests SET status = $3, decided_by = $4, decided_at = $5
        WHERE tenant_id = $1 AND id = $2 AND status = 'pending'
        RETURNING {COLUMNS}
        "#
    ))
    .bind(tenant_id)
    .bind(id)
    .bind(status)
    .bind(decided_by)
    .bind(now)
    .fetch_optional(pool)
    .await
}
