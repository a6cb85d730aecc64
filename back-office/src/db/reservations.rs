//! Reservation queries

use shared::models::Reservation;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn insert(pool: &PgPool, r: &Reservation) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO reservations (
            id, tenant_id, location_id, guest_name, email, phone, party_size,
            reserved_for, note, status, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(r.id)
    .bind(&r.tenant_id)
    .bind(r.location_id)
    .bind(&r.guest_name)
    .bind(&r.email)
    .bind(&r.phone)
    .bind(r.party_size)
    .bind(r.reserved_for)
    .bind(&r.note)
    .bind(r.status)
    .bind(r.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Reservations of a location within `[from, to)` (Unix millis)
pub async fn list_range(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
    from: i64,
    to: i64,
) -> Result<Vec<Reservation>, BoxError> {
    let rows: Vec<Reservation> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, location_id, guest_name, email, phone, party_size,
            reserved_for, note, status, created_at
        FROM reservations
        WHERE tenant_id = $1 AND location_id = $2 AND reserved_for >= $3 AND reserved_for < $4
        ORDER BY reserved_for
        "#,
    )
    .bind(tenant_id)
    .bind(location_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
