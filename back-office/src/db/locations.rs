//! Location queries

use shared::models::Location;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const COLUMNS: &str = "id, tenant_id, name, timezone, accepts_reservations, created_at";

pub async fn list_locations(pool: &PgPool, tenant_id: &str) -> Result<Vec<Location>, BoxError> {
    let rows: Vec<Location> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM locations WHERE tenant_id = $1 ORDER BY name"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Location if it belongs to the tenant
pub async fn find_location(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
) -> Result<Option<Location>, BoxError> {
    let row: Option<Location> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM locations WHERE id = $1 AND tenant_id = $2"
    ))
    .bind(location_id)
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Location lookup for unauthenticated intake; the tenant comes from the row
pub async fn find_public_location(
    pool: &PgPool,
    location_id: i64,
) -> Result<Option<Location>, BoxError> {
    let row: Option<Location> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM locations WHERE id = $1"))
            .bind(location_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}
