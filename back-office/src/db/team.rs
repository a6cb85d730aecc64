//! Team invitation queries

use shared::models::TeamInvitation;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Mark pending invitations past their expiry as revoked
pub async fn expire_pending(pool: &PgPool, tenant_id: &str, now: i64) -> Result<u64, BoxError> {
    let result = sqlx::query(
        r#"
        UPDATE team_invitations SET status = 'revoked'
        WHERE tenant_id = $1 AND status = 'pending' AND expires_at <= $2
        "#,
    )
    .bind(tenant_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Insert a pending invitation; `false` if one is already pending for the email
pub async fn insert_pending(pool: &PgPool, inv: &TeamInvitation) -> Result<bool, BoxError> {
    let result = sqlx::query(
        r#"
        INSERT INTO team_invitations (id, tenant_id, location_id, email, role, token, status, created_at, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8)
        ON CONFLICT (tenant_id, (lower(email))) WHERE status = 'pending' DO NOTHING
        "#,
    )
    .bind(inv.id)
    .bind(&inv.tenant_id)
    .bind(inv.location_id)
    .bind(&inv.email)
    .bind(&inv.role)
    .bind(&inv.token)
    .bind(inv.created_at)
    .bind(inv.expires_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn delete(pool: &PgPool, tenant_id: &str, id: i64) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM team_invitations WHERE tenant_id = $1 AND id = $2")
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_pending(pool: &PgPool, tenant_id: &str) -> Result<Vec<TeamInvitation>, BoxError> {
    let rows: Vec<TeamInvitation> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, location_id, email, role, token, status, created_at, expires_at
        FROM team_invitations
        WHERE tenant_id = $1 AND status = 'pending'
        ORDER BY created_at DESC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
