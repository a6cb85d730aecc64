//! Payslip queries
//!
//! Status changes only go through [`update_status_if`], guarded by the
//! current status.

use chrono::NaiveDate;
use shared::models::{Payslip, PayslipStatus};
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const COLUMNS: &str = "id, tenant_id, location_id, employee_id, employee_name, period_start, \
    period_end, gross_amount, net_amount, iban, status, approved_at, paid_at, updated_at";

pub async fn find(pool: &PgPool, tenant_id: &str, id: i64) -> Result<Option<Payslip>, BoxError> {
    let row: Option<Payslip> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM payslips WHERE tenant_id = $1 AND id = $2"
    ))
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_period(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    status: Option<PayslipStatus>,
) -> Result<Vec<Payslip>, BoxError> {
    let rows: Vec<Payslip> = sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM payslips
        WHERE tenant_id = $1 AND location_id = $2 AND period_start = $3 AND period_end = $4
            AND ($5::payslip_status IS NULL OR status = $5)
        ORDER BY employee_name
        "#
    ))
    .bind(tenant_id)
    .bind(location_id)
    .bind(period_start)
    .bind(period_end)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Move a payslip from `from` to `to`; `None` if it is no longer in `from`
pub async fn update_status_if(
    pool: &PgPool,
    tenant_id: &str,
    id: i64,
    from: PayslipStatus,
    to: PayslipStatus,
    now: i64,
) -> Result<Option<Payslip>, BoxError> {
    let row: Option<Payslip> = sqlx::query_as(&format!(
        r#"
        UPDATE payslips SET
            status = $4,
            approved_at = CASE WHEN $4 = 'approved'::payslip_status THEN $5 ELSE approved_at END,
            paid_at = CASE WHEN $4 = 'paid'::payslip_status THEN $5 ELSE paid_at END,
            updated_at = $5
        WHERE tenant_id = $1 AND id = $2 AND status = $3
        RETURNING {COLUMNS}
        "#
    ))
    .bind(tenant_id)
    .bind(id)
    .bind(from)
    .bind(to)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
