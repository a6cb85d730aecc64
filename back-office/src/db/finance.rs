//! `pos_daily_finance` queries

use chrono::NaiveDate;
use shared::models::DailyFinance;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn list_range(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyFinance>, BoxError> {
    let rows: Vec<DailyFinance> = sqlx::query_as(
        r#"
        SELECT tenant_id, location_id, business_date, sales, budget, labour_cost, waste_total
        FROM pos_daily_finance
        WHERE tenant_id = $1 AND location_id = $2 AND business_date BETWEEN $3 AND $4
        ORDER BY business_date
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

pub async fn upsert(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    day: &DailyFinance,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO pos_daily_finance (tenant_id, location_id, business_date, sales, budget, labour_cost, waste_total)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (tenant_id, location_id, business_date) DO UPDATE SET
            sales = EXCLUDED.sales,
            budget = EXCLUDED.budget,
            labour_cost = EXCLUDED.labour_cost,
            waste_total = EXCLUDED.waste_total
        "#,
    )
    .bind(&day.tenant_id)
    .bind(day.location_id)
    .bind(day.business_date)
    .bind(day.sales)
    .bind(day.budget)
    .bind(day.labour_cost)
    .bind(day.waste_total)
    .execute(conn)
    .await?;
    Ok(())
}
