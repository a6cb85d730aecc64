//! Ingredient SKU queries

use shared::models::IngredientSku;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn list_for_location(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
) -> Result<Vec<IngredientSku>, BoxError> {
    let rows: Vec<IngredientSku> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, location_id, name, supplier, unit, pack_size_units, pack_price,
            forecast_daily_usage, on_hand, on_order, waste_factor, yield_factor, updated_at
        FROM ingredient_skus
        WHERE tenant_id = $1 AND location_id = $2
        ORDER BY supplier, name
        "#,
    )
    .bind(tenant_id)
    .bind(location_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    sku: &IngredientSku,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO ingredient_skus (
            id, tenant_id, location_id, name, supplier, unit, pack_size_units, pack_price,
            forecast_daily_usage, on_hand, on_order, waste_factor, yield_factor, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(sku.id)
    .bind(&sku.tenant_id)
    .bind(sku.location_id)
    .bind(&sku.name)
    .bind(&sku.supplier)
    .bind(&sku.unit)
    .bind(sku.pack_size_units)
    .bind(sku.pack_price)
    .bind(&sku.forecast_daily_usage)
    .bind(sku.on_hand)
    .bind(sku.on_order)
    .bind(sku.waste_factor)
    .bind(sku.yield_factor)
    .bind(sku.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}
