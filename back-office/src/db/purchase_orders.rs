//! Purchase order queries

use shared::models::{PurchaseOrder, PurchaseOrderDetail, PurchaseOrderLine};
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Insert draft orders with their lines in one transaction
pub async fn create_drafts(pool: &PgPool, drafts: &[PurchaseOrderDetail]) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    for draft in drafts {
        let order = &draft.order;
        sqlx::query(
            r#"
            INSERT INTO purchase_orders (id, tenant_id, location_id, supplier, status, estimated_total, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id)
        .bind(&order.tenant_id)
        .bind(order.location_id)
        .bind(&order.supplier)
        .bind(order.status)
        .bind(order.estimated_total)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO purchase_order_lines (id, purchase_order_id, sku_id, sku_name, packs, pack_price, line_total)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(line.id)
            .bind(line.purchase_order_id)
            .bind(line.sku_id)
            .bind(&line.sku_name)
            .bind(line.packs)
            .bind(line.pack_price)
            .bind(line.line_total)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn list_for_location(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
) -> Result<Vec<PurchaseOrder>, BoxError> {
    let rows: Vec<PurchaseOrder> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, location_id, supplier, status, estimated_total, created_at
        FROM purchase_orders
        WHERE tenant_id = $1 AND location_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(tenant_id)
    .bind(location_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_detail(
    pool: &PgPool,
    tenant_id: &str,
    order_id: i64,
) -> Result<Option<PurchaseOrderDetail>, BoxError> {
    let order: Option<PurchaseOrder> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, location_id, supplier, status, estimated_total, created_at
        FROM purchase_orders WHERE tenant_id = $1 AND id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let lines: Vec<PurchaseOrderLine> = sqlx::query_as(
        r#"
        SELECT id, purchase_order_id, sku_id, sku_name, packs, pack_price, line_total
        FROM purchase_order_lines WHERE purchase_order_id = $1 ORDER BY sku_name
        "#,
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    Ok(Some(PurchaseOrderDetail { order, lines }))
}
