//! Replenishment recommendations and draft purchase orders

use std::collections::BTreeMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    IngredientSku, PurchaseOrder, PurchaseOrderDetail, PurchaseOrderLine, PurchaseOrderStatus,
    ReplenishmentLine, ReplenishmentQuery,
};
use shared::util::{SnowflakeBatch, now_millis};
use sqlx::PgPool;

use super::calculator::{ReplenishmentInput, calculate};
use crate::db::{ingredients, purchase_orders};
use crate::error::ServiceResult;

/// Run the calculator over every usable SKU, sorted by supplier then name.
///
/// SKUs with a non-positive pack size or yield factor cannot be ordered
/// sensibly and are skipped with a warning.
pub fn recommend_for_skus(
    skus: &[IngredientSku],
    coverage_days: u32,
    safety_stock_pct: f64,
) -> Vec<ReplenishmentLine> {
    let mut lines: Vec<ReplenishmentLine> = skus
        .iter()
        .filter(|sku| {
            let usable = sku.pack_size_units > 0.0 && sku.yield_factor > 0.0;
            if !usable {
                tracing::warn!(
                    sku_id = sku.id,
                    sku = %sku.name,
                    pack_size_units = sku.pack_size_units,
                    yield_factor = sku.yield_factor,
                    "Skipping SKU with invalid pack size or yield"
                );
            }
            usable
        })
        .map(|sku| {
            let r = calculate(&ReplenishmentInput {
                forecast_daily_usage: &sku.forecast_daily_usage,
                coverage_days: coverage_days as usize,
                waste_factor: sku.waste_factor,
                yield_factor: sku.yield_factor,
                safety_stock_pct,
                on_hand: sku.on_hand,
                on_order: sku.on_order,
                pack_size_units: sku.pack_size_units,
            });
            ReplenishmentLine {
                sku_id: sku.id,
                sku_name: sku.name.clone(),
                supplier: sku.supplier.clone(),
                unit: sku.unit.clone(),
                forecast_usage: r.forecast_usage,
                adjusted_forecast: r.adjusted_forecast,
                safety_stock: r.safety_stock,
                net_needed: r.net_needed,
                recommended_packs: r.recommended_packs,
                pack_price: sku.pack_price,
                estimated_cost: r.recommended_packs as f64 * sku.pack_price,
            }
        })
        .collect();

    lines.sort_by(|a, b| {
        a.supplier
            .cmp(&b.supplier)
            .then_with(|| a.sku_name.cmp(&b.sku_name))
    });
    lines
}

/// One draft order per supplier from the non-zero recommendations
pub fn build_drafts(
    tenant_id: &str,
    location_id: i64,
    lines: &[ReplenishmentLine],
    now: i64,
) -> Vec<PurchaseOrderDetail> {
    let mut by_supplier: BTreeMap<&str, Vec<&ReplenishmentLine>> = BTreeMap::new();
    for line in lines.iter().filter(|l| l.recommended_packs > 0) {
        by_supplier.entry(line.supplier.as_str()).or_default().push(line);
    }

    let mut ids = SnowflakeBatch::new();
    by_supplier
        .into_iter()
        .map(|(supplier, recs)| {
            let order_id = ids.next_id();
            let lines: Vec<PurchaseOrderLine> = recs
                .into_iter()
                .map(|r| PurchaseOrderLine {
                    id: ids.next_id(),
                    purchase_order_id: order_id,
                    sku_id: r.sku_id,
                    sku_name: r.sku_name.clone(),
                    packs: r.recommended_packs,
                    pack_price: r.pack_price,
                    line_total: r.estimated_cost,
                })
                .collect();
            PurchaseOrderDetail {
                order: PurchaseOrder {
                    id: order_id,
                    tenant_id: tenant_id.to_string(),
                    location_id,
                    supplier: supplier.to_string(),
                    status: PurchaseOrderStatus::Draft,
                    estimated_total: lines.iter().map(|l| l.line_total).sum(),
                    created_at: now,
                },
                lines,
            }
        })
        .collect()
}

pub async fn recommend(
    pool: &PgPool,
    tenant_id: &str,
    query: &ReplenishmentQuery,
) -> ServiceResult<Vec<ReplenishmentLine>> {
    validate_query(query)?;
    let skus = ingredients::list_for_location(pool, tenant_id, query.location_id).await?;
    Ok(recommend_for_skus(
        &skus,
        query.coverage_days,
        query.safety_stock_pct,
    ))
}

/// Recompute recommendations and persist draft orders
pub async fn create_draft_orders(
    pool: &PgPool,
    tenant_id: &str,
    query: &ReplenishmentQuery,
) -> ServiceResult<Vec<PurchaseOrderDetail>> {
    let lines = recommend(pool, tenant_id, query).await?;
    let drafts = build_drafts(tenant_id, query.location_id, &lines, now_millis());
    if drafts.is_empty() {
        return Err(AppError::new(ErrorCode::NothingToOrder).into());
    }
    purchase_orders::create_drafts(pool, &drafts).await?;
    tracing::info!(
        tenant_id = %tenant_id,
        location_id = query.location_id,
        orders = drafts.len(),
        "Draft purchase orders created"
    );
    Ok(drafts)
}

fn validate_query(query: &ReplenishmentQuery) -> Result<(), AppError> {
    if query.coverage_days == 0 || query.coverage_days > 90 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "coverage_days must be between 1 and 90",
        )
        .with_detail("field", "coverage_days"));
    }
    if !(0.0..=1.0).contains(&query.safety_stock_pct) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "safety_stock_pct must be between 0 and 1",
        )
        .with_detail("field", "safety_stock_pct"));
    }
    Ok(())
}
