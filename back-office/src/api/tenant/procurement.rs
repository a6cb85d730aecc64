//! Procurement endpoints: recommendations and draft purchase orders

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{PurchaseOrder, PurchaseOrderDetail, ReplenishmentLine, ReplenishmentQuery};

use crate::auth::TenantIdentity;
use crate::db::purchase_orders;
use crate::error::ServiceError;
use crate::procurement;
use crate::state::AppState;

use super::{ApiResult, verify_location};

/// GET /api/tenant/procurement/recommendations?location_id=&coverage_days=&safety_stock_pct=
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<ReplenishmentQuery>,
) -> ApiResult<Vec<ReplenishmentLine>> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let lines = procurement::recommend(&state.pool, &identity.tenant_id, &query).await?;
    Ok(Json(lines))
}

/// POST /api/tenant/procurement/orders
pub async fn create_draft_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(query): Json<ReplenishmentQuery>,
) -> Result<(StatusCode, Json<Vec<PurchaseOrderDetail>>), AppError> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let drafts =
        procurement::create_draft_orders(&state.pool, &identity.tenant_id, &query).await?;
    Ok((StatusCode::CREATED, Json(drafts)))
}

#[derive(Deserialize)]
pub struct OrdersQuery {
    pub location_id: i64,
}

/// GET /api/tenant/procurement/orders?location_id=
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Vec<PurchaseOrder>> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let orders =
        purchase_orders::list_for_location(&state.pool, &identity.tenant_id, query.location_id)
            .await
            .map_err(ServiceError::from)?;
    Ok(Json(orders))
}

/// GET /api/tenant/procurement/orders/{order_id}
pub async fn purchase_order_detail(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(order_id): Path<i64>,
) -> ApiResult<PurchaseOrderDetail> {
    let detail = purchase_orders::get_detail(&state.pool, &identity.tenant_id, order_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotFound, "Purchase order not found")
                .with_detail("order_id", order_id)
        })?;
    Ok(Json(detail))
}
