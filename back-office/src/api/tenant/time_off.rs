//! Staff time-off endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{TimeOffCreate, TimeOffDecision, TimeOffRequest};

use crate::auth::TenantIdentity;
use crate::state::AppState;

use super::{ApiResult, verify_location};

#[derive(Deserialize)]
pub struct TimeOffQuery {
    pub location_id: i64,
}

/// GET /api/tenant/time-off?location_id=
pub async fn list_time_off(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<TimeOffQuery>,
) -> ApiResult<Vec<TimeOffRequest>> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let rows = state
        .time_off
        .list(&identity.tenant_id, query.location_id)
        .await?;
    Ok(Json(rows))
}

/// POST /api/tenant/time-off
pub async fn create_time_off(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(input): Json<TimeOffCreate>,
) -> Result<(StatusCode, Json<TimeOffRequest>), AppError> {
    verify_location(&state, input.location_id, &identity.tenant_id).await?;
    let request = state.time_off.create(&identity.tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// POST /api/tenant/time-off/{request_id}/{decision}
pub async fn decide_time_off(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path((request_id, decision)): Path<(i64, TimeOffDecision)>,
) -> ApiResult<TimeOffRequest> {
    let request = state
        .time_off
        .decide(&identity.tenant_id, request_id, decision, &identity.email)
        .await?;
    Ok(Json(request))
}
