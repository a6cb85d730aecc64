//! Location list

use axum::{Extension, Json, extract::State};
use shared::models::Location;

use crate::auth::TenantIdentity;
use crate::db::locations;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/tenant/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<Location>> {
    let rows = locations::list_locations(&state.pool, &identity.tenant_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(rows))
}
