//! Development-only demo data

use axum::{Extension, Json, extract::State};

use crate::auth::TenantIdentity;
use crate::seed::{self, SeedRequest, SeedSummary};
use crate::state::AppState;

use super::ApiResult;

/// POST /api/tenant/dev/seed
pub async fn seed_demo_data(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(request): Json<SeedRequest>,
) -> ApiResult<SeedSummary> {
    let summary = seed::seed_location(
        &state.pool,
        state.is_development(),
        &identity.tenant_id,
        &request,
    )
    .await?;
    Ok(Json(summary))
}
