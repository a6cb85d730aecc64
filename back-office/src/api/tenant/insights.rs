//! Narrative insights over daily finance

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use shared::models::{InsightNarrative, InsightQuery};

use crate::auth::TenantIdentity;
use crate::insights;
use crate::state::AppState;

use super::{ApiResult, verify_location};

/// GET /api/tenant/insights/narrative?location_id=&from=&to=
pub async fn narrative(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<InsightQuery>,
) -> ApiResult<InsightNarrative> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let narrative = insights::build_narrative(&state.pool, &identity.tenant_id, &query).await?;
    Ok(Json(narrative))
}
