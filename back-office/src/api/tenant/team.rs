//! Team invitation endpoints

use axum::{Extension, Json, extract::State, http::StatusCode};
use shared::error::AppError;
use shared::models::{TeamInvitation, TeamInvitationCreate};

use crate::auth::TenantIdentity;
use crate::state::AppState;
use crate::team;

use super::{ApiResult, verify_location};

/// POST /api/tenant/team/invitations
pub async fn invite(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(input): Json<TeamInvitationCreate>,
) -> Result<(StatusCode, Json<TeamInvitation>), AppError> {
    if let Some(location_id) = input.location_id {
        verify_location(&state, location_id, &identity.tenant_id).await?;
    }
    let invitation = team::invite(
        &state.pool,
        state.mailer.as_ref(),
        &state.invite_base_url,
        &identity.tenant_id,
        input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

/// GET /api/tenant/team/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<TeamInvitation>> {
    let rows = team::list_pending(&state.pool, &identity.tenant_id).await?;
    Ok(Json(rows))
}
