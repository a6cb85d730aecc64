//! KDS endpoints: board, line and group transitions, ticket flags

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{
    Destination, KdsAction, KdsBoard, OrderFlagKind, TicketLine, TicketOrderFlag,
    TicketOrderFlagInput,
};

use crate::auth::TenantIdentity;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

use super::{ApiResult, verify_location};

#[derive(Deserialize)]
pub struct BoardQuery {
    pub location_id: i64,
    pub destination: Option<Destination>,
}

/// GET /api/tenant/kds/board?location_id=&destination=
pub async fn kds_board(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<KdsBoard> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let board = state
        .kds
        .board(&identity.tenant_id, query.location_id, query.destination)
        .await?;
    Ok(Json(board))
}

/// POST /api/tenant/kds/lines/{line_id}/{action}
pub async fn transition_line(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path((line_id, action)): Path<(i64, KdsAction)>,
) -> ApiResult<TicketLine> {
    let line = state
        .kds
        .transition_line(&identity.tenant_id, line_id, action)
        .await?;
    Ok(Json(line))
}

/// POST /api/tenant/kds/tickets/{ticket_id}/{action}
pub async fn transition_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path((ticket_id, action)): Path<(i64, KdsAction)>,
) -> ApiResult<Vec<TicketLine>> {
    let lines = state
        .kds
        .transition_group(&identity.tenant_id, ticket_id, None, action)
        .await?;
    Ok(Json(lines))
}

/// POST /api/tenant/kds/tickets/{ticket_id}/courses/{course}/{action}
pub async fn transition_course(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path((ticket_id, course, action)): Path<(i64, i32, KdsAction)>,
) -> ApiResult<Vec<TicketLine>> {
    let lines = state
        .kds
        .transition_group(&identity.tenant_id, ticket_id, Some(course), action)
        .await?;
    Ok(Json(lines))
}

/// POST /api/tenant/kds/tickets/{ticket_id}/flags
pub async fn set_flag(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(ticket_id): Path<i64>,
    Json(input): Json<TicketOrderFlagInput>,
) -> ApiResult<Vec<TicketOrderFlag>> {
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;
    let flags = state
        .kds
        .set_flag(&identity.tenant_id, ticket_id, input)
        .await?;
    Ok(Json(flags))
}

/// DELETE /api/tenant/kds/tickets/{ticket_id}/flags/{flag}
pub async fn clear_flag(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path((ticket_id, flag)): Path<(i64, OrderFlagKind)>,
) -> ApiResult<Vec<TicketOrderFlag>> {
    let flags = state
        .kds
        .clear_flag(&identity.tenant_id, ticket_id, flag)
        .await?;
    Ok(Json(flags))
}
