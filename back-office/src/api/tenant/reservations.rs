//! Reservation list for staff

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::Reservation;

use crate::auth::TenantIdentity;
use crate::reservations;
use crate::state::AppState;

use super::{ApiResult, verify_location};

#[derive(Deserialize)]
pub struct ReservationsQuery {
    pub location_id: i64,
    pub date: NaiveDate,
}

/// GET /api/tenant/reservations?location_id=&date=YYYY-MM-DD
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<ReservationsQuery>,
) -> ApiResult<Vec<Reservation>> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let rows = reservations::list_for_day(
        &state.pool,
        &identity.tenant_id,
        query.location_id,
        query.date,
    )
    .await?;
    Ok(Json(rows))
}
