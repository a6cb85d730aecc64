//! Unauthenticated endpoints

use axum::{Json, extract::State, http::StatusCode};
use shared::error::AppError;
use shared::models::{ReservationCreate, ReservationReceipt};

use crate::reservations;
use crate::state::AppState;

/// POST /api/public/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(input): Json<ReservationCreate>,
) -> Result<(StatusCode, Json<ReservationReceipt>), AppError> {
    let reservation = reservations::create_public(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(ReservationReceipt::from(&reservation))))
}
