//! Tenant API endpoints, split into sub-modules by domain

mod insights;
mod kds;
mod locations;
mod payroll;
mod procurement;
mod reservations;
mod seed;
mod team;
mod time_off;

use shared::error::{AppError, ErrorCode};

use crate::db::locations as location_queries;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Verify that a location belongs to the given tenant.
pub async fn verify_location(
    state: &AppState,
    location_id: i64,
    tenant_id: &str,
) -> Result<(), AppError> {
    location_queries::find_location(&state.pool, tenant_id, location_id)
        .await
        .map_err(|e| {
            tracing::error!("Location verification error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::location_not_found(location_id))?;
    Ok(())
}

// Re-export all handlers for route registration
pub use locations::list_locations;

pub use kds::{
    clear_flag, kds_board, set_flag, transition_course, transition_line, transition_ticket,
};

pub use procurement::{
    create_draft_orders, list_purchase_orders, purchase_order_detail, recommendations,
};

pub use insights::narrative;

pub use reservations::list_reservations;

pub use payroll::{list_payslips, payslip_action, sepa_export};

pub use team::{invite, list_invitations};

pub use time_off::{create_time_off, decide_time_off, list_time_off};

pub use seed::seed_demo_data;
