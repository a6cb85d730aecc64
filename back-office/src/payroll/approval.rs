//! Payslip approval state machine: `draft → approved → paid`
//!
//! The server is the only writer of payslip status. Every change is a
//! guarded update from the expected status; a lost race or an out-of-order
//! request is reported back instead of being forced through.

use shared::error::{AppError, ErrorCode};
use shared::models::{Payslip, PayslipAction, PayslipStatus};
use shared::util::now_millis;
use sqlx::PgPool;

use crate::db::payslips;
use crate::error::ServiceResult;

/// `(from, to)` for an action
pub const fn transition_for(action: PayslipAction) -> (PayslipStatus, PayslipStatus) {
    match action {
        PayslipAction::Approve => (PayslipStatus::Draft, PayslipStatus::Approved),
        PayslipAction::MarkPaid => (PayslipStatus::Approved, PayslipStatus::Paid),
    }
}

fn invalid(id: i64, action: PayslipAction, current: PayslipStatus) -> AppError {
    AppError::with_message(
        ErrorCode::PayslipInvalidTransition,
        format!("Payslip {id} is {current}, cannot apply {action:?}"),
    )
    .with_detail("payslip_id", id)
    .with_detail("current_status", current.to_string())
}

pub async fn apply(
    pool: &PgPool,
    tenant_id: &str,
    payslip_id: i64,
    action: PayslipAction,
) -> ServiceResult<Payslip> {
    let current = payslips::find(pool, tenant_id, payslip_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PayslipNotFound).with_detail("payslip_id", payslip_id))?;

    let (from, to) = transition_for(action);
    if current.status != from {
        return Err(invalid(payslip_id, action, current.status).into());
    }

    match payslips::update_status_if(pool, tenant_id, payslip_id, from, to, now_millis()).await? {
        Some(updated) => {
            tracing::info!(tenant_id = %tenant_id, payslip_id, status = %to, "Payslip status changed");
            Ok(updated)
        }
        None => {
            // Someone else moved it between read and write
            let now = payslips::find(pool, tenant_id, payslip_id)
                .await?
                .map(|p| p.status)
                .unwrap_or(current.status);
            tracing::warn!(tenant_id = %tenant_id, payslip_id, current = %now, "Payslip transition lost a concurrent update");
            Err(invalid(payslip_id, action, now).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        assert_eq!(
            transition_for(PayslipAction::Approve),
            (PayslipStatus::Draft, PayslipStatus::Approved)
        );
        assert_eq!(
            transition_for(PayslipAction::MarkPaid),
            (PayslipStatus::Approved, PayslipStatus::Paid)
        );
    }

    #[test]
    fn invalid_transition_is_conflict() {
        let err = invalid(7, PayslipAction::MarkPaid, PayslipStatus::Draft);
        assert_eq!(err.code, ErrorCode::PayslipInvalidTransition);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        assert_eq!(err.details.unwrap()["current_status"], "draft");
    }
}
