//! Payroll endpoints: payslip list, approval transitions, SEPA export

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{Payslip, PayslipAction, PayslipStatus, SepaExportQuery};

use crate::auth::TenantIdentity;
use crate::db::payslips;
use crate::error::ServiceError;
use crate::payroll;
use crate::state::AppState;

use super::{ApiResult, verify_location};

#[derive(Deserialize)]
pub struct PayslipsQuery {
    pub location_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: Option<PayslipStatus>,
}

/// GET /api/tenant/payroll/payslips?location_id=&period_start=&period_end=&status=
pub async fn list_payslips(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<PayslipsQuery>,
) -> ApiResult<Vec<Payslip>> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let rows = payslips::list_period(
        &state.pool,
        &identity.tenant_id,
        query.location_id,
        query.period_start,
        query.period_end,
        query.status,
    )
    .await
    .map_err(ServiceError::from)?;
    Ok(Json(rows))
}

/// POST /api/tenant/payroll/payslips/{payslip_id}/{action}
pub async fn payslip_action(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path((payslip_id, action)): Path<(i64, PayslipAction)>,
) -> ApiResult<Payslip> {
    let payslip =
        payroll::approval::apply(&state.pool, &identity.tenant_id, payslip_id, action).await?;
    Ok(Json(payslip))
}

#[derive(Deserialize)]
pub struct SepaQuery {
    pub location_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Requested execution date, defaults to today
    pub execution_date: Option<NaiveDate>,
}

/// GET /api/tenant/payroll/sepa?location_id=&period_start=&period_end=&execution_date=
///
/// Returns the pain.001 XML as an attachment.
pub async fn sepa_export(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<SepaQuery>,
) -> Result<Response, AppError> {
    verify_location(&state, query.location_id, &identity.tenant_id).await?;
    let execution_date = query
        .execution_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let period = SepaExportQuery {
        location_id: query.location_id,
        period_start: query.period_start,
        period_end: query.period_end,
    };

    let file = payroll::export_sepa(
        &state.pool,
        state.sepa_debtor.as_deref(),
        &identity.tenant_id,
        &period,
        execution_date,
    )
    .await?;

    let filename = format!(
        "attachment; filename=\"sepa-{}-{}.xml\"",
        period.location_id, period.period_end
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        file.xml,
    )
        .into_response())
}
