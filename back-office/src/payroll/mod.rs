//! Payroll: payslip approval and SEPA payment files

pub mod approval;
pub mod sepa;

use chrono::{NaiveDate, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{PayslipStatus, SepaExportQuery};
use sqlx::PgPool;

use self::sepa::{Debtor, SepaBatch, SepaFile, build_pain001};
use crate::config::SepaDebtor;
use crate::db::payslips;
use crate::error::ServiceResult;

/// Build the SEPA file for the approved payslips of a period
pub async fn export_sepa(
    pool: &PgPool,
    debtor: Option<&SepaDebtor>,
    tenant_id: &str,
    query: &SepaExportQuery,
    execution_date: NaiveDate,
) -> ServiceResult<SepaFile> {
    let debtor = debtor.ok_or_else(|| AppError::new(ErrorCode::SepaDebtorMissing))?;

    let slips = payslips::list_period(
        pool,
        tenant_id,
        query.location_id,
        query.period_start,
        query.period_end,
        Some(PayslipStatus::Approved),
    )
    .await?;

    let message_id = uuid::Uuid::new_v4().simple().to_string();
    let file = build_pain001(&SepaBatch {
        message_id: &message_id,
        created_at: Utc::now(),
        execution_date,
        debtor: Debtor {
            name: &debtor.name,
            iban: &debtor.iban,
            bic: debtor.bic.as_deref(),
        },
        payslips: &slips,
    })
    .map_err(AppError::from)?;

    tracing::info!(
        tenant_id = %tenant_id,
        location_id = query.location_id,
        message_id = %message_id,
        transactions = file.transactions,
        control_sum = %file.control_sum,
        "SEPA file generated"
    );
    Ok(file)
}
