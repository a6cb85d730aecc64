//! Payroll models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payslip status: `draft → approved → paid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "payslip_status", rename_all = "lowercase"))]
pub enum PayslipStatus {
    Draft,
    Approved,
    Paid,
}

impl fmt::Display for PayslipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Paid => "paid",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payslip {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_amount: Decimal,
    pub net_amount: Decimal,
    pub iban: String,
    pub status: PayslipStatus,
    pub approved_at: Option<i64>,
    pub paid_at: Option<i64>,
    pub updated_at: i64,
}

/// Requested payslip transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipAction {
    Approve,
    MarkPaid,
}

/// SEPA file request for one pay period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SepaExportQuery {
    pub location_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}
