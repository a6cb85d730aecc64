//! Staff time-off requests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "time_off_status", rename_all = "lowercase"))]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeOffRequest {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: TimeOffStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffCreate {
    pub location_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Manager decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOffDecision {
    Approve,
    Reject,
}

impl TimeOffDecision {
    pub const fn target_status(self) -> TimeOffStatus {
        match self {
            Self::Approve => TimeOffStatus::Approved,
            Self::Reject => TimeOffStatus::Rejected,
        }
    }
}
