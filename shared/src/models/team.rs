//! Team invitation model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "invitation_status", rename_all = "lowercase"))]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TeamInvitation {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: Option<i64>,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub status: InvitationStatus,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInvitationCreate {
    pub email: String,
    pub role: String,
    pub location_id: Option<i64>,
}
