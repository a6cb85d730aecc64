//! Location (restaurant site) model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Location {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
    /// IANA timezone name, e.g. `Europe/Madrid`
    pub timezone: String,
    /// Whether the public reservation form accepts bookings
    pub accepts_reservations: bool,
    pub created_at: i64,
}
