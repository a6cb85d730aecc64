//! Reservation model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "reservation_status", rename_all = "lowercase"))]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: i64,
    pub guest_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub party_size: i32,
    /// Reserved time (Unix millis)
    pub reserved_for: i64,
    pub note: Option<String>,
    pub status: ReservationStatus,
    pub created_at: i64,
}

/// Public intake payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub location_id: i64,
    pub guest_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub party_size: i32,
    pub reserved_for: i64,
    pub note: Option<String>,
}

/// What the guest gets back from the public intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationReceipt {
    pub id: i64,
    pub status: ReservationStatus,
    pub reserved_for: i64,
    pub party_size: i32,
}

impl From<&Reservation> for ReservationReceipt {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id,
            status: r.status,
            reserved_for: r.reserved_for,
            party_size: r.party_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_leaves_out_tenant_and_contact() {
        let reservation = Reservation {
            id: 42,
            tenant_id: "tenant-1".into(),
            location_id: 3,
            guest_name: "Lucía".into(),
            email: Some("lucia@example.es".into()),
            phone: None,
            party_size: 4,
            reserved_for: 1_780_000_000_000,
            note: None,
            status: ReservationStatus::Pending,
            created_at: 0,
        };
        let json = serde_json::to_value(ReservationReceipt::from(&reservation)).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["party_size"], 4);
        assert!(json.get("tenant_id").is_none());
        assert!(json.get("email").is_none());
    }
}
