//! Kitchen Display System models
//!
//! A ticket is an order opened at a location. Each ticket line is tracked
//! through `pending → preparing → ready → served`; `served → ready` is only
//! reachable through the explicit recover action.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Preparation status of a ticket line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "prep_status", rename_all = "lowercase"))]
pub enum PrepStatus {
    Pending,
    Preparing,
    Ready,
    Served,
}

impl PrepStatus {
    /// Position along the forward path, used to assert monotonic progress
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Preparing => 1,
            Self::Ready => 2,
            Self::Served => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
        }
    }
}

impl fmt::Display for PrepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Station a line is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "kds_destination", rename_all = "lowercase"))]
pub enum Destination {
    Kitchen,
    Bar,
    Prep,
}

impl Destination {
    pub const ALL: [Destination; 3] = [Self::Kitchen, Self::Bar, Self::Prep];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bar => "bar",
            Self::Prep => "prep",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket (customer order) header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ticket {
    pub id: i64,
    pub tenant_id: String,
    pub location_id: i64,
    pub table_name: Option<String>,
    pub opened_at: i64,
    /// Set when the ticket is closed; lines become read-only
    pub closed_at: Option<i64>,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// One ordered item tracked through kitchen preparation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TicketLine {
    pub id: i64,
    pub tenant_id: String,
    pub ticket_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    /// Course number, lines of the same course are fired together
    pub course: i32,
    pub destination: Destination,
    pub prep_status: PrepStatus,
    pub note: Option<String>,
    pub created_at: i64,
    pub prep_started_at: Option<i64>,
    pub ready_at: Option<i64>,
    pub served_at: Option<i64>,
    pub updated_at: i64,
}

/// Per-ticket KDS flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "order_flag_kind", rename_all = "lowercase"))]
pub enum OrderFlagKind {
    /// Sort ahead of other tickets
    Rush,
    /// Guest asked to hold the next course
    Hold,
    /// Allergy warning shown on every line
    Allergy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TicketOrderFlag {
    pub ticket_id: i64,
    pub tenant_id: String,
    pub flag: OrderFlagKind,
    pub note: Option<String>,
    pub created_at: i64,
}

/// Set-flag payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketOrderFlagInput {
    pub flag: OrderFlagKind,
    pub note: Option<String>,
}

/// Staff action on a line or group of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdsAction {
    Start,
    Finish,
    Serve,
    Recover,
}

impl KdsAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Finish => "finish",
            Self::Serve => "serve",
            Self::Recover => "recover",
        }
    }
}

impl fmt::Display for KdsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========== Board view models ==========

/// A line as shown on the kitchen screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdsLineView {
    #[serde(flatten)]
    pub line: TicketLine,
    /// Milliseconds since prep start (to now, or to ready time)
    pub elapsed_ms: Option<i64>,
    pub threshold_ms: i64,
    pub overdue: bool,
    /// Overdue and still on the pass; cleared once the line is finished
    pub alert: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdsCourseView {
    pub course: i32,
    /// Least advanced status among the course's lines
    pub status: PrepStatus,
    pub lines: Vec<KdsLineView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdsTicketView {
    pub ticket_id: i64,
    pub table_name: Option<String>,
    pub opened_at: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<TicketOrderFlag>,
    pub courses: Vec<KdsCourseView>,
    pub has_alert: bool,
}

impl KdsTicketView {
    pub fn is_rush(&self) -> bool {
        self.flags.iter().any(|f| f.flag == OrderFlagKind::Rush)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdsBoard {
    pub location_id: i64,
    pub destination: Option<Destination>,
    pub generated_at: i64,
    pub tickets: Vec<KdsTicketView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prep_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PrepStatus::Preparing).unwrap(),
            "\"preparing\""
        );
        let status: PrepStatus = serde_json::from_str("\"served\"").unwrap();
        assert_eq!(status, PrepStatus::Served);
    }

    #[test]
    fn prep_status_rank_is_forward_order() {
        assert!(PrepStatus::Pending.rank() < PrepStatus::Preparing.rank());
        assert!(PrepStatus::Preparing.rank() < PrepStatus::Ready.rank());
        assert!(PrepStatus::Ready.rank() < PrepStatus::Served.rank());
    }

    #[test]
    fn destination_display() {
        assert_eq!(Destination::Bar.to_string(), "bar");
        assert_eq!(Destination::ALL.len(), 3);
    }
}
