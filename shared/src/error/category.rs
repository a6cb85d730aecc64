//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Tenant errors
/// - 4xxx: KDS errors
/// - 5xxx: Procurement errors
/// - 6xxx: Payroll errors
/// - 7xxx: Reservation errors
/// - 8xxx: Staff errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Tenant,
    Kds,
    Procurement,
    Payroll,
    Reservation,
    Staff,
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Tenant,
            4000..5000 => Self::Kds,
            5000..6000 => Self::Procurement,
            6000..7000 => Self::Payroll,
            7000..8000 => Self::Reservation,
            8000..9000 => Self::Staff,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Tenant => "tenant",
            Self::Kds => "kds",
            Self::Procurement => "procurement",
            Self::Payroll => "payroll",
            Self::Reservation => "reservation",
            Self::Staff => "staff",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3101), ErrorCategory::Tenant);
        assert_eq!(ErrorCategory::from_code(4102), ErrorCategory::Kds);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Procurement);
        assert_eq!(ErrorCategory::from_code(6101), ErrorCategory::Payroll);
        assert_eq!(ErrorCategory::from_code(7002), ErrorCategory::Reservation);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::TicketClosed.category(), ErrorCategory::Kds);
        assert_eq!(ErrorCode::SkuNotFound.category(), ErrorCategory::Procurement);
        assert_eq!(ErrorCode::InvalidIban.category(), ErrorCategory::Payroll);
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Kds).unwrap();
        assert_eq!(json, "\"kds\"");

        let category: ErrorCategory = serde_json::from_str("\"payroll\"").unwrap();
        assert_eq!(category, ErrorCategory::Payroll);
    }
}
