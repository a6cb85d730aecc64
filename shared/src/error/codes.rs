//! Unified error codes for the back-office service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant / location errors
//! - 4xxx: KDS errors
//! - 5xxx: Procurement errors
//! - 6xxx: Payroll errors
//! - 7xxx: Reservation errors
//! - 8xxx: Staff errors (team, time-off)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Operation only allowed in development environments
    DevelopmentOnly = 2002,

    // ==================== 3xxx: Tenant ====================
    /// Tenant not found
    TenantNotFound = 3002,
    /// Location not found or not owned by tenant
    LocationNotFound = 3101,

    // ==================== 4xxx: KDS ====================
    /// Ticket not found
    TicketNotFound = 4001,
    /// Ticket is closed, its lines are read-only
    TicketClosed = 4002,
    /// Ticket line not found
    TicketLineNotFound = 4101,
    /// Transition not allowed from the line's current status
    InvalidTransition = 4102,
    /// Line changed concurrently, client must reconcile
    TransitionConflict = 4103,

    // ==================== 5xxx: Procurement ====================
    /// Ingredient SKU not found
    SkuNotFound = 5001,
    /// SKU has an unusable pack size or yield factor
    SkuInvalidPack = 5002,
    /// Purchase order not found
    PurchaseOrderNotFound = 5101,
    /// Nothing to order
    NothingToOrder = 5102,

    // ==================== 6xxx: Payroll ====================
    /// Payslip not found
    PayslipNotFound = 6001,
    /// Payslip status transition not allowed
    PayslipInvalidTransition = 6002,
    /// IBAN failed validation
    InvalidIban = 6101,
    /// No approved payslips to pay
    NoPayableSlips = 6102,
    /// SEPA debtor account not configured
    SepaDebtorMissing = 6103,

    // ==================== 7xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 7001,
    /// Party size out of accepted range
    PartySizeOutOfRange = 7002,
    /// Reservation time in the past or too far ahead
    ReservationTimeInvalid = 7003,
    /// Neither email nor phone provided
    ContactRequired = 7004,

    // ==================== 8xxx: Staff ====================
    /// Invitation for this email already pending
    InvitationExists = 8001,
    /// Invitation email could not be sent
    InvitationSendFailed = 8002,
    /// Time-off request not found
    TimeOffNotFound = 8101,
    /// Time-off request already decided
    TimeOffAlreadyDecided = 8102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Too many realtime connections
    ResourceLimitExceeded = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::DevelopmentOnly => "Operation is only available in development",

            // Tenant
            ErrorCode::TenantNotFound => "Tenant not found",
            ErrorCode::LocationNotFound => "Location not found",

            // KDS
            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::TicketClosed => "Ticket is closed",
            ErrorCode::TicketLineNotFound => "Ticket line not found",
            ErrorCode::InvalidTransition => "Transition not allowed from current status",
            ErrorCode::TransitionConflict => "Ticket line was changed by another device",

            // Procurement
            ErrorCode::SkuNotFound => "Ingredient SKU not found",
            ErrorCode::SkuInvalidPack => "SKU pack size or yield factor is not positive",
            ErrorCode::PurchaseOrderNotFound => "Purchase order not found",
            ErrorCode::NothingToOrder => "No replenishment needed",

            // Payroll
            ErrorCode::PayslipNotFound => "Payslip not found",
            ErrorCode::PayslipInvalidTransition => "Payslip status transition not allowed",
            ErrorCode::InvalidIban => "IBAN is invalid",
            ErrorCode::NoPayableSlips => "No approved payslips for this period",
            ErrorCode::SepaDebtorMissing => "SEPA debtor account is not configured",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::PartySizeOutOfRange => "Party size is out of range",
            ErrorCode::ReservationTimeInvalid => "Reservation time is not bookable",
            ErrorCode::ContactRequired => "Email or phone is required",

            // Staff
            ErrorCode::InvitationExists => "An invitation for this email is already pending",
            ErrorCode::InvitationSendFailed => "Failed to send invitation email",
            ErrorCode::TimeOffNotFound => "Time-off request not found",
            ErrorCode::TimeOffAlreadyDecided => "Time-off request was already decided",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ResourceLimitExceeded => "Resource limit exceeded",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::DevelopmentOnly),

            // Tenant
            3002 => Ok(ErrorCode::TenantNotFound),
            3101 => Ok(ErrorCode::LocationNotFound),

            // KDS
            4001 => Ok(ErrorCode::TicketNotFound),
            4002 => Ok(ErrorCode::TicketClosed),
            4101 => Ok(ErrorCode::TicketLineNotFound),
            4102 => Ok(ErrorCode::InvalidTransition),
            4103 => Ok(ErrorCode::TransitionConflict),

            // Procurement
            5001 => Ok(ErrorCode::SkuNotFound),
            5002 => Ok(ErrorCode::SkuInvalidPack),
            5101 => Ok(ErrorCode::PurchaseOrderNotFound),
            5102 => Ok(ErrorCode::NothingToOrder),

            // Payroll
            6001 => Ok(ErrorCode::PayslipNotFound),
            6002 => Ok(ErrorCode::PayslipInvalidTransition),
            6101 => Ok(ErrorCode::InvalidIban),
            6102 => Ok(ErrorCode::NoPayableSlips),
            6103 => Ok(ErrorCode::SepaDebtorMissing),

            // Reservation
            7001 => Ok(ErrorCode::ReservationNotFound),
            7002 => Ok(ErrorCode::PartySizeOutOfRange),
            7003 => Ok(ErrorCode::ReservationTimeInvalid),
            7004 => Ok(ErrorCode::ContactRequired),

            // Staff
            8001 => Ok(ErrorCode::InvitationExists),
            8002 => Ok(ErrorCode::InvitationSendFailed),
            8101 => Ok(ErrorCode::TimeOffNotFound),
            8102 => Ok(ErrorCode::TimeOffAlreadyDecided),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ResourceLimitExceeded),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4102);
        assert_eq!(ErrorCode::InvalidIban.code(), 6101);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::TicketClosed.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4103), Ok(ErrorCode::TransitionConflict));
        assert_eq!(ErrorCode::try_from(7004), Ok(ErrorCode::ContactRequired));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::TicketLineNotFound).unwrap();
        assert_eq!(json, "4101");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4102").unwrap();
        assert_eq!(code, ErrorCode::InvalidTransition);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::TicketClosed), "4002");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }

    #[test]
    fn test_every_code_round_trips_through_u16() {
        for value in 0u16..10_000 {
            if let Ok(code) = ErrorCode::try_from(value) {
                assert_eq!(code.code(), value);
            }
        }
    }
}
