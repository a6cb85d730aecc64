//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TenantNotFound
            | Self::LocationNotFound
            | Self::TicketNotFound
            | Self::TicketLineNotFound
            | Self::SkuNotFound
            | Self::PurchaseOrderNotFound
            | Self::PayslipNotFound
            | Self::ReservationNotFound
            | Self::TimeOffNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::TicketClosed
            | Self::InvalidTransition
            | Self::TransitionConflict
            | Self::PayslipInvalidTransition
            | Self::InvitationExists
            | Self::TimeOffAlreadyDecided => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::DevelopmentOnly => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyRequests | Self::ResourceLimitExceeded => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError | Self::InvitationSendFailed => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::SepaDebtorMissing
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
