//! Tenant authentication and request throttling

pub mod rate_limit;
pub mod tenant_auth;

pub use rate_limit::RateLimiter;
pub use tenant_auth::TenantIdentity;
