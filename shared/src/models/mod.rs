//! Data models
//!
//! Shared between the back-office service and the dashboard (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; timestamps are Unix millis.

pub mod finance;
pub mod insight;
pub mod inventory;
pub mod kds;
pub mod location;
pub mod payroll;
pub mod reservation;
pub mod team;
pub mod time_off;

// Re-exports
pub use finance::*;
pub use insight::*;
pub use inventory::*;
pub use kds::*;
pub use location::*;
pub use payroll::*;
pub use reservation::*;
pub use team::*;
pub use time_off::*;
