//! Shared types for the back-office service
//!
//! Domain models, the realtime KDS protocol and the unified error system.
//! Row types derive `sqlx::FromRow` behind the `db` feature so the dashboard
//! build can use them without pulling in the database driver.

pub mod error;
pub mod live;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
