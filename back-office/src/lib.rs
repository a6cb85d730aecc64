//! back-office: multi-tenant restaurant back-office service
//!
//! - KDS line tracking with realtime kitchen screens
//! - Procurement replenishment and draft purchase orders
//! - Narrative insights over daily finance
//! - Payroll approval and SEPA payment files
//! - Public reservation intake, team invitations, staff time-off

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod kds;
pub mod live;
pub mod logger;
pub mod payroll;
pub mod procurement;
pub mod reservations;
pub mod seed;
pub mod state;
pub mod team;
pub mod time_off;
pub mod validation;

pub use config::Config;
pub use state::AppState;
