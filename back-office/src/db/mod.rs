//! Database access layer
//!
//! Typed query functions per entity over the shared `PgPool`.
//! Every query filters by `tenant_id`.

pub mod finance;
pub mod ingredients;
pub mod locations;
pub mod payslips;
pub mod purchase_orders;
pub mod reservations;
pub mod team;
pub mod tickets;
pub mod time_off;
