//! Procurement: replenishment calculator and draft purchase orders

pub mod calculator;
pub mod service;

pub use service::{create_draft_orders, recommend};
