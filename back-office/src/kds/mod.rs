//! Kitchen Display System
//!
//! - [`state_machine`]: line transitions and their column updates
//! - [`overdue`]: elapsed-time thresholds per product / station
//! - [`board`]: ticket → course grouping for the screen
//! - [`repository`]: persistence seam (Postgres) and [`memory`] (in-process)
//! - [`service`]: guarded transitions, flags, realtime publishing
//! - [`feed`]: Postgres change notifications relayed to the screens

pub mod board;
pub mod feed;
pub mod memory;
pub mod overdue;
pub mod repository;
pub mod service;
pub mod state_machine;

pub use repository::{KdsRepository, PgKdsRepository, RepoError, RepoResult};
pub use service::{KdsService, TransitionError};
