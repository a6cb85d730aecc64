//! Ticket line transitions
//!
//! ```text
//! pending --start--> preparing --finish--> ready --serve--> served
//!                                            ^                 |
//!                                            +----recover------+
//! ```

use shared::models::{KdsAction, PrepStatus, TicketLine};

/// Change applied to a nullable timestamp column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Keep,
    Set(i64),
    Clear,
}

impl Stamp {
    /// `(overwrite, value)` pair bound into the UPDATE statement
    pub fn bind_parts(self) -> (bool, Option<i64>) {
        match self {
            Stamp::Keep => (false, None),
            Stamp::Set(ts) => (true, Some(ts)),
            Stamp::Clear => (true, None),
        }
    }

    pub fn apply(self, current: Option<i64>) -> Option<i64> {
        match self {
            Stamp::Keep => current,
            Stamp::Set(ts) => Some(ts),
            Stamp::Clear => None,
        }
    }
}

/// Column changes for one action, guarded by `expected`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineUpdate {
    pub action: KdsAction,
    /// Status the row must still have for the write to land
    pub expected: PrepStatus,
    pub target: PrepStatus,
    pub prep_started_at: Stamp,
    pub ready_at: Stamp,
    pub served_at: Stamp,
    pub updated_at: i64,
}

impl LineUpdate {
    /// Copy of `line` with the update applied
    pub fn apply_to(&self, line: &TicketLine) -> TicketLine {
        TicketLine {
            prep_status: self.target,
            prep_started_at: self.prep_started_at.apply(line.prep_started_at),
            ready_at: self.ready_at.apply(line.ready_at),
            served_at: self.served_at.apply(line.served_at),
            updated_at: self.updated_at,
            ..line.clone()
        }
    }
}

/// Status a line must be in for `action` to apply
pub const fn source_status(action: KdsAction) -> PrepStatus {
    match action {
        KdsAction::Start => PrepStatus::Pending,
        KdsAction::Finish => PrepStatus::Preparing,
        KdsAction::Serve => PrepStatus::Ready,
        KdsAction::Recover => PrepStatus::Served,
    }
}

pub const fn target_status(action: KdsAction) -> PrepStatus {
    match action {
        KdsAction::Start => PrepStatus::Preparing,
        KdsAction::Finish => PrepStatus::Ready,
        KdsAction::Serve => PrepStatus::Served,
        KdsAction::Recover => PrepStatus::Ready,
    }
}

/// Build the column update for `action` at time `now`
pub fn plan(action: KdsAction, now: i64) -> LineUpdate {
    let (prep_started_at, ready_at, served_at) = match action {
        KdsAction::Start => (Stamp::Set(now), Stamp::Keep, Stamp::Keep),
        KdsAction::Finish => (Stamp::Keep, Stamp::Set(now), Stamp::Keep),
        KdsAction::Serve => (Stamp::Keep, Stamp::Keep, Stamp::Set(now)),
        KdsAction::Recover => (Stamp::Keep, Stamp::Keep, Stamp::Clear),
    };
    LineUpdate {
        action,
        expected: source_status(action),
        target: target_status(action),
        prep_started_at,
        ready_at,
        served_at,
        updated_at: now,
    }
}

/// Whether `action` may run on a line currently in `current`
pub fn can_apply(action: KdsAction, current: PrepStatus) -> bool {
    source_status(action) == current
}
