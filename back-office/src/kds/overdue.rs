//! Overdue detection for lines on the pass
//!
//! Elapsed time runs from prep start to now, or to the ready time once the
//! line is finished. A line is overdue when elapsed is strictly greater than
//! its threshold: the product override if one exists, otherwise the station
//! default. Only lines still in preparation raise the visual alert.

use std::collections::HashMap;

use shared::models::{PrepStatus, TicketLine};
use shared::util::minutes_to_millis;

use crate::config::KdsThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueState {
    pub elapsed_ms: Option<i64>,
    pub threshold_ms: i64,
    pub overdue: bool,
    pub alert: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverduePolicy {
    defaults: KdsThresholds,
    /// product_id → minutes
    overrides: HashMap<i64, i64>,
}

impl OverduePolicy {
    pub fn new(defaults: KdsThresholds, overrides: HashMap<i64, i64>) -> Self {
        Self { defaults, overrides }
    }

    pub fn threshold_ms(&self, line: &TicketLine) -> i64 {
        let minutes = self
            .overrides
            .get(&line.product_id)
            .copied()
            .unwrap_or_else(|| self.defaults.minutes_for(line.destination));
        minutes_to_millis(minutes)
    }

    pub fn evaluate(&self, line: &TicketLine, now: i64) -> OverdueState {
        let threshold_ms = self.threshold_ms(line);
        let elapsed_ms = match (line.prep_status, line.prep_started_at) {
            (PrepStatus::Preparing, Some(started)) => Some(now - started),
            (PrepStatus::Ready, Some(started)) => Some(line.ready_at.unwrap_or(now) - started),
            _ => None,
        };
        let overdue = elapsed_ms.is_some_and(|e| e > threshold_ms);
        OverdueState {
            elapsed_ms,
            threshold_ms,
            overdue,
            alert: overdue && line.prep_status == PrepStatus::Preparing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Destination;

    const MIN: i64 = 60_000;

    fn line(destination: Destination, status: PrepStatus, started: Option<i64>) -> TicketLine {
        TicketLine {
            id: 1,
            tenant_id: "t1".into(),
            ticket_id: 1,
            product_id: 42,
            product_name: "Croquetas".into(),
            quantity: 2,
            course: 1,
            destination,
            prep_status: status,
            note: None,
            created_at: 0,
            prep_started_at: started,
            ready_at: None,
            served_at: None,
            updated_at: 0,
        }
    }

    #[test]
    fn kitchen_overdue_is_strictly_greater_than_eight_minutes() {
        let policy = OverduePolicy::default();
        let l = line(Destination::Kitchen, PrepStatus::Preparing, Some(0));

        let at_limit = policy.evaluate(&l, 8 * MIN);
        assert!(!at_limit.overdue);
        assert_eq!(at_limit.elapsed_ms, Some(8 * MIN));

        let past = policy.evaluate(&l, 8 * MIN + 1);
        assert!(past.overdue);
        assert!(past.alert);
    }

    #[test]
    fn station_defaults() {
        let policy = OverduePolicy::default();
        let bar = line(Destination::Bar, PrepStatus::Preparing, Some(0));
        let prep = line(Destination::Prep, PrepStatus::Preparing, Some(0));
        assert!(policy.evaluate(&bar, 3 * MIN + 1).overdue);
        assert!(!policy.evaluate(&prep, 5 * MIN).overdue);
        assert!(policy.evaluate(&prep, 5 * MIN + 1).overdue);
    }

    #[test]
    fn product_override_wins() {
        let policy = OverduePolicy::new(KdsThresholds::default(), HashMap::from([(42, 15)]));
        let l = line(Destination::Kitchen, PrepStatus::Preparing, Some(0));
        assert!(!policy.evaluate(&l, 10 * MIN).overdue);
        assert!(policy.evaluate(&l, 15 * MIN + 1).overdue);
    }

    #[test]
    fn ready_line_measures_until_ready_time_without_alert() {
        let policy = OverduePolicy::default();
        let mut l = line(Destination::Kitchen, PrepStatus::Ready, Some(0));
        l.ready_at = Some(9 * MIN);
        let state = policy.evaluate(&l, 60 * MIN);
        assert_eq!(state.elapsed_ms, Some(9 * MIN));
        assert!(state.overdue);
        assert!(!state.alert);
    }

    #[test]
    fn pending_and_served_are_never_overdue() {
        let policy = OverduePolicy::default();
        let pending = line(Destination::Kitchen, PrepStatus::Pending, None);
        let served = line(Destination::Kitchen, PrepStatus::Served, Some(0));
        assert!(!policy.evaluate(&pending, 100 * MIN).overdue);
        assert!(!policy.evaluate(&served, 100 * MIN).overdue);
    }
}
