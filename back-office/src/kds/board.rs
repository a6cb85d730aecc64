//! Kitchen board view: open tickets grouped by ticket then course

use std::collections::{BTreeMap, HashMap};

use shared::models::{
    Destination, KdsBoard, KdsCourseView, KdsLineView, KdsTicketView, PrepStatus, Ticket,
    TicketLine, TicketOrderFlag,
};

use super::overdue::OverduePolicy;

/// Inputs for one board render
pub struct BoardInput<'a> {
    pub location_id: i64,
    pub destination: Option<Destination>,
    pub tickets: &'a [Ticket],
    pub lines: Vec<TicketLine>,
    pub flags: &'a [TicketOrderFlag],
    pub policy: &'a OverduePolicy,
    pub now: i64,
}

/// Group lines into the board
///
/// Closed tickets and tickets whose visible lines are all served are left off.
/// Ordering: rush tickets first, then by oldest line, then by ticket id.
pub fn build_board(input: BoardInput<'_>) -> KdsBoard {
    let mut by_ticket: HashMap<i64, Vec<TicketLine>> = HashMap::new();
    for line in input.lines {
        if input.destination.is_some_and(|d| d != line.destination) {
            continue;
        }
        by_ticket.entry(line.ticket_id).or_default().push(line);
    }

    let mut views: Vec<(i64, KdsTicketView)> = Vec::new();
    for ticket in input.tickets.iter().filter(|t| !t.is_closed()) {
        let Some(lines) = by_ticket.remove(&ticket.id) else {
            continue;
        };
        if lines.iter().all(|l| l.prep_status == PrepStatus::Served) {
            continue;
        }
        let oldest = lines.iter().map(|l| l.created_at).min().unwrap_or(ticket.opened_at);
        let flags = input
            .flags
            .iter()
            .filter(|f| f.ticket_id == ticket.id)
            .cloned()
            .collect();
        let courses = group_courses(lines, input.policy, input.now);
        let has_alert = courses
            .iter()
            .any(|c| c.lines.iter().any(|l| l.alert));
        views.push((
            oldest,
            KdsTicketView {
                ticket_id: ticket.id,
                table_name: ticket.table_name.clone(),
                opened_at: ticket.opened_at,
                flags,
                courses,
                has_alert,
            },
        ));
    }

    views.sort_by(|(a_oldest, a), (b_oldest, b)| {
        b.is_rush()
            .cmp(&a.is_rush())
            .then(a_oldest.cmp(b_oldest))
            .then(a.ticket_id.cmp(&b.ticket_id))
    });

    KdsBoard {
        location_id: input.location_id,
        destination: input.destination,
        generated_at: input.now,
        tickets: views.into_iter().map(|(_, v)| v).collect(),
    }
}

fn group_courses(lines: Vec<TicketLine>, policy: &OverduePolicy, now: i64) -> Vec<KdsCourseView> {
    let mut courses: BTreeMap<i32, Vec<TicketLine>> = BTreeMap::new();
    for line in lines {
        courses.entry(line.course).or_default().push(line);
    }

    courses
        .into_iter()
        .map(|(course, mut lines)| {
            lines.sort_by_key(|l| (l.created_at, l.id));
            let status = lines
                .iter()
                .map(|l| l.prep_status)
                .min_by_key(|s| s.rank())
                .unwrap_or(PrepStatus::Pending);
            let lines = lines
                .into_iter()
                .map(|line| {
                    let state = policy.evaluate(&line, now);
                    KdsLineView {
                        line,
                        elapsed_ms: state.elapsed_ms,
                        threshold_ms: state.threshold_ms,
                        overdue: state.overdue,
                        alert: state.alert,
                    }
                })
                .collect();
            KdsCourseView {
                course,
                status,
                lines,
            }
        })
        .collect()
}
