//! In-memory [`KdsRepository`]
//!
//! Same guard semantics as the Postgres implementation; backs the service
//! tests and local demos without a database.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{OrderFlagKind, Ticket, TicketLine, TicketOrderFlag};

use super::repository::{KdsRepository, RepoResult};
use super::state_machine::LineUpdate;

#[derive(Default)]
struct Store {
    tickets: BTreeMap<i64, Ticket>,
    lines: BTreeMap<i64, TicketLine>,
    flags: Vec<TicketOrderFlag>,
    /// (tenant_id, product_id) → minutes
    thresholds: HashMap<(String, i64), i64>,
}

impl Store {
    fn ticket_open(&self, tenant_id: &str, ticket_id: i64) -> bool {
        self.tickets
            .get(&ticket_id)
            .is_some_and(|t| t.tenant_id == tenant_id && !t.is_closed())
    }
}

#[derive(Default)]
pub struct InMemoryKdsRepository {
    store: Mutex<Store>,
}

impl InMemoryKdsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ticket(&self, ticket: Ticket) {
        self.store.lock().tickets.insert(ticket.id, ticket);
    }

    pub fn insert_line(&self, line: TicketLine) {
        self.store.lock().lines.insert(line.id, line);
    }

    pub fn close_ticket(&self, ticket_id: i64, closed_at: i64) {
        if let Some(t) = self.store.lock().tickets.get_mut(&ticket_id) {
            t.closed_at = Some(closed_at);
        }
    }

    pub fn set_threshold(&self, tenant_id: &str, product_id: i64, minutes: i64) {
        self.store
            .lock()
            .thresholds
            .insert((tenant_id.to_string(), product_id), minutes);
    }
}

#[async_trait]
impl KdsRepository for InMemoryKdsRepository {
    async fn find_ticket(&self, tenant_id: &str, ticket_id: i64) -> RepoResult<Option<Ticket>> {
        let store = self.store.lock();
        Ok(store
            .tickets
            .get(&ticket_id)
            .filter(|t| t.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_line(&self, tenant_id: &str, line_id: i64) -> RepoResult<Option<TicketLine>> {
        let store = self.store.lock();
        Ok(store
            .lines
            .get(&line_id)
            .filter(|l| l.tenant_id == tenant_id)
            .cloned())
    }

    async fn compare_and_set(
        &self,
        tenant_id: &str,
        line_id: i64,
        update: &LineUpdate,
    ) -> RepoResult<Option<TicketLine>> {
        let mut store = self.store.lock();
        let Some(current) = store.lines.get(&line_id).cloned() else {
            return Ok(None);
        };
        if current.tenant_id != tenant_id
            || current.prep_status != update.expected
            || !store.ticket_open(tenant_id, current.ticket_id)
        {
            return Ok(None);
        }
        let updated = update.apply_to(&current);
        store.lines.insert(line_id, updated.clone());
        Ok(Some(updated))
    }

    async fn transition_group(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        course: Option<i32>,
        update: &LineUpdate,
    ) -> RepoResult<Vec<TicketLine>> {
        let mut store = self.store.lock();
        if !store.ticket_open(tenant_id, ticket_id) {
            return Ok(Vec::new());
        }
        let mut updated = Vec::new();
        for line in store.lines.values_mut() {
            if line.tenant_id == tenant_id
                && line.ticket_id == ticket_id
                && course.is_none_or(|c| c == line.course)
                && line.prep_status == update.expected
            {
                *line = update.apply_to(line);
                updated.push(line.clone());
            }
        }
        Ok(updated)
    }

    async fn list_open_tickets(&self, tenant_id: &str, location_id: i64) -> RepoResult<Vec<Ticket>> {
        let store = self.store.lock();
        Ok(store
            .tickets
            .values()
            .filter(|t| t.tenant_id == tenant_id && t.location_id == location_id && !t.is_closed())
            .cloned()
            .collect())
    }

    async fn list_lines(&self, tenant_id: &str, ticket_ids: &[i64]) -> RepoResult<Vec<TicketLine>> {
        let store = self.store.lock();
        Ok(store
            .lines
            .values()
            .filter(|l| l.tenant_id == tenant_id && ticket_ids.contains(&l.ticket_id))
            .cloned()
            .collect())
    }

    async fn list_flags(
        &self,
        tenant_id: &str,
        ticket_ids: &[i64],
    ) -> RepoResult<Vec<TicketOrderFlag>> {
        let store = self.store.lock();
        Ok(store
            .flags
            .iter()
            .filter(|f| f.tenant_id == tenant_id && ticket_ids.contains(&f.ticket_id))
            .cloned()
            .collect())
    }

    async fn product_thresholds(&self, tenant_id: &str) -> RepoResult<HashMap<i64, i64>> {
        let store = self.store.lock();
        Ok(store
            .thresholds
            .iter()
            .filter(|((t, _), _)| t == tenant_id)
            .map(|((_, product_id), minutes)| (*product_id, *minutes))
            .collect())
    }

    async fn upsert_flag(&self, flag: &TicketOrderFlag) -> RepoResult<()> {
        let mut store = self.store.lock();
        store.flags.retain(|f| {
            !(f.tenant_id == flag.tenant_id && f.ticket_id == flag.ticket_id && f.flag == flag.flag)
        });
        store.flags.push(flag.clone());
        Ok(())
    }

    async fn clear_flag(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        flag: OrderFlagKind,
    ) -> RepoResult<bool> {
        let mut store = self.store.lock();
        let before = store.flags.len();
        store
            .flags
            .retain(|f| !(f.tenant_id == tenant_id && f.ticket_id == ticket_id && f.flag == flag));
        Ok(store.flags.len() != before)
    }
}
