//! LiveKdsHub: realtime KDS fan-out
//!
//! Ticket line and flag changes are published per tenant and pushed to
//! every connected kitchen screen of that tenant.
//!
//! ```text
//! KdsService (transition / flag change)     kds::feed (PgListener, row inserts)
//!       │ KdsMessage                          │ relay_change
//!       ├─────────────────────────────────────┘
//!       ▼
//! LiveKdsHub
//!   └── tenants: tenant_id → broadcast::Sender<KdsMessage>
//!         │
//!         ▼
//!   KDS WS handler (location / station filter → push)
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use shared::live::KdsMessage;
use shared::models::{TicketLine, TicketOrderFlag};
use tokio::sync::broadcast;

/// Broadcast channel capacity, enough to absorb a bulk course transition
const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct LiveKdsHub {
    /// tenant_id → broadcast sender
    tenants: Arc<DashMap<String, broadcast::Sender<KdsMessage>>>,
    /// tenant_id → open WS connections
    connections: Arc<DashMap<String, AtomicUsize>>,
}

impl LiveKdsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_line(&self, tenant_id: &str, location_id: i64, line: TicketLine) {
        self.send(tenant_id, KdsMessage::LineChanged { location_id, line });
    }

    pub fn publish_flags(
        &self,
        tenant_id: &str,
        location_id: i64,
        ticket_id: i64,
        flags: Vec<TicketOrderFlag>,
    ) {
        self.send(
            tenant_id,
            KdsMessage::FlagChanged {
                location_id,
                ticket_id,
                flags,
            },
        );
    }

    /// Subscribe to the tenant's channel
    pub fn subscribe(&self, tenant_id: &str) -> broadcast::Receiver<KdsMessage> {
        self.tenants
            .entry(tenant_id.to_string())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Reserve a WS slot for the tenant; `false` when `max` is reached
    pub fn try_acquire_connection(&self, tenant_id: &str, max: usize) -> bool {
        let counter = self
            .connections
            .entry(tenant_id.to_string())
            .or_insert_with(|| AtomicUsize::new(0));
        let prev = counter.fetch_add(1, Ordering::SeqCst);
        if prev >= max {
            counter.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        true
    }

    pub fn release_connection(&self, tenant_id: &str) {
        if let Some(counter) = self.connections.get(tenant_id) {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
        // Drop the channel once nobody listens
        self.tenants
            .remove_if(tenant_id, |_, tx| tx.receiver_count() == 0);
    }

    pub fn connection_count(&self, tenant_id: &str) -> usize {
        self.connections
            .get(tenant_id)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    fn send(&self, tenant_id: &str, msg: KdsMessage) {
        if let Some(tx) = self.tenants.get(tenant_id) {
            // No receivers: send returns Err, safe to ignore
            let _ = tx.send(msg);
        }
    }
}
