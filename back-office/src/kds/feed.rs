//! Row change feed
//!
//! Triggers on `ticket_lines` (insert) and `ticket_order_flags` (any change)
//! call `pg_notify` on [`CHANNEL`]. The listener relays each notification
//! through [`KdsService::relay_change`] so rows written by the POS or by demo
//! seeding reach connected screens without a reconnect.

use std::time::Duration;

use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::task::JoinHandle;

use super::service::KdsService;

pub const CHANNEL: &str = "kds_changes";

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Notification payload, as built by the triggers in the migrations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum RowChange {
    TicketLines { tenant_id: String, line_id: i64 },
    TicketOrderFlags { tenant_id: String, ticket_id: i64 },
}

/// Listen for row changes until the task is aborted, reconnecting on failure
pub fn spawn_listener(pool: PgPool, kds: KdsService) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = listen(&pool, &kds).await {
                tracing::error!(error = %e, "KDS change feed dropped, reconnecting");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

async fn listen(pool: &PgPool, kds: &KdsService) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANNEL).await?;
    tracing::info!(channel = CHANNEL, "KDS change feed listening");

    loop {
        let notification = listener.recv().await?;
        relay(kds, notification.payload()).await;
    }
}

/// Decode one payload and push it to the hub; failures are logged only
pub async fn relay(kds: &KdsService, payload: &str) {
    let change: RowChange = match serde_json::from_str(payload) {
        Ok(change) => change,
        Err(e) => {
            tracing::warn!(error = %e, payload, "Unreadable KDS change notification");
            return;
        }
    };
    if let Err(e) = kds.relay_change(&change).await {
        tracing::warn!(?change, error = ?e, "Failed to relay KDS change");
    }
}
