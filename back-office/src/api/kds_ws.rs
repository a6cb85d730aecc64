//! KDS WebSocket endpoint: realtime kitchen screen updates
//!
//! GET /api/tenant/kds/ws?token=<JWT>&location_id=<id>&destination=<station>
//! Auth: JWT in the query string (browser WebSocket cannot set headers)
//!
//! Protocol:
//! - Server → Screen: KdsMessage (Ready, LineChanged, FlagChanged)
//! - Screen → Server: KdsCommand (Subscribe)

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::live::{KdsCommand, KdsMessage};
use shared::models::Destination;
use tokio::sync::broadcast;
use tokio::time::Duration;

use super::tenant::verify_location;
use crate::auth::tenant_auth;
use crate::state::AppState;

/// Maximum concurrent KDS screens per tenant
const MAX_KDS_WS_PER_TENANT: usize = 20;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct KdsWsQuery {
    token: String,
    location_id: i64,
    destination: Option<Destination>,
}

/// GET /api/tenant/kds/ws
pub async fn handle_kds_ws(
    State(state): State<AppState>,
    Query(query): Query<KdsWsQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let identity = tenant_auth::verify_token(&query.token, &state.jwt_secret)?;
    let tenant_id = identity.tenant_id;
    verify_location(&state, query.location_id, &tenant_id).await?;

    if !state
        .hub
        .try_acquire_connection(&tenant_id, MAX_KDS_WS_PER_TENANT)
    {
        return Err(AppError::with_message(
            ErrorCode::ResourceLimitExceeded,
            format!("Too many KDS connections (max {MAX_KDS_WS_PER_TENANT})"),
        ));
    }

    let location_id = query.location_id;
    let destination = query.destination;
    Ok(ws.on_upgrade(move |socket| async move {
        kds_ws_session(socket, &state, &tenant_id, location_id, destination).await;
        state.hub.release_connection(&tenant_id);
        tracing::info!(tenant_id = %tenant_id, location_id, "KDS WS disconnected");
    }))
}

/// Runs until the screen disconnects; the receiver is dropped on return so the
/// caller can release the tenant's channel.
async fn kds_ws_session(
    socket: WebSocket,
    state: &AppState,
    tenant_id: &str,
    location_id: i64,
    mut destination: Option<Destination>,
) {
    let (mut sink, mut stream) = socket.split();

    tracing::info!(tenant_id = %tenant_id, location_id, ?destination, "KDS WS connected");

    // Subscribe before the snapshot so nothing is missed in between
    let mut hub_rx = state.hub.subscribe(tenant_id);
    if send_board(&mut sink, state, tenant_id, location_id, destination)
        .await
        .is_err()
    {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(msg) => {
                        if passes_filter(&msg, location_id, destination)
                            && send_message(&mut sink, &msg).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(tenant_id = %tenant_id, lagged = n, "KDS subscriber lagged, resending board");
                        hub_rx = state.hub.subscribe(tenant_id);
                        if send_board(&mut sink, state, tenant_id, location_id, destination)
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<KdsCommand>(&text) {
                            Ok(KdsCommand::Subscribe { destination: station }) => {
                                destination = station;
                                if send_board(&mut sink, state, tenant_id, location_id, destination)
                                    .await
                                    .is_err()
                                {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(tenant_id = %tenant_id, "Ignoring KDS command: {e}");
                            }
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }
}

/// Only changes for this screen's location (and station, if set)
fn passes_filter(msg: &KdsMessage, location_id: i64, destination: Option<Destination>) -> bool {
    match msg {
        KdsMessage::LineChanged {
            location_id: loc,
            line,
        } => *loc == location_id && destination.is_none_or(|d| d == line.destination),
        KdsMessage::FlagChanged {
            location_id: loc, ..
        } => *loc == location_id,
        KdsMessage::Ready { .. } => false,
    }
}

async fn send_board<S>(
    sink: &mut S,
    state: &AppState,
    tenant_id: &str,
    location_id: i64,
    destination: Option<Destination>,
) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let board = state
        .kds
        .board(tenant_id, location_id, destination)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            tracing::error!(tenant_id = %tenant_id, location_id, "KDS board load failed: {}", err.message);
        })?;
    send_message(sink, &KdsMessage::Ready { board }).await
}

async fn send_message<S>(sink: &mut S, msg: &KdsMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{PrepStatus, TicketLine};

    fn line_changed(location_id: i64, destination: Destination) -> KdsMessage {
        KdsMessage::LineChanged {
            location_id,
            line: TicketLine {
                id: 1,
                tenant_id: "t1".into(),
                ticket_id: 1,
                product_id: 1,
                product_name: "Caña".into(),
                quantity: 1,
                course: 1,
                destination,
                prep_status: PrepStatus::Preparing,
                note: None,
                created_at: 0,
                prep_started_at: Some(0),
                ready_at: None,
                served_at: None,
                updated_at: 0,
            },
        }
    }

    #[test]
    fn filters_by_location_and_station() {
        let msg = line_changed(7, Destination::Bar);
        assert!(passes_filter(&msg, 7, None));
        assert!(passes_filter(&msg, 7, Some(Destination::Bar)));
        assert!(!passes_filter(&msg, 7, Some(Destination::Kitchen)));
        assert!(!passes_filter(&msg, 8, None));
    }

    #[test]
    fn flag_changes_ignore_station() {
        let msg = KdsMessage::FlagChanged {
            location_id: 7,
            ticket_id: 1,
            flags: vec![],
        };
        assert!(passes_filter(&msg, 7, Some(Destination::Prep)));
        assert!(!passes_filter(&msg, 9, None));
    }
}
