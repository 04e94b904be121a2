//! Per-connection handler: registration, the writer pump, and the read
//! loop.
//!
//! Each accepted connection gets one task running [`handle_connection`]
//! plus one writer pump task. The read loop processes events to
//! completion in arrival order, so a connection's own events are never
//! reordered; events from different connections interleave only at the
//! persistence await points.

use std::sync::Arc;

use scrawl_protocol::{ClientEvent, Codec};
use scrawl_room::GuessPolicy;
use scrawl_store::SessionStore;
use scrawl_transport::{ConnectionId, WsConnection, WsReader};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::{RelayError, lifecycle, router};

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S, P>(
    conn: WsConnection,
    state: Arc<ServerState<S, P>>,
) -> Result<(), RelayError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (reader, mut writer) = conn.into_split();

    // The registry owns the only long-lived sender; once it is
    // unregistered the channel closes and the pump drains out.
    let (sink, mut outbound) = mpsc::unbounded_channel();
    state.coord.lock().await.connections.register(conn_id, sink);

    let codec = state.codec;
    let pump = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match codec.encode(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(%conn_id, error = %e, "failed to encode outbound event");
                    continue;
                }
            };
            if writer.send(text).await.is_err() {
                break;
            }
        }
        let _ = writer.close().await;
    });

    let result = read_loop(reader, conn_id, &state).await;

    // Cleanup runs on every exit path: clean close, receive error, or a
    // client that never joined a room.
    lifecycle::disconnect(&state, conn_id).await;
    let _ = pump.await;

    result
}

async fn read_loop<S, P>(
    mut reader: WsReader,
    conn_id: ConnectionId,
    state: &ServerState<S, P>,
) -> Result<(), RelayError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    loop {
        match reader.recv().await {
            Ok(Some(text)) => {
                let event: ClientEvent = match state.codec.decode(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "dropping undecodable frame");
                        continue;
                    }
                };
                router::dispatch(state, conn_id, event).await;
            }
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "receive failed");
                return Err(RelayError::Transport(e));
            }
        }
    }
}
