//! Per-connection handler.
//!
//! Each accepted connection gets its own task running this handler:
//!   1. Register with the coordinator as an unassigned participant
//!   2. Loop: decode inbound intents and submit them; encode outbound
//!      notifications and send them
//!   3. On close (either side), report the disconnect

use std::sync::Arc;

use quickdraw_game::CoordinatorHandle;
use quickdraw_protocol::{Codec, Intent, Outbound, ParticipantId};
use quickdraw_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::QuickdrawError;
use crate::server::ServerState;

/// Reports the disconnect when the handler exits, including on early
/// return and panic. `Drop` is synchronous, so the send is spawned.
struct ParticipantGuard {
    id: ParticipantId,
    coordinator: CoordinatorHandle,
}

impl Drop for ParticipantGuard {
    fn drop(&mut self) {
        let id = self.id;
        let coordinator = self.coordinator.clone();
        tokio::spawn(async move {
            let _ = coordinator.disconnect(id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), QuickdrawError> {
    let id = conn.id();
    tracing::debug!(participant = %id, "handling new connection");

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    state.coordinator.connect(id, outbound_tx).await?;
    let _guard = ParticipantGuard {
        id,
        coordinator: state.coordinator.clone(),
    };

    loop {
        tokio::select! {
            incoming = conn.recv() => {
                let data = match incoming {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(participant = %id, "connection closed by client");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(participant = %id, error = %e, "recv error");
                        break;
                    }
                };

                match state.codec.decode::<Intent>(&data) {
                    Ok(intent) => state.coordinator.submit(id, intent).await?,
                    Err(e) => {
                        tracing::debug!(
                            participant = %id,
                            error = %e,
                            "undecodable message dropped"
                        );
                    }
                }
            }
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(Outbound::Notify(notification)) => {
                        let bytes = state.codec.encode(&notification)?;
                        conn.send(&bytes).await?;
                    }
                    Some(Outbound::Close) => {
                        tracing::info!(participant = %id, "closing connection");
                        if let Err(e) = conn.close().await {
                            tracing::debug!(participant = %id, error = %e, "close failed");
                        }
                        break;
                    }
                    None => {
                        tracing::debug!(participant = %id, "outbound channel closed");
                        break;
                    }
                }
            }
        }
    }

    // _guard drops here → disconnect is reported.
    Ok(())
}
