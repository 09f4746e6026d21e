//! Per-connection handler: identity assignment and bidirectional pumping
//! between the socket and the session hub.
//!
//! A connection IS its identity — the connection id doubles as the client
//! id for the life of the socket, exactly one handler task per connection.
//! Inbound frames decode into [`ClientEvent`]s and feed the hub; events
//! the hub pushes for this client flow back out as JSON text frames.

use kondeck_protocol::{
    ClientEvent, ClientId, Codec, ErrorPayload, JsonCodec, ServerEvent,
};
use kondeck_session::HubHandle;
use kondeck_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ServerError;

/// Drop guard that reports the disconnect when the handler exits, even on
/// a panic. `Drop` is synchronous, so the async hub call is spawned.
struct DisconnectGuard {
    client: ClientId,
    hub: HubHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let client = self.client;
        let hub = self.hub.clone();
        tokio::spawn(async move {
            let _ = hub.disconnect(client).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    hub: HubHandle,
    codec: JsonCodec,
) -> Result<(), ServerError> {
    let client = ClientId(conn.id().into_inner());
    tracing::info!(%client, "client connected");

    let (tx, mut outbound) = mpsc::unbounded_channel::<ServerEvent>();
    hub.register(client, tx).await?;
    let _guard = DisconnectGuard {
        client,
        hub: hub.clone(),
    };

    loop {
        tokio::select! {
            // Hub → client.
            event = outbound.recv() => {
                let Some(event) = event else {
                    // The hub dropped our sender; nothing more will come.
                    break;
                };
                let bytes = codec.encode(&event)?;
                if conn.send(&bytes).await.is_err() {
                    tracing::debug!(%client, "send failed, peer gone");
                    break;
                }
            }

            // Client → hub.
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%client, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%client, error = %e, "recv error");
                        break;
                    }
                };

                match codec.decode::<ClientEvent>(&data) {
                    Ok(event) => hub.request(client, event).await?,
                    Err(e) => {
                        // Malformed frames are answered, not fatal.
                        tracing::debug!(%client, error = %e, "bad frame");
                        let reject = ServerEvent::Error(ErrorPayload {
                            message: e.to_string(),
                        });
                        let bytes = codec.encode(&reject)?;
                        if conn.send(&bytes).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    // _guard drops here → the hub sees the disconnect (leave semantics).
    Ok(())
}
