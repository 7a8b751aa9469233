//! WebSocket upgrade and per-connection read/write loops.
//!
//! Each accepted socket gets a [`ClientConnection`]: an opaque id minted at
//! accept time plus a bounded outbound queue. A dedicated writer task drains
//! the queue into the socket, so neither intent handling nor broadcasts ever
//! block on a peer's transport. The read loop is the connection's lifetime:
//! when it ends (clean close, network failure, protocol error), disconnect
//! cleanup runs exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tracing::{debug, info};

use syncwatch_core::ids::ConnectionId;
use syncwatch_core::protocol::ServerReply;

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL};
use crate::state::AppState;
use crate::websocket::{broadcast, handler};

/// One accepted transport connection.
///
/// Roster membership compares ids, never this struct; the queue sender is
/// the only handle anyone else holds on the socket.
pub struct ClientConnection {
    /// Opaque identity, minted at accept time.
    pub id: ConnectionId,
    outbound: mpsc::Sender<Arc<String>>,
    drops: AtomicU64,
}

impl ClientConnection {
    /// Wrap an outbound queue in a connection handle.
    pub fn new(id: ConnectionId, outbound: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id,
            outbound,
            drops: AtomicU64::new(0),
        }
    }

    /// Queue a frame without blocking.
    ///
    /// Returns `false` when the queue is full or the writer is gone — the
    /// caller treats that as a skipped delivery, not an error.
    pub fn send(&self, frame: Arc<String>) -> bool {
        match self.outbound.try_send(frame) {
            Ok(()) => true,
            Err(_) => {
                let _ = self.drops.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Lifetime count of skipped deliveries on this connection.
    pub fn drop_count(&self) -> u64 {
        self.drops.load(Ordering::Relaxed)
    }
}

/// `GET /ws` — upgrade to the coordination transport.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Arc<String>>(state.outbound_queue_depth);
    let conn = Arc::new(ClientConnection::new(ConnectionId::new(), tx));

    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);
    info!(conn_id = %conn.id, "client connected");

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(Message::Text(frame.as_str().into())).await.is_err() {
                break;
            }
        }
    });

    // Greet the new connection so the client can verify the transport.
    broadcast::send_to(&conn, &ServerReply::connected());

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => handler::dispatch(&state, &conn, text.as_str()).await,
            Ok(Message::Close(_)) | Err(_) => break,
            // Binary frames are not part of the protocol; control pings are
            // answered by the transport layer itself.
            Ok(other) => debug!(conn_id = %conn.id, ?other, "ignoring non-text frame"),
        }
    }

    // Sole cleanup path: the read loop has ended, whatever the cause, so
    // this runs exactly once even when close and error race.
    let outcome = state.registry.handle_disconnect(&conn.id).await;
    debug!(conn_id = %conn.id, ?outcome, "disconnect cleanup");

    writer.abort();
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    info!(conn_id = %conn.id, "client disconnected");
}
