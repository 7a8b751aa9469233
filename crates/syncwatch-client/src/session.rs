//! The session transport: connect with bounded retries, send intents,
//! receive replies.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use syncwatch_core::ids::RoomId;
use syncwatch_core::protocol::{ClientIntent, ServerReply};
use syncwatch_settings::ClientSettings;

use crate::errors::ClientError;
use crate::reconnect::{ClientState, ReconnectPolicy, Reconnector};
use crate::validate;

/// One logical client of the coordination service.
///
/// Holds the endpoint and the reconnect state machine; each successful
/// [`connect`](Self::connect) yields a fresh [`SessionConnection`]. The
/// server sees every reconnect as a brand-new client, so callers re-issue
/// their create or join intent on the new connection.
#[derive(Debug)]
pub struct SessionClient {
    ws_endpoint: String,
    reconnector: Reconnector,
    state: ClientState,
}

impl SessionClient {
    /// A client configured from settings.
    pub fn new(settings: &ClientSettings) -> Self {
        Self::from_parts(
            settings.ws_endpoint.clone(),
            ReconnectPolicy {
                max_retries: settings.max_retries,
                retry_delay: std::time::Duration::from_millis(settings.retry_delay_ms),
            },
        )
    }

    /// A client from an explicit endpoint and policy.
    pub fn from_parts(ws_endpoint: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            ws_endpoint: ws_endpoint.into(),
            reconnector: Reconnector::new(policy),
            state: ClientState::Connecting,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Establish the transport, retrying up to the policy bound with the
    /// fixed inter-attempt delay, then going terminal.
    pub async fn connect(&mut self) -> Result<SessionConnection, ClientError> {
        loop {
            self.state = ClientState::Connecting;
            match connect_async(self.ws_endpoint.as_str()).await {
                Ok((ws, _response)) => {
                    self.reconnector.on_open();
                    self.state = ClientState::Open;
                    info!(endpoint = %self.ws_endpoint, "transport open");
                    return Ok(SessionConnection { ws });
                }
                Err(error) => {
                    warn!(endpoint = %self.ws_endpoint, error = %error, "connect attempt failed");
                    match self.reconnector.on_failure() {
                        Some(delay) => {
                            let attempt = self.reconnector.retries_used();
                            self.state = ClientState::ClosedRetrying { attempt };
                            debug!(attempt, ?delay, "scheduling reconnect");
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            self.state = ClientState::ClosedTerminal;
                            return Err(ClientError::Terminal {
                                attempts: self.reconnector.attempts_made(),
                            });
                        }
                    }
                }
            }
        }
    }
}

/// An open transport to the coordinator.
#[derive(Debug)]
pub struct SessionConnection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl SessionConnection {
    /// Send one intent frame.
    pub async fn send(&mut self, intent: &ClientIntent) -> Result<(), ClientError> {
        let frame = serde_json::to_string(intent)?;
        self.ws.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    /// Receive the next server frame.
    ///
    /// Control frames (the accept greeting, pongs) are returned like any
    /// other reply; use [`next_status`](Self::next_status) to skip them.
    pub async fn recv(&mut self) -> Result<ServerReply, ClientError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(serde_json::from_str(text.as_str())?);
                }
                Some(Ok(Message::Close(_))) | None => return Err(ClientError::Closed),
                Some(Ok(_)) => {} // transport-level ping/pong/binary
                Some(Err(error)) => return Err(error.into()),
            }
        }
    }

    /// Receive the next status-bearing reply, skipping control frames.
    pub async fn next_status(&mut self) -> Result<ServerReply, ClientError> {
        loop {
            match self.recv().await? {
                ServerReply::Control { action, .. } => {
                    debug!(action, "skipping control frame");
                }
                reply => return Ok(reply),
            }
        }
    }

    /// Validate and send a create intent. The reply arrives via
    /// [`next_status`](Self::next_status).
    pub async fn create_group(
        &mut self,
        room_id: &RoomId,
        link: &str,
        name: &str,
    ) -> Result<(), ClientError> {
        validate::link(link)?;
        validate::name(name)?;
        self.send(&ClientIntent::CreateGroup {
            room_id: room_id.as_str().to_owned(),
            link: link.to_owned(),
            name: name.to_owned(),
        })
        .await
    }

    /// Validate and send a join intent. On success the coordinator answers
    /// with a roster broadcast to every member, this connection included.
    pub async fn join(&mut self, room_id: &RoomId, name: &str) -> Result<(), ClientError> {
        validate::name(name)?;
        self.send(&ClientIntent::Join {
            room_id: room_id.as_str().to_owned(),
            name: name.to_owned(),
        })
        .await
    }

    /// Send a liveness probe. The pong comes back through
    /// [`recv`](Self::recv); a missing pong is not treated as a failure —
    /// disconnection detection rides on transport close/error.
    pub async fn ping(&mut self) -> Result<(), ClientError> {
        self.send(&ClientIntent::Ping).await
    }

    /// Close the transport cleanly.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.ws.close(None).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
