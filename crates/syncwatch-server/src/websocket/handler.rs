//! Inbound frame dispatch.
//!
//! Every frame gets a status-bearing answer: success acknowledgments and
//! roster broadcasts on the happy paths, typed rejections otherwise. No
//! failure here closes the connection or escapes the request — a malformed
//! frame or unknown action leaves the transport open for the next intent.

use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use syncwatch_core::errors::CoordinatorError;
use syncwatch_core::protocol::{ClientIntent, ServerReply};

use crate::metrics::INTENT_REJECTIONS_TOTAL;
use crate::state::AppState;
use crate::websocket::broadcast;
use crate::websocket::connection::ClientConnection;

/// Handle one text frame from `conn`.
pub async fn dispatch(state: &AppState, conn: &Arc<ClientConnection>, text: &str) {
    let intent = match ClientIntent::parse(text) {
        Ok(intent) => intent,
        Err(error) => {
            reject(conn, &error);
            return;
        }
    };

    match intent {
        ClientIntent::CreateGroup { room_id, link, name } => {
            match state
                .registry
                .create_room(Arc::clone(conn), &room_id, &link, &name)
                .await
            {
                // Sole participant: acknowledge the creator only, no
                // roster broadcast needed.
                Ok(()) => broadcast::send_to(conn, &ServerReply::room_created()),
                Err(error) => reject(conn, &error),
            }
        }
        ClientIntent::Join { room_id, name } => {
            // The success reply is the roster broadcast the registry fans
            // out to every member, the joiner included.
            if let Err(error) = state
                .registry
                .join_room(Arc::clone(conn), &room_id, &name)
                .await
            {
                reject(conn, &error);
            }
        }
        ClientIntent::Ping => {
            debug!(conn_id = %conn.id, "liveness probe");
            broadcast::send_to(conn, &ServerReply::pong());
        }
    }
}

fn reject(conn: &ClientConnection, error: &CoordinatorError) {
    let kind = match error {
        CoordinatorError::Validation => "validation",
        CoordinatorError::AlreadyExists => "already_exists",
        CoordinatorError::NotFound => "not_found",
        CoordinatorError::Malformed => "malformed",
        CoordinatorError::UnknownAction(_) => "unknown_action",
    };
    counter!(INTENT_REJECTIONS_TOTAL, "kind" => kind).increment(1);
    debug!(conn_id = %conn.id, kind, "intent rejected");
    broadcast::send_to(conn, &ServerReply::rejection(error));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tokio::sync::mpsc;

    use syncwatch_core::ids::ConnectionId;

    use super::*;

    fn make_state() -> AppState {
        AppState::new(32, PrometheusBuilder::new().build_recorder().handle())
    }

    fn make_connection() -> (Arc<ClientConnection>, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(32);
        (Arc::new(ClientConnection::new(ConnectionId::new(), tx)), rx)
    }

    async fn reply_of(rx: &mut mpsc::Receiver<Arc<String>>) -> ServerReply {
        let frame = rx.try_recv().expect("expected a queued reply");
        serde_json::from_str(&frame).unwrap()
    }

    #[tokio::test]
    async fn create_acknowledges_creator_only() {
        let state = make_state();
        let (conn, mut rx) = make_connection();

        dispatch(
            &state,
            &conn,
            r#"{"action":"create-group","room-id":"1234-5678","link":"http://example.com/a","name":"Alice"}"#,
        )
        .await;

        assert_eq!(reply_of(&mut rx).await, ServerReply::room_created());
        assert!(rx.try_recv().is_err(), "no roster broadcast on create");
        assert_eq!(state.registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn create_with_missing_fields_is_rejected() {
        let state = make_state();
        let (conn, mut rx) = make_connection();

        dispatch(&state, &conn, r#"{"action":"create-group","room-id":"1234-5678"}"#).await;

        assert_eq!(
            reply_of(&mut rx).await,
            ServerReply::Status {
                status: 400,
                message: "Missing required fields".into(),
            }
        );
        assert_eq!(state.registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected_to_sender() {
        let state = make_state();
        let (first, mut first_rx) = make_connection();
        let (second, mut second_rx) = make_connection();
        let create =
            r#"{"action":"create-group","room-id":"1234-5678","link":"http://example.com/a","name":"Alice"}"#;

        dispatch(&state, &first, create).await;
        dispatch(&state, &second, create).await;

        assert_eq!(reply_of(&mut first_rx).await, ServerReply::room_created());
        assert_eq!(
            reply_of(&mut second_rx).await,
            ServerReply::Status {
                status: 400,
                message: "Room already exists".into(),
            }
        );
        // The loser of the race got no membership.
        assert!(first_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn join_replies_via_broadcast() {
        let state = make_state();
        let (alice, mut alice_rx) = make_connection();
        let (bob, mut bob_rx) = make_connection();

        dispatch(
            &state,
            &alice,
            r#"{"action":"create-group","room-id":"1234-5678","link":"http://example.com/a","name":"Alice"}"#,
        )
        .await;
        let _ = alice_rx.try_recv().unwrap(); // drain the create ack

        dispatch(&state, &bob, r#"{"action":"join","room-id":"1234-5678","name":"Bob"}"#).await;

        let expected = ServerReply::roster(vec!["Alice".into(), "Bob".into()]);
        assert_eq!(reply_of(&mut alice_rx).await, expected);
        assert_eq!(reply_of(&mut bob_rx).await, expected);
    }

    #[tokio::test]
    async fn join_unknown_room_is_not_found() {
        let state = make_state();
        let (conn, mut rx) = make_connection();

        dispatch(&state, &conn, r#"{"action":"join","room-id":"0000-0000","name":"Bob"}"#).await;

        assert_eq!(
            reply_of(&mut rx).await,
            ServerReply::Status {
                status: 404,
                message: "Room not found".into(),
            }
        );
        assert_eq!(state.registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let state = make_state();
        let (conn, mut rx) = make_connection();
        dispatch(&state, &conn, r#"{"action":"ping"}"#).await;
        assert_eq!(reply_of(&mut rx).await, ServerReply::pong());
    }

    #[tokio::test]
    async fn unknown_action_is_rejected_with_tag() {
        let state = make_state();
        let (conn, mut rx) = make_connection();
        dispatch(&state, &conn, r#"{"action":"dance"}"#).await;
        assert_eq!(
            reply_of(&mut rx).await,
            ServerReply::Status {
                status: 400,
                message: "Unknown action: dance".into(),
            }
        );
    }

    #[tokio::test]
    async fn malformed_frame_answers_distinct_status() {
        let state = make_state();
        let (conn, mut rx) = make_connection();
        dispatch(&state, &conn, "{{ not json").await;
        assert_eq!(
            reply_of(&mut rx).await,
            ServerReply::Status {
                status: 500,
                message: "Error processing message".into(),
            }
        );
        // The connection is still usable.
        dispatch(&state, &conn, r#"{"action":"ping"}"#).await;
        assert_eq!(reply_of(&mut rx).await, ServerReply::pong());
    }
}
