//! HTTP surface: the directory lookup API, health, and metrics.
//!
//! The lookup endpoint answers the envelope the consuming UI already
//! expects: an outer `statusCode` plus a JSON-*string* `body`. Requests are
//! read as loose JSON so an unrecognized or missing action tag gets the
//! 400 envelope instead of a framework rejection.

use axum::Json;
use axum::extract::State;
use metrics::counter;
use serde_json::Value;
use tracing::debug;

use syncwatch_core::protocol::{DirectoryEntry, LOOKUP_ACTION, LookupEnvelope};

use crate::metrics::{LOOKUP_HITS_TOTAL, LOOKUP_MISSES_TOTAL};
use crate::state::AppState;

/// `POST /api` — room existence check against the live-room set.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Json(request): Json<Value>,
) -> Json<LookupEnvelope> {
    let action = request
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if action != LOOKUP_ACTION {
        debug!(action, "lookup with unrecognized action");
        return Json(LookupEnvelope::invalid_action());
    }

    let uuid = request
        .get("uuid")
        .and_then(Value::as_str)
        .unwrap_or_default();
    match state.registry.lookup(uuid).await {
        Some(link) => {
            counter!(LOOKUP_HITS_TOTAL).increment(1);
            Json(LookupEnvelope::found(&DirectoryEntry {
                link,
                uuid: uuid.to_owned(),
            }))
        }
        None => {
            counter!(LOOKUP_MISSES_TOTAL).increment(1);
            debug!(uuid, "lookup miss");
            Json(LookupEnvelope::not_found())
        }
    }
}

/// `GET /health` — liveness probe.
pub async fn health_handler() -> &'static str {
    "ok"
}

/// `GET /metrics` — Prometheus text format.
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metrics_exporter_prometheus::PrometheusBuilder;
    use tokio::sync::mpsc;

    use syncwatch_core::ids::ConnectionId;

    use crate::websocket::connection::ClientConnection;

    use super::*;

    fn make_state() -> AppState {
        AppState::new(32, PrometheusBuilder::new().build_recorder().handle())
    }

    async fn seed_room(state: &AppState, room_id: &str, link: &str) {
        let (tx, _rx) = mpsc::channel(8);
        // The receiver is dropped; broadcast legs to it are skips, which is
        // all these lookup tests need.
        let conn = Arc::new(ClientConnection::new(ConnectionId::new(), tx));
        state
            .registry
            .create_room(conn, room_id, link, "Alice")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn lookup_hit_carries_link_and_uuid() {
        let state = make_state();
        seed_room(&state, "1234-5678", "http://example.com/a").await;

        let request = serde_json::json!({"action": "groups_exists", "uuid": "1234-5678"});
        let Json(envelope) = lookup_handler(State(state), Json(request)).await;

        assert_eq!(envelope.status_code, 200);
        assert_eq!(
            envelope.decode().unwrap(),
            Some(DirectoryEntry {
                link: "http://example.com/a".into(),
                uuid: "1234-5678".into(),
            })
        );
    }

    #[tokio::test]
    async fn lookup_miss_is_404_with_null_payload() {
        let state = make_state();
        let request = serde_json::json!({"action": "groups_exists", "uuid": "0000-0000"});
        let Json(envelope) = lookup_handler(State(state), Json(request)).await;
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.decode().unwrap(), None);
    }

    #[tokio::test]
    async fn lookup_rejects_other_actions() {
        let state = make_state();
        for request in [
            serde_json::json!({"action": "rooms_list"}),
            serde_json::json!({"uuid": "1234-5678"}),
        ] {
            let Json(envelope) = lookup_handler(State(state.clone()), Json(request)).await;
            assert_eq!(envelope.status_code, 400);
        }
    }

    #[tokio::test]
    async fn health_is_static() {
        assert_eq!(health_handler().await, "ok");
    }
}
