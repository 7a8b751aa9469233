//! # syncwatch-server
//!
//! The coordination service: an axum server carrying both surfaces of the
//! system — the persistent WebSocket transport (`/ws`) for create/join
//! intents and roster fan-out, and the HTTP lookup API (`/api`) backed by
//! the same live-room store, plus `/health` and `/metrics`.
//!
//! State lives entirely in one process: [`registry::RoomRegistry`] is the
//! authoritative room table, and the directory the lookup API serves is a
//! read view over it, so existence and joinability cannot diverge.

#![deny(unsafe_code)]

pub mod http;
pub mod metrics;
pub mod registry;
pub mod state;
pub mod websocket;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use syncwatch_settings::ServerSettings;

use crate::registry::RoomRegistry;
use crate::state::AppState;

/// Assemble the full route table around `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(websocket::connection::ws_handler))
        .route("/api", post(http::lookup_handler))
        .route("/health", get(http::health_handler))
        .route("/metrics", get(http::metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the coordinator until the process exits.
///
/// Installs the global metrics recorder, starts the periodic active-room
/// log, binds, and serves.
pub async fn serve(settings: &ServerSettings) -> std::io::Result<()> {
    let handle = metrics::install_recorder();
    let state = AppState::new(settings.outbound_queue_depth, handle);
    spawn_room_log(Arc::clone(&state.registry), settings.room_log_interval_secs);

    let listener = TcpListener::bind((settings.bind.as_str(), settings.port)).await?;
    info!(addr = %listener.local_addr()?, "syncwatch coordinator listening");
    axum::serve(listener, router(state)).await
}

/// Periodically log the live room ids at info level. Zero disables.
fn spawn_room_log(registry: Arc<RoomRegistry>, interval_secs: u64) {
    if interval_secs == 0 {
        return;
    }
    let _ = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; skip it so the log cadence
        // starts one interval after boot.
        let _ = ticker.tick().await;
        loop {
            let _ = ticker.tick().await;
            let rooms = registry.room_ids().await;
            info!(count = rooms.len(), rooms = ?rooms, "active rooms");
        }
    });
}
