//! Prometheus metrics recorder and metric name constants.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Must be called once at server startup before any metrics are recorded.
pub fn install_recorder() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install metrics recorder");
    info!("prometheus metrics recorder installed");
    handle
}

// Metric name constants to avoid typos across modules.

/// WebSocket connections opened total (counter).
pub const WS_CONNECTIONS_TOTAL: &str = "ws_connections_total";
/// WebSocket disconnections total (counter).
pub const WS_DISCONNECTIONS_TOTAL: &str = "ws_disconnections_total";
/// Active WebSocket connections (gauge).
pub const WS_CONNECTIONS_ACTIVE: &str = "ws_connections_active";
/// Broadcast legs delivered total (counter).
pub const WS_BROADCAST_DELIVERIES_TOTAL: &str = "ws_broadcast_deliveries_total";
/// Broadcast legs skipped because the queue was full or closed (counter).
pub const WS_BROADCAST_DROPS_TOTAL: &str = "ws_broadcast_drops_total";
/// Live rooms (gauge).
pub const ROOMS_ACTIVE: &str = "rooms_active";
/// Rooms created total (counter).
pub const ROOMS_CREATED_TOTAL: &str = "rooms_created_total";
/// Rooms reclaimed after the last participant left (counter).
pub const ROOMS_CLOSED_TOTAL: &str = "rooms_closed_total";
/// Successful joins total (counter).
pub const ROOM_JOINS_TOTAL: &str = "room_joins_total";
/// Intent rejections total (counter, labels: kind).
pub const INTENT_REJECTIONS_TOTAL: &str = "intent_rejections_total";
/// Directory lookups that found a live room (counter).
pub const LOOKUP_HITS_TOTAL: &str = "lookup_hits_total";
/// Directory lookups that missed (counter).
pub const LOOKUP_MISSES_TOTAL: &str = "lookup_misses_total";
