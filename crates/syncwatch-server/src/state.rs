//! Shared server state threaded through axum handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::registry::RoomRegistry;

/// State shared by every HTTP and WebSocket handler.
#[derive(Clone)]
pub struct AppState {
    /// The authoritative room store (coordinator + directory).
    pub registry: Arc<RoomRegistry>,
    /// Per-connection outbound queue depth.
    pub outbound_queue_depth: usize,
    /// Handle rendering the `/metrics` endpoint.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Assemble fresh state around an empty registry.
    pub fn new(outbound_queue_depth: usize, metrics: PrometheusHandle) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
            outbound_queue_depth,
            metrics,
        }
    }
}
