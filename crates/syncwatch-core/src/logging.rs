//! Tracing subscriber bootstrap.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG` when set, defaulting to `info`. Idempotent:
/// repeated calls (tests, embedded use) are no-ops after the first.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
        tracing::debug!("tracing subscriber installed");
    });
}
