//! Settings structs and their compiled defaults.

use serde::{Deserialize, Serialize};

/// Root settings document.
///
/// Serialized as camelCase so the on-disk `settings.json` reads naturally.
/// Missing fields fall back to compiled defaults at every level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncwatchSettings {
    /// Coordination server knobs.
    pub server: ServerSettings,
    /// Session client knobs.
    pub client: ClientSettings,
}

impl Default for SyncwatchSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            client: ClientSettings::default(),
        }
    }
}

/// Coordination server settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub bind: String,
    /// TCP port serving both the WebSocket and the lookup API.
    pub port: u16,
    /// Seconds between periodic active-room log lines. Zero disables.
    pub room_log_interval_secs: u64,
    /// Per-connection outbound queue depth; a full queue skips that
    /// broadcast leg.
    pub outbound_queue_depth: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_owned(),
            port: 8080,
            room_log_interval_secs: 30,
            outbound_queue_depth: 64,
        }
    }
}

/// Session client settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// WebSocket endpoint of the coordinator.
    pub ws_endpoint: String,
    /// HTTP endpoint of the lookup API.
    pub api_endpoint: String,
    /// Reconnect attempts before the client goes terminal.
    pub max_retries: u32,
    /// Fixed delay between reconnect attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            ws_endpoint: "ws://127.0.0.1:8080/ws".to_owned(),
            api_endpoint: "http://127.0.0.1:8080/api".to_owned(),
            max_retries: 5,
            retry_delay_ms: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_constants() {
        let settings = SyncwatchSettings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.room_log_interval_secs, 30);
        assert_eq!(settings.client.max_retries, 5);
        assert_eq!(settings.client.retry_delay_ms, 3000);
    }

    #[test]
    fn missing_fields_fall_back_per_level() {
        let settings: SyncwatchSettings =
            serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind, "0.0.0.0");
        assert_eq!(settings.client.max_retries, 5);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&SyncwatchSettings::default()).unwrap();
        assert!(json.contains("roomLogIntervalSecs"), "was {json}");
        assert!(json.contains("retryDelayMs"), "was {json}");
    }
}
