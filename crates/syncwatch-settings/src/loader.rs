//! Settings file loading, deep merge, and environment overrides.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, SettingsError};
use crate::types::SyncwatchSettings;

/// Default settings file location: `~/.syncwatch/settings.json`.
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    Path::new(&home).join(".syncwatch").join("settings.json")
}

/// Recursively merge `overlay` onto `base`.
///
/// Objects merge key-by-key; any other value in `overlay` replaces the base
/// value wholesale.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path with env overrides applied.
pub fn load_settings() -> Result<SyncwatchSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from `path`.
///
/// Layering, lowest priority first: compiled defaults, the file (deep-merged
/// when present; a missing file is not an error), then `SYNCWATCH_*`
/// environment variables.
pub fn load_settings_from_path(path: &Path) -> Result<SyncwatchSettings> {
    let defaults = serde_json::to_value(SyncwatchSettings::default())?;
    let merged = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_owned(),
            source,
        })?;
        deep_merge(defaults, serde_json::from_str(&raw)?)
    } else {
        defaults
    };
    let mut settings: SyncwatchSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Apply `SYNCWATCH_*` overrides from `lookup` (highest priority layer).
///
/// Values that fail to parse for numeric knobs are ignored with a warning
/// rather than failing the whole load.
pub fn apply_env_overrides(
    settings: &mut SyncwatchSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(bind) = lookup("SYNCWATCH_BIND") {
        settings.server.bind = bind;
    }
    if let Some(raw) = lookup("SYNCWATCH_PORT") {
        match raw.parse() {
            Ok(port) => settings.server.port = port,
            Err(_) => tracing::warn!(raw = %raw, "ignoring unparseable SYNCWATCH_PORT"),
        }
    }
    if let Some(endpoint) = lookup("SYNCWATCH_WS_ENDPOINT") {
        settings.client.ws_endpoint = endpoint;
    }
    if let Some(endpoint) = lookup("SYNCWATCH_API_ENDPOINT") {
        settings.client.api_endpoint = endpoint;
    }
    if let Some(raw) = lookup("SYNCWATCH_MAX_RETRIES") {
        match raw.parse() {
            Ok(retries) => settings.client.max_retries = retries,
            Err(_) => tracing::warn!(raw = %raw, "ignoring unparseable SYNCWATCH_MAX_RETRIES"),
        }
    }
    if let Some(raw) = lookup("SYNCWATCH_RETRY_DELAY_MS") {
        match raw.parse() {
            Ok(delay) => settings.client.retry_delay_ms = delay,
            Err(_) => tracing::warn!(raw = %raw, "ignoring unparseable SYNCWATCH_RETRY_DELAY_MS"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn deep_merge_overlays_nested_keys() {
        let base = serde_json::json!({"server": {"port": 8080, "bind": "0.0.0.0"}});
        let overlay = serde_json::json!({"server": {"port": 9000}});
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["server"]["port"], 9000);
        assert_eq!(merged["server"]["bind"], "0.0.0.0");
    }

    #[test]
    fn deep_merge_replaces_non_objects() {
        let merged = deep_merge(
            serde_json::json!({"names": ["a", "b"]}),
            serde_json::json!({"names": ["c"]}),
        );
        assert_eq!(merged["names"], serde_json::json!(["c"]));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            load_settings_from_path(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings, SyncwatchSettings::default());
    }

    #[test]
    fn file_layer_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server": {"port": 9000}}"#).unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind, "0.0.0.0");
        assert_eq!(settings.client.max_retries, 5);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn env_layer_wins() {
        let mut settings = SyncwatchSettings::default();
        let env: HashMap<&str, &str> = [
            ("SYNCWATCH_PORT", "7070"),
            ("SYNCWATCH_WS_ENDPOINT", "ws://example.net/ws"),
            ("SYNCWATCH_MAX_RETRIES", "2"),
        ]
        .into_iter()
        .collect();
        apply_env_overrides(&mut settings, |key| env.get(key).map(|v| (*v).to_owned()));

        assert_eq!(settings.server.port, 7070);
        assert_eq!(settings.client.ws_endpoint, "ws://example.net/ws");
        assert_eq!(settings.client.max_retries, 2);
        // Untouched knobs keep their defaults.
        assert_eq!(settings.client.retry_delay_ms, 3000);
    }

    #[test]
    fn unparseable_env_numbers_are_ignored() {
        let mut settings = SyncwatchSettings::default();
        apply_env_overrides(&mut settings, |key| {
            (key == "SYNCWATCH_PORT").then(|| "eight thousand".to_owned())
        });
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn settings_path_is_under_home() {
        let path = settings_path();
        assert!(path.ends_with(".syncwatch/settings.json"));
    }
}
