//! # syncwatch-settings
//!
//! Layered configuration for the syncwatch coordination service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`SyncwatchSettings::default()`]
//! 2. **User file** — `~/.syncwatch/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `SYNCWATCH_*` overrides (highest priority)
//!
//! The process-wide singleton is populated lazily on first access and can be
//! seeded explicitly at startup (or in tests) with [`init_settings`].

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::{Arc, RwLock};

/// Process-wide settings cache.
///
/// `RwLock<Option<Arc<..>>>` so the value can be seeded or replaced after
/// startup; reads are a shared lock plus an `Arc` clone.
static SETTINGS: RwLock<Option<Arc<SyncwatchSettings>>> = RwLock::new(None);

/// Get the process-wide settings.
///
/// First access loads from `~/.syncwatch/settings.json` with env overrides;
/// a failed load logs a warning and falls back to compiled defaults. Callers
/// get an `Arc` snapshot that stays consistent even if the singleton is
/// re-seeded concurrently.
pub fn get_settings() -> Arc<SyncwatchSettings> {
    {
        let guard = SETTINGS.read().expect("settings lock poisoned");
        if let Some(ref settings) = *guard {
            return Arc::clone(settings);
        }
    }

    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    // Another thread may have initialized while we waited for the write lock.
    if let Some(ref settings) = *guard {
        return Arc::clone(settings);
    }

    let settings = Arc::new(match load_settings() {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::warn!(error = %error, "failed to load settings, using defaults");
            SyncwatchSettings::default()
        }
    });
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Seed the process-wide settings with a specific value.
///
/// Replaces any previously cached value. Used by the binary after parsing
/// CLI overrides, and by tests.
pub fn init_settings(settings: SyncwatchSettings) {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = Some(Arc::new(settings));
}

#[cfg(test)]
pub(crate) fn reset_settings() {
    let mut guard = SETTINGS.write().expect("settings lock poisoned");
    *guard = None;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
