//! Viewer settings and preferences
//!
//! Persisted in LocalStorage. Only preferences are stored here; impulses are
//! never saved.

use serde::{Deserialize, Serialize};

use crate::sim::{ColorMode, CombinePolicy};
use crate::tuning::WaveTuning;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Color mode new impulses start with
    pub color_mode: ColorMode,
    /// How overlapping waves combine at a cell
    pub combine: CombinePolicy,
    /// Wave constants
    pub tuning: WaveTuning,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "halftone_waves_settings";

    /// Parse settings JSON; rejects tunings that fail validation
    pub fn from_json(json: &str) -> Option<Self> {
        let settings: Settings = match serde_json::from_str(json) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Stored settings unreadable: {}", e);
                return None;
            }
        };
        if let Err(e) = settings.tuning.validate() {
            log::warn!("Stored settings rejected: {}", e);
            return None;
        }
        Some(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Failed to save settings: {:?}", e),
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
