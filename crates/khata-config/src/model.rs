use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Stores user-configurable preferences and sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_collection")]
    pub collection: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Cooldown between connectivity-restored drains, in milliseconds.
    #[serde(default = "Config::default_reconnect_debounce_ms")]
    pub reconnect_debounce_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for the local cache. Defaults to the
    /// platform data directory.
    pub cache_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collection: Self::default_collection(),
            currency: Self::default_currency(),
            reconnect_debounce_ms: Self::default_reconnect_debounce_ms(),
            cache_root: None,
        }
    }
}

impl Config {
    pub fn default_collection() -> String {
        "transactions".into()
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_reconnect_debounce_ms() -> u64 {
        2_000
    }

    pub fn reconnect_debounce(&self) -> Duration {
        Duration::from_millis(self.reconnect_debounce_ms)
    }

    pub fn resolve_cache_root(&self) -> PathBuf {
        if let Some(path) = &self.cache_root {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("khata").join("cache")
    }
}
