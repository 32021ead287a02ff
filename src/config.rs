use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// Tuning knobs for pagination and the client-side fetch cap. Loaded from
/// `~/.config/knowledge-catalog/config.toml` when present, defaults
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Tab token used when the persisted state names no tab (or an
    /// unknown one).
    pub default_tab: String,
    /// Page size used when the persisted state carries none.
    pub default_page_size: u32,
    /// Hard upper bound for a requested page size.
    pub max_page_size: u32,
    /// Row cap for the bounded superset fetched when filtering must
    /// happen client-side.
    pub superset_cap: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_tab: "primary-content".to_string(),
            default_page_size: 12,
            max_page_size: 200,
            superset_cap: 1000,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from the user config directory.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("knowledge-catalog").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
