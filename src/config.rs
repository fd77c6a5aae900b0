use crate::model::MouseActionsMapping;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Organisation unit metadata export read by the country repository
    pub metadata_path: String,
    /// Roots of the country selector tree (empty means every level 1 unit)
    #[serde(default)]
    pub root_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub enable_multiple_action: bool,
    #[serde(default)]
    pub mouse_actions: MouseActionsMapping,
    /// Route opened on startup
    #[serde(default = "default_route")]
    pub initial_route: String,
}

fn default_true() -> bool {
    true
}

fn default_route() -> String {
    "/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_path: "demos/metadata.json".to_string(),
            root_ids: Vec::new(),
            enable_multiple_action: true,
            mouse_actions: MouseActionsMapping::default(),
            initial_route: default_route(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".dq-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring invalid config {}: {}", config_path.display(), e);
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }
}
