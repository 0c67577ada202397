use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_IMAGE_HISTORY_LIMIT: usize = 5;

/// Configuration for staykeep, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Image snapshots kept per listing. 0 disables snapshots.
    #[serde(default = "default_image_history_limit")]
    pub image_history_limit: usize,

    /// Run listings recovered from the backup copy through the normalizer.
    #[serde(default)]
    pub normalize_backup: bool,

    /// JSON file with seed listings, replacing the built-in dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

fn default_image_history_limit() -> usize {
    DEFAULT_IMAGE_HISTORY_LIMIT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            image_history_limit: DEFAULT_IMAGE_HISTORY_LIMIT,
            normalize_backup: false,
            seed_file: None,
        }
    }
}

impl StoreConfig {
    pub const KEYS: [&'static str; 3] = ["image-history-limit", "normalize-backup", "seed-file"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(StoreError::Io)?;
        let config: StoreConfig =
            serde_json::from_str(&content).map_err(StoreError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(StoreError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(StoreError::Serialization)?;
        fs::write(config_path, content).map_err(StoreError::Io)?;
        Ok(())
    }

    /// Display value for a kebab-case key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "image-history-limit" => Some(self.image_history_limit.to_string()),
            "normalize-backup" => Some(self.normalize_backup.to_string()),
            "seed-file" => Some(
                self.seed_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(built-in)".to_string()),
            ),
            _ => None,
        }
    }

    /// Set a kebab-case key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "image-history-limit" => {
                self.image_history_limit = value
                    .parse()
                    .map_err(|_| format!("Invalid value for {}: {}", key, value))?;
            }
            "normalize-backup" => {
                self.normalize_backup = value
                    .parse()
                    .map_err(|_| format!("Invalid value for {}: {} (use true/false)", key, value))?;
            }
            "seed-file" => {
                self.seed_file = match value {
                    "" | "builtin" | "none" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}
