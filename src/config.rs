//! Storage configuration
//!
//! Settings come from `config/config.toml` (optional, `[storage]` table)
//! overlaid with `PLANTLOG__STORAGE__*` environment variables, e.g.
//! `PLANTLOG__STORAGE__DATA_DIR=/srv/plant`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::overlay::DEFAULT_STRIDE;

const CONFIG_FILE: &str = "config/config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_roll_file")]
    pub roll_file: String,
    #[serde(default = "default_bath_file")]
    pub bath_file: String,
    #[serde(default = "default_leveller_file")]
    pub leveller_file: String,
    /// Marker spacing on the floor-plan overlay
    #[serde(default = "default_overlay_stride")]
    pub overlay_stride: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            roll_file: default_roll_file(),
            bath_file: default_bath_file(),
            leveller_file: default_leveller_file(),
            overlay_stride: default_overlay_stride(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_roll_file() -> String {
    "Movimentação_desengraxe.csv".to_string()
}

fn default_bath_file() -> String {
    "equipamentos_banho.csv".to_string()
}

fn default_leveller_file() -> String {
    "TL.csv".to_string()
}

fn default_overlay_stride() -> f64 {
    DEFAULT_STRIDE
}

impl StorageConfig {
    /// Load from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[storage]` section is not an error: every field has a
    /// default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither the file nor the environment can be
    /// read, or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("PLANTLOG").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // The file exists but is unreadable; keep going with env only
                if Path::new(CONFIG_FILE).exists() {
                    log::warn!(
                        "Failed to load {}, falling back to env. Error: {}",
                        CONFIG_FILE,
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix("PLANTLOG").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        match settings.get::<StorageConfig>("storage") {
            Ok(storage) => Ok(storage),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Storage configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }

    /// Same settings rooted at another directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn roll_path(&self) -> PathBuf {
        self.data_dir.join(&self.roll_file)
    }

    #[must_use]
    pub fn bath_path(&self) -> PathBuf {
        self.data_dir.join(&self.bath_file)
    }

    #[must_use]
    pub fn leveller_path(&self) -> PathBuf {
        self.data_dir.join(&self.leveller_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_file_names() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.roll_path(), Path::new("data/Movimentação_desengraxe.csv"));
        assert_eq!(cfg.bath_path(), Path::new("data/equipamentos_banho.csv"));
        assert_eq!(cfg.leveller_path(), Path::new("data/TL.csv"));
        assert_eq!(cfg.overlay_stride, 65.0);
    }

    #[test]
    fn test_with_data_dir() {
        let cfg = StorageConfig::default().with_data_dir("/srv/plant");
        assert_eq!(cfg.leveller_path(), Path::new("/srv/plant/TL.csv"));
    }
}
