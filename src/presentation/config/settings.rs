use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub transfer: TransferSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP__*` variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let configuration = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerSettings {
    pub base_url: String,
    pub app_key: String,
    pub app_secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Oss,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Knobs for one pipeline invocation. Passed by reference, never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    pub key_prefix: String,
    pub resample_part_size_bytes: u64,
    pub direct_part_size_bytes: u64,
    pub split_part_data_bytes: u64,
    pub part_pacing_ms: u64,
    pub url_ttl_secs: u64,
    pub scratch_dir: Option<PathBuf>,
}

impl TransferSettings {
    pub fn part_pacing(&self) -> Duration {
        Duration::from_millis(self.part_pacing_ms)
    }

    pub fn url_ttl(&self) -> Duration {
        Duration::from_secs(self.url_ttl_secs)
    }
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            key_prefix: crate::domain::DEFAULT_KEY_PREFIX.to_string(),
            resample_part_size_bytes: 20 * MIB,
            direct_part_size_bytes: 5 * MIB,
            split_part_data_bytes: 100 * MIB - 44,
            part_pacing_ms: 10,
            url_ttl_secs: 3600,
            scratch_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
