use crate::presentation::config::LoggingSettings;

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_level: String,
}

impl TracingConfig {
    /// Settings-file values, overridden by `LOG_FORMAT=json` when set.
    pub fn from_settings(environment: &str, logging: &LoggingSettings) -> Self {
        let json_format = std::env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(logging.enable_json);

        Self {
            environment: environment.to_string(),
            json_format,
            default_level: logging.level.clone(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_level: "info".to_string(),
        }
    }
}
