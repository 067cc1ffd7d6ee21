//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod logging;
pub mod realtime;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`CHATHUB__REALTIME__QUEUE_CAPACITY`).
const ENV_PREFIX: &str = "CHATHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Real-time hub settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `{config_dir}/default.toml` with `{config_dir}/{env}.toml` and
    /// environment variables prefixed with `CHATHUB__`. Missing files are
    /// skipped.
    pub fn load(config_dir: impl AsRef<Path>, env: &str) -> Result<Self, AppError> {
        let dir = config_dir.as_ref();
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join(env)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        tracing::debug!(dir = %dir.display(), env = %env, "Configuration loaded");
        Ok(loaded)
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if self.realtime.queue_capacity == 0 {
            return Err(AppError::configuration(
                "realtime.queue_capacity must be greater than zero",
            ));
        }
        if self.realtime.dedup_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "realtime.dedup_ttl_seconds must be greater than zero",
            ));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::configuration(format!(
                "logging.format must be \"json\" or \"pretty\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_missing_secret_rejected() {
        let err = AppConfig::default().validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = valid();
        config.realtime.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dedup_ttl_rejected() {
        let mut config = valid();
        config.realtime.dedup_ttl_seconds = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = valid();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
        config.logging.format = "pretty".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reads_toml_sections() {
        let dir = std::env::temp_dir().join(format!("chathub-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(
            dir.join("default.toml"),
            "[auth]\njwt_secret = \"from-file\"\n\n[realtime]\nqueue_capacity = 8\n",
        )
        .expect("write default");
        std::fs::write(dir.join("test.toml"), "[server]\nport = 9191\n").expect("write overlay");

        let config = AppConfig::load(&dir, "test").expect("load");
        assert_eq!(config.auth.jwt_secret, "from-file");
        assert_eq!(config.realtime.queue_capacity, 8);
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.realtime.dedup_ttl_seconds, 60);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
