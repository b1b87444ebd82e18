use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::CutterError;
use crate::platform;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Video database lookup
    pub database: DatabaseConfig,
    /// Host application layout
    pub host: HostConfig,
    /// Tvheadend server
    pub backend: BackendConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

/// Where to look for the host's video database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the versioned database files. Empty means
    /// `<userdata_dir>/Database`.
    pub directory: String,
    /// File name prefix, e.g. `MyVideos`
    pub name_prefix: String,
    /// File name extension, e.g. `.db`
    pub extension: String,
}

/// Host application layout and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Target of `special://home`
    pub home_dir: String,
    /// Target of `special://userdata` and `special://profile`
    pub userdata_dir: String,
    /// JSON-RPC endpoint of the running host
    pub jsonrpc_url: String,
    /// Preferred text encoding. Empty means detect once at load time.
    pub encoding: String,
}

/// Tvheadend recording server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Server host name or address
    pub host: String,
    /// Web interface port
    pub http_port: u16,
    /// Web interface user
    pub username: String,
    /// Web interface password
    pub password: String,
    /// Use `https` instead of `http`
    pub use_https: bool,
    /// Send `username`/`password` as HTTP basic auth. Off by default.
    pub send_credentials: bool,
    /// `limit` sent with the finished-recordings query
    pub finished_limit: u64,
    /// Request timeout; `None` blocks until the backend answers.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Log level and destinations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Optional daily-rolling JSON log file
    pub file_path: Option<String>,
    /// Console format, `json` or `text`
    pub format: String,
}

fn default_home_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.kodi")
}

impl Default for AppConfig {
    fn default() -> Self {
        let home_dir = default_home_dir();
        Self {
            database: DatabaseConfig {
                directory: String::new(),
                name_prefix: "MyVideos".to_string(),
                extension: ".db".to_string(),
            },
            host: HostConfig {
                userdata_dir: format!("{home_dir}/userdata"),
                home_dir,
                jsonrpc_url: "http://localhost:8080/jsonrpc".to_string(),
                encoding: String::new(),
            },
            backend: BackendConfig {
                host: "localhost".to_string(),
                http_port: 9981,
                username: String::new(),
                password: String::new(),
                use_https: false,
                send_credentials: false,
                finished_limit: 999_999,
                timeout_secs: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

fn invalid(reason: &str) -> CutterError {
    CutterError::InvalidConfig(reason.to_string())
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();
        // Start with default values
        for (key, value) in Self::default().default_entries() {
            builder = builder.set_default(key, value)?;
        }

        let config = builder
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("kodi-cutter").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("KODI_CUTTER").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let mut app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        if app_config.host.encoding.is_empty() {
            app_config.host.encoding = platform::preferred_encoding();
        }

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::Result<()> {
        // Validate database config
        if self.database.name_prefix.is_empty() {
            return Err(invalid("database name_prefix must not be empty"));
        }
        if self.database.extension.is_empty() {
            return Err(invalid("database extension must not be empty"));
        }

        // Validate backend config
        if self.backend.host.trim().is_empty() {
            return Err(invalid("backend host must not be empty"));
        }
        if self.backend.http_port == 0 {
            return Err(invalid("backend http_port must be greater than 0"));
        }
        if self.backend.finished_limit == 0 {
            return Err(invalid("backend finished_limit must be greater than 0"));
        }
        if self.backend.timeout_secs == Some(0) {
            return Err(invalid("backend timeout_secs must be greater than 0 when set"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(CutterError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(CutterError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            )));
        }

        Ok(())
    }

    /// Directory holding the video database files
    pub fn database_dir(&self) -> PathBuf {
        if self.database.directory.is_empty() {
            PathBuf::from(&self.host.userdata_dir).join("Database")
        } else {
            PathBuf::from(&self.database.directory)
        }
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Flatten the configuration into dotted key-value pairs for `set_default`
    fn default_entries(self) -> HashMap<String, config::Value> {
        let mut map = HashMap::new();

        map.insert("database.directory".to_string(), config::Value::from(self.database.directory));
        map.insert("database.name_prefix".to_string(), config::Value::from(self.database.name_prefix));
        map.insert("database.extension".to_string(), config::Value::from(self.database.extension));

        map.insert("host.home_dir".to_string(), config::Value::from(self.host.home_dir));
        map.insert("host.userdata_dir".to_string(), config::Value::from(self.host.userdata_dir));
        map.insert("host.jsonrpc_url".to_string(), config::Value::from(self.host.jsonrpc_url));
        map.insert("host.encoding".to_string(), config::Value::from(self.host.encoding));

        map.insert("backend.host".to_string(), config::Value::from(self.backend.host));
        map.insert("backend.http_port".to_string(), config::Value::from(u64::from(self.backend.http_port)));
        map.insert("backend.username".to_string(), config::Value::from(self.backend.username));
        map.insert("backend.password".to_string(), config::Value::from(self.backend.password));
        map.insert("backend.use_https".to_string(), config::Value::from(self.backend.use_https));
        map.insert("backend.send_credentials".to_string(), config::Value::from(self.backend.send_credentials));
        map.insert("backend.finished_limit".to_string(), config::Value::from(self.backend.finished_limit));
        if let Some(timeout) = self.backend.timeout_secs {
            map.insert("backend.timeout_secs".to_string(), config::Value::from(timeout));
        }

        map.insert("logging.level".to_string(), config::Value::from(self.logging.level));
        if let Some(file_path) = self.logging.file_path {
            map.insert("logging.file_path".to_string(), config::Value::from(file_path));
        }
        map.insert("logging.format".to_string(), config::Value::from(self.logging.format));

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.database.name_prefix, "MyVideos");
        assert_eq!(config.database.extension, ".db");
        assert_eq!(config.backend.http_port, 9981);
        assert_eq!(config.backend.finished_limit, 999_999);
        assert!(!config.backend.send_credentials);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.backend.http_port = 0;
        assert!(matches!(
            config.validate(),
            Err(CutterError::InvalidConfig(reason)) if reason.contains("http_port")
        ));
    }

    #[test]
    fn test_database_dir_falls_back_to_userdata() {
        let mut config = AppConfig::default();
        config.host.userdata_dir = "/kodi/userdata".to_string();
        assert_eq!(config.database_dir(), PathBuf::from("/kodi/userdata/Database"));

        config.database.directory = "/elsewhere".to_string();
        assert_eq!(config.database_dir(), PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_default_entries_cover_required_keys() {
        let entries = AppConfig::default().default_entries();
        assert!(entries.contains_key("backend.http_port"));
        assert!(entries.contains_key("database.name_prefix"));
        assert!(!entries.contains_key("backend.timeout_secs"));
    }
}
