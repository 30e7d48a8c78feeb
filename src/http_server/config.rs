//! HTTP Server Configuration
//!
//! Host, port, database path, and CORS settings, loadable from a JSON
//! file with serde defaults for every field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the SQLite database file (default: "./stocksync.db")
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// CORS allowed origins (default: empty, which allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./stocksync.db")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file. A missing file yields the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("invalid config JSON {}: {}", path.display(), e))
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5001);
        assert_eq!(config.socket_addr(), "0.0.0.0:5001");
    }

    #[test]
    fn test_partial_json_gets_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{"port": 8080}"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.db_path, PathBuf::from("./stocksync.db"));
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = ServerConfig::load(Path::new("/nonexistent/stocksync.json")).unwrap();
        assert_eq!(config.port, 5001);
    }
}
