use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Per-module color overrides, layered over the built-in taxonomy.
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the snapshot log and session preferences,
    /// relative to the project path.
    pub data_dir: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    server: Option<RawServer>,
    storage: Option<RawStorage>,
    colors: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    data_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            colors: HashMap::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 4400 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".depviz".to_string(),
        }
    }
}

impl Config {
    pub fn load(project_path: &Path) -> Result<Self, ConfigError> {
        let config_path = project_path.join(".depviz.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let raw: RawConfig = toml::from_str(&content)?;

        let server = match raw.server {
            Some(s) => ServerConfig {
                port: s.port.unwrap_or(4400),
            },
            None => ServerConfig::default(),
        };

        let storage = match raw.storage {
            Some(s) => StorageConfig {
                data_dir: s.data_dir.unwrap_or_else(|| ".depviz".to_string()),
            },
            None => StorageConfig::default(),
        };

        Ok(Self {
            server,
            storage,
            colors: raw.colors.unwrap_or_default(),
        })
    }
}

/// Starter config written by `depviz init`.
pub fn generate_config_template() -> String {
    r##"# depviz configuration

[server]
# Port for the visualization server
port = 4400

[storage]
# Directory for the snapshot log and session preferences
data_dir = ".depviz"

# Per-module color overrides (hex). Uncomment to customize.
# [colors]
# CRM = "#e15759"
# HRMS = "#4e79a7"
"##
    .to_string()
}
