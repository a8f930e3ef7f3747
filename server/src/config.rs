//! Server configuration.
//!
//! Values resolve with priority: environment variables > config file >
//! defaults. The config file is YAML:
//! ```yaml
//! port: 3001
//! data_file: todos.json
//! allowed_origin: "http://localhost:3000"
//! ```
//! Environment overrides: `TODO_PORT`, `TODO_DATA_FILE`,
//! `TODO_ALLOWED_ORIGIN`. `TODO_CONFIG` points at an alternate config
//! file and is handled by the binary.

use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Path to the JSON store file.
    pub data_file: PathBuf,
    /// Browser origin allowed by CORS.
    pub allowed_origin: String,
    /// Config file that was loaded, if any.
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    port: Option<u16>,
    data_file: Option<PathBuf>,
    allowed_origin: Option<String>,
}

impl Config {
    /// Load configuration, reading `config_path` (or the default location)
    /// when it exists and applying environment overrides on top.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut port = DEFAULT_PORT;
        let mut data_file = Self::default_data_file();
        let mut allowed_origin = DEFAULT_ALLOWED_ORIGIN.to_string();
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(p) = file.port {
                port = p;
            }
            if let Some(f) = file.data_file {
                // Resolve relative paths against the config file's directory
                data_file = if f.is_relative() {
                    path.parent().map(|p| p.join(&f)).unwrap_or(f)
                } else {
                    f
                };
            }
            if let Some(origin) = file.allowed_origin {
                allowed_origin = origin;
            }
            config_file = Some(path);
        }

        if let Some(p) = std::env::var("TODO_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            port = p;
        }
        if let Ok(f) = std::env::var("TODO_DATA_FILE") {
            data_file = PathBuf::from(f);
        }
        if let Ok(origin) = std::env::var("TODO_ALLOWED_ORIGIN") {
            allowed_origin = origin;
        }

        Ok(Self {
            port,
            data_file,
            allowed_origin,
            config_file,
        })
    }

    /// Default store file (platform-specific data dir + todo-server/todos.json).
    pub fn default_data_file() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todo-server")
            .join("todos.json")
    }

    /// Default config file (platform-specific config dir + todo-server/config.yaml).
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("todo-server")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
