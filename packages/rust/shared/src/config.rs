//! Application configuration for KitGuide.
//!
//! User config lives at `~/.kitguide/kitguide.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KitGuideError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "kitguide.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".kitguide";

// ---------------------------------------------------------------------------
// Config structs (matching kitguide.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Kit dataset location.
    #[serde(default)]
    pub data: DataConfig,

    /// Extra or replacement classifier keywords, keyed by exact stage name.
    #[serde(default)]
    pub stage_keywords: BTreeMap<String, Vec<String>>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. `"*"` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allow_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

/// `[data]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the kits JSON file.
    #[serde(default = "default_kits_path")]
    pub kits_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            kits_path: default_kits_path(),
        }
    }
}

fn default_kits_path() -> String {
    "data/kits_data.json".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.kitguide/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KitGuideError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.kitguide/kitguide.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KitGuideError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        KitGuideError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| KitGuideError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| KitGuideError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| KitGuideError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("kits_path"));
        assert!(toml_str.contains("cors_allow_origins"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.data.kits_path, "data/kits_data.json");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[server]
port = 9100

[stage_keywords]
"Motor Tuning" = ["pwm", "speed"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.cors_allow_origins, vec!["*".to_string()]);
        assert_eq!(config.stage_keywords["Motor Tuning"], vec!["pwm", "speed"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/kitguide.toml")).unwrap_err();
        assert!(matches!(err, KitGuideError::Io { .. }));
    }

    #[test]
    fn load_invalid_toml_is_config_error() {
        let dir = std::env::temp_dir().join("kitguide-config-test");
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[server\nport = ").expect("write broken config");

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
