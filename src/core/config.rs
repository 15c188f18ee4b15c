//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hobd/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::position::{DEFAULT_LANGUAGE, LessonId};
use crate::core::storage::default_store_path;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HobdConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Language used when no progress has been saved yet.
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ContentConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Store file, relative to `~/.hobd/` unless absolute.
    pub path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://www.e-hobd.ncdigital.co.za";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Start-of-session position overrides from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartOverrides {
    pub language: Option<String>,
    pub lesson: Option<LessonId>,
    pub day: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub default_language: String,
    /// `None` keeps storage in memory only.
    pub store_path: Option<PathBuf>,
    pub start: StartOverrides,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

fn hobd_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hobd"))
}

/// Returns the path to `~/.hobd/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    hobd_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.hobd/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HobdConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<HobdConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HobdConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HobdConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: HobdConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# hobd configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# language = "en"                  # Used until progress has been saved

# [content]
# base_url = "https://www.e-hobd.ncdigital.co.za"   # Or set HOBD_BASE_URL

# [storage]
# path = "storage.json"            # Relative to ~/.hobd/
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HobdConfig, cli_base_url: Option<&str>, start: StartOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("HOBD_BASE_URL").ok())
        .or_else(|| config.content.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Fallback language: env → config → default
    let default_language = std::env::var("HOBD_LANGUAGE")
        .ok()
        .or_else(|| config.general.language.clone())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    ResolvedConfig {
        base_url,
        default_language,
        store_path: resolve_store_path(config),
        start,
    }
}

fn resolve_store_path(config: &HobdConfig) -> Option<PathBuf> {
    match config.storage.path.as_deref() {
        Some(p) if Path::new(p).is_absolute() => Some(PathBuf::from(p)),
        Some(p) => hobd_dir().map(|d| d.join(p)),
        None => default_store_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = HobdConfig::default();
        assert!(config.general.language.is_none());
        assert!(config.content.base_url.is_none());
    }

    #[test]
    fn test_resolve_cli_base_url_wins() {
        let config = HobdConfig {
            content: ContentConfig {
                base_url: Some("https://from-config.example".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://localhost:8000"), StartOverrides::default());
        assert_eq!(resolved.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_resolve_keeps_start_overrides() {
        let start = StartOverrides {
            language: Some("af".to_string()),
            lesson: Some(LessonId::from_number(4)),
            day: Some(2),
        };
        let resolved = resolve(&HobdConfig::default(), None, start.clone());
        assert_eq!(resolved.start, start);
    }

    #[test]
    fn test_absolute_store_path_used_verbatim() {
        let config = HobdConfig {
            storage: StorageConfig {
                path: Some("/tmp/hobd-test/store.json".to_string()),
            },
            ..Default::default()
        };
        assert_eq!(
            resolve_store_path(&config),
            Some(PathBuf::from("/tmp/hobd-test/store.json"))
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
language = "af"

[content]
base_url = "http://192.168.1.100:8080"

[storage]
path = "progress.json"
"#;
        let config: HobdConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.language.as_deref(), Some("af"));
        assert_eq!(
            config.content.base_url.as_deref(),
            Some("http://192.168.1.100:8080")
        );
        assert_eq!(config.storage.path.as_deref(), Some("progress.json"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[general]
language = "pt"
"#;
        let config: HobdConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.language.as_deref(), Some("pt"));
        assert!(config.content.base_url.is_none());
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let result: Result<HobdConfig, _> = toml::from_str("[general\nlanguage = ");
        assert!(result.is_err());
    }
}
