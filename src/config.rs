//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\coverpick\config.toml
//! - macOS: ~/Library/Application Support/coverpick/config.toml
//! - Linux: ~/.config/coverpick/config.toml
//!
//! A default file is written on first run so the settings are discoverable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Picker window settings
    pub display: DisplayConfig,

    /// Artwork provider settings
    pub provider: ProviderConfig,

    /// Thumbnail cache settings
    pub cache: CacheConfig,
}

/// Picker window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Edge length of a thumbnail in pixels (also the requested rendition)
    pub thumbnail_size: u32,

    /// Initial window width
    pub viewport_width: u32,

    /// Initial window height
    pub viewport_height: u32,

    /// Delay before closing after every file was saved
    pub autoclose_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 250,
            viewport_width: 1280,
            viewport_height: 800,
            autoclose_secs: 3,
        }
    }
}

/// Artwork provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Search API root
    pub base_url: String,

    /// Store country code
    pub country: String,

    /// Maximum number of results per search
    pub limit: u32,

    /// Edge length of the embedded artwork in pixels
    pub download_size: u32,

    /// HTTP timeout for searches and downloads
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            country: "US".to_string(),
            limit: 50,
            download_size: 1000,
            request_timeout_secs: 15,
        }
    }
}

/// Thumbnail cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of decoded thumbnails kept in memory
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl Config {
    /// Thumbnail cache capacity, never smaller than one page of results.
    ///
    /// A cache that cannot hold every visible candidate evicts entries that
    /// are still loading, and their tiles never leave the placeholder.
    pub fn thumbnail_capacity(&self) -> usize {
        self.cache.capacity.max(self.provider.limit as usize).max(1)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("coverpick"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location, writing defaults on first run.
///
/// Returns default config if the file can't be read or parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, writing defaults", path);
        let config = Config::default();
        if let Err(e) = save(&config, &path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        return config;
    }

    load_from(&path)
}

/// Load configuration from an explicit path
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the parent directory if it doesn't exist.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[display]"));
        assert!(toml.contains("[provider]"));
        assert!(toml.contains("[cache]"));
    }

    #[test]
    fn test_defaults_match_picker_sizes() {
        let config = Config::default();
        assert_eq!(config.display.thumbnail_size, 250);
        assert_eq!(config.provider.download_size, 1000);
        assert_eq!(config.display.autoclose_secs, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[provider]
country = "GB"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.provider.country, "GB");
        assert_eq!(config.provider.limit, 50);
        assert_eq!(config.display.thumbnail_size, 250);
        assert_eq!(config.cache.capacity, 256);
    }

    #[test]
    fn test_save_and_load_from() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.cache.capacity = 32;
        config.display.autoclose_secs = 0;
        save(&config, &path).unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.cache.capacity, 32);
        assert_eq!(loaded.display.autoclose_secs, 0);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "display = [not toml").unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.display.thumbnail_size, 250);
    }

    #[test]
    fn test_thumbnail_capacity_covers_a_result_page() {
        let mut config = Config::default();
        assert_eq!(config.thumbnail_capacity(), 256);

        config.cache.capacity = 8;
        assert_eq!(config.thumbnail_capacity(), 50);

        config.provider.limit = 0;
        config.cache.capacity = 0;
        assert_eq!(config.thumbnail_capacity(), 1);
    }
}
