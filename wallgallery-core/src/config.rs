//! Gallery configuration (config.yaml) and platform directories
//!
//! Resolution order for the config file:
//! 1. CLI override (if provided)
//! 2. Platform-specific user config directory
//! 3. Built-in defaults when no file exists

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::query::SearchKey;

/// Default cache TTL (15 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

/// Default fuzzy match threshold
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.7;

/// Locations of the three catalog endpoints
///
/// Values are `http(s)://` URLs or filesystem paths (`file://` optional).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub wallpapers: String,
    pub categories: String,
    pub packs: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            wallpapers: "public/wallpapers.json".to_string(),
            categories: "public/categories.json".to_string(),
            packs: "public/packs.json".to_string(),
        }
    }
}

/// Fuzzy search tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum relevance in `(0, 1]` for an item to match
    pub threshold: f64,

    /// Wallpaper fields searched, in priority order
    pub keys: Vec<SearchKey>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SEARCH_THRESHOLD,
            keys: SearchKey::ALL.to_vec(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub endpoints: EndpointConfig,

    /// Seconds a remote response stays cached; 0 disables caching
    pub cache_ttl_secs: u64,

    pub search: SearchConfig,

    /// Directory for downloads when none is given on the command line
    pub download_dir: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            search: SearchConfig::default(),
            download_dir: None,
        }
    }
}

impl GalleryConfig {
    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content).context("Invalid config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to serialize config")
    }

    /// Save configuration, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.search.threshold > 0.0 && self.search.threshold <= 1.0) {
            anyhow::bail!(
                "search.threshold must be in (0, 1], got {}",
                self.search.threshold
            );
        }

        if self.search.keys.is_empty() {
            anyhow::bail!("search.keys must list at least one field");
        }

        for (name, value) in [
            ("wallpapers", &self.endpoints.wallpapers),
            ("categories", &self.endpoints.categories),
            ("packs", &self.endpoints.packs),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("endpoints.{} must not be empty", name);
            }
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Where downloads go: the configured directory, else the platform
    /// download folder, else the working directory
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Platform directories used by the gallery
#[derive(Debug, Clone)]
pub struct GalleryPaths {
    /// config.yaml location
    pub config_file: PathBuf,
    /// Persistent data (session file)
    pub data_dir: PathBuf,
    /// Cached endpoint responses
    pub cache_dir: PathBuf,
}

impl GalleryPaths {
    /// Discover paths using platform conventions
    pub fn discover() -> Result<Self> {
        if let Some(dirs) = directories::ProjectDirs::from("app", "wallgallery", "wallgallery") {
            return Ok(Self {
                config_file: dirs.config_dir().join("config.yaml"),
                data_dir: dirs.data_dir().to_path_buf(),
                cache_dir: dirs.cache_dir().to_path_buf(),
            });
        }

        let config_dir = dirs::config_dir()
            .map(|d| d.join("wallgallery"))
            .context("Could not determine config directory")?;

        Ok(Self::rooted_at(&config_dir))
    }

    /// All paths under a single root directory
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            data_dir: root.join("data"),
            cache_dir: root.join("cache"),
        }
    }

    /// Location of the persisted session state
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}
