use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_originals_path")]
    pub originals_dir: PathBuf,

    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    #[serde(default = "default_thumbnail_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_width")]
    pub max_width: u32,

    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// WebP encoder quality (0-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_thumbnail_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("picdex/thumbnails")
}

fn default_max_width() -> u32 {
    150
}

fn default_max_height() -> u32 {
    150
}

fn default_quality() -> u8 {
    80
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            path: default_thumbnail_path(),
            max_width: default_max_width(),
            max_height: default_max_height(),
            quality: default_quality(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("picdex")
        .join("picdex.db")
}

fn default_originals_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("picdex")
        .join("originals")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            originals_dir: default_originals_path(),
            thumbnails: ThumbnailConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("picdex")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
