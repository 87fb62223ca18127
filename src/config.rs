//! Configuration management for cinegrid
//!
//! Config file loading and API key resolution.
//! Config is stored at ~/.config/cinegrid/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::tmdb::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_LANGUAGE};
use crate::api::TmdbClient;
use crate::storage::FileStorage;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No TMDB API key configured (set TMDB_API_KEY or tmdb_api_key in config.toml)")]
    MissingApiKey,

    #[error("Could not determine a data directory")]
    NoDataDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// Response language, e.g. "en-US"
    pub language: Option<String>,
    /// Override the TMDB API base URL
    pub api_base_url: Option<String>,
    /// Override the image CDN base URL
    pub image_base_url: Option<String>,
    /// Where durable state and logs live
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/cinegrid/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinegrid").join("config.toml"))
    }

    /// Load config from the default path; no config directory or file yields defaults
    pub fn load() -> std::result::Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> std::result::Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn api_key(&self) -> std::result::Result<String, ConfigError> {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.tmdb_api_key.as_deref())
    }

    fn resolve_api_key(
        env: Option<String>,
        configured: Option<&str>,
    ) -> std::result::Result<String, ConfigError> {
        env.filter(|k| !k.trim().is_empty())
            .or_else(|| {
                configured
                    .filter(|k| !k.trim().is_empty())
                    .map(str::to_string)
            })
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Durable state directory (defaults to ~/.local/share/cinegrid)
    pub fn data_dir(&self) -> std::result::Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|p| p.join("cinegrid"))
                .ok_or(ConfigError::NoDataDir),
        }
    }

    /// Build a catalog client from this config
    pub fn client(&self) -> std::result::Result<TmdbClient, ConfigError> {
        let key = self.api_key()?;
        let base_url = self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let image_base_url = self
            .image_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_BASE_URL);

        Ok(TmdbClient::with_base_url(key, base_url)
            .with_language(self.language())
            .with_image_base_url(image_base_url))
    }

    /// Open the durable storage under the data directory
    pub fn storage(&self) -> Result<FileStorage> {
        Ok(FileStorage::new(self.data_dir()?)?)
    }
}
