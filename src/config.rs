//! Application configuration.
//!
//! Sources, lowest priority first:
//! 1. Hardcoded defaults
//! 2. `config.toml` in the user config directory, or the file named by
//!    `WATCHLIST_CONFIG`
//! 3. Environment variables, e.g. `WATCHLIST__API__API_KEY`

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::errors::Result;

const APP_DIR: &str = "movie-watchlist";
const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

/// Movie database endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Appended to every request as the `apikey` query parameter
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the database location under the user data directory
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Words of the plot shown before "Show More"
    pub plot_preview_words: usize,
    /// Number of stars in the rating widget
    pub max_rating: u8,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            plot_preview_words: 20,
            max_rating: 10,
        }
    }
}

impl AppConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self> {
        let path = env::var_os("WATCHLIST_CONFIG")
            .map(PathBuf::from)
            .or_else(Self::default_path);
        Self::load_from(path.as_deref())
    }

    /// Load from an explicit (optional) file and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("WATCHLIST")
                .separator("__")
                .ignore_empty(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// `<config_dir>/movie-watchlist/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(APP_DIR);
            path.push("config.toml");
            path
        })
    }

    /// Database location: the configured path, or
    /// `<data_dir>/movie-watchlist/watchlist.db`
    pub fn db_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.storage.db_path {
            return Some(path.clone());
        }

        dirs::data_dir()
            .or_else(dirs::home_dir)
            .map(|mut path| {
                path.push(APP_DIR);
                path.push("watchlist.db");
                path
            })
    }
}
