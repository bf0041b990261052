use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backing-store key the watchlist has always been saved under
pub const DEFAULT_WATCHLIST_KEY: &str = "netflix_watchlist";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_watchlist_key")]
    pub watchlist_key: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_watchlist_key() -> String {
    DEFAULT_WATCHLIST_KEY.to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watchlist_key: default_watchlist_key(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise defaults; env overrides apply either way
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("CINELIST_TMDB_API_KEY").filter(|v| !v.is_empty()) {
            self.tmdb.api_key = api_key;
        }
        if let Some(base_url) = lookup("CINELIST_TMDB_BASE_URL").filter(|v| !v.is_empty()) {
            self.tmdb.base_url = base_url;
        }
    }

    /// Checks values this crate owns. The storage key's character set is
    /// enforced by the backing store that turns it into a file name.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.watchlist_key.is_empty() {
            return Err(anyhow::anyhow!("storage.watchlist_key cannot be empty"));
        }

        if self.tmdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("tmdb.timeout_seconds must be greater than zero"));
        }

        Ok(())
    }

    pub fn is_tmdb_configured(&self) -> bool {
        !self.tmdb.api_key.is_empty() && self.tmdb.api_key != "YOUR_API_KEY"
    }
}
