pub mod catalog;
pub mod config;
pub mod theme;
pub mod watchlist;

use std::sync::Arc;

use anyhow::Context;
use cinelist_catalog::{CatalogError, TmdbClient};
use cinelist_config::{Config, PathManager};
use cinelist_store::{validate_key, FileBackingStore, WatchlistStore};

/// Everything a command needs, built once per invocation
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub watchlist: WatchlistStore,
}

impl AppContext {
    pub fn load(paths: PathManager) -> anyhow::Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .with_context(|| format!("Failed to load config from {}", config_file.display()))?;
        config.validate()?;
        validate_key(&config.storage.watchlist_key)?;

        let backing = FileBackingStore::new(paths.data_dir())?;
        let watchlist = WatchlistStore::initialize(Arc::new(backing), config.storage.watchlist_key.clone());

        Ok(Self {
            paths,
            config,
            watchlist,
        })
    }

    pub fn catalog(&self) -> Result<TmdbClient, CatalogError> {
        TmdbClient::new(&self.config.tmdb)
    }

    pub fn image_url(&self, size: &str, path: &str) -> String {
        cinelist_catalog::image_url(&self.config.tmdb.image_base_url, size, path)
    }
}
