pub mod config;
pub mod paths;

pub use config::{Config, StorageConfig, TmdbConfig, DEFAULT_WATCHLIST_KEY};
pub use paths::{PathManager, home_override};
