use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read '{key}' from storage: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{key}' to storage: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare storage directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    #[error("Watchlist cannot be modified from inside one of its observers")]
    ReentrantMutation,

    #[error("Failed to serialize watchlist: {0}")]
    Serialize(#[from] serde_json::Error),
}
