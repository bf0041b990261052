pub mod backing;
pub mod error;
pub mod file_store;
pub mod subscription;
pub mod watchlist;

pub use backing::{validate_key, BackingStore, MemoryBackingStore};
pub use error::StorageError;
pub use file_store::FileBackingStore;
pub use subscription::Subscription;
pub use watchlist::{decode_watchlist, FallbackReason, LoadOutcome, WatchlistStore};
