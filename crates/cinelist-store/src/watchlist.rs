//! The watchlist store: the user's ordered set of favorited titles.
//!
//! Every mutation writes the whole list to the backing store, then commits it
//! in memory, then notifies observers. A failed write leaves the in-memory
//! list untouched and publishes nothing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use chrono::Utc;
use cinelist_models::{EntryKey, Title, TitleKind, WatchlistEntry};
use tracing::{debug, info, warn};
use crate::backing::BackingStore;
use crate::error::StorageError;
use crate::subscription::{Observer, ObserverRegistry, Subscription};

/// Result of reading the persisted watchlist at startup
#[derive(Debug)]
pub enum LoadOutcome {
    Restored(Vec<WatchlistEntry>),
    Fallback(FallbackReason),
}

#[derive(Debug)]
pub enum FallbackReason {
    /// Nothing stored under the key yet
    Missing,
    Unreadable(StorageError),
    Corrupt(serde_json::Error),
}

impl LoadOutcome {
    pub fn into_entries(self) -> Vec<WatchlistEntry> {
        match self {
            LoadOutcome::Restored(entries) => entries,
            LoadOutcome::Fallback(_) => Vec::new(),
        }
    }
}

/// Decodes a persisted blob. Only an absent or empty value counts as missing;
/// anything else that is not a JSON array is corrupt. Array elements that do
/// not decode as entries are dropped one by one.
pub fn decode_watchlist(raw: Option<&str>) -> LoadOutcome {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return LoadOutcome::Fallback(FallbackReason::Missing),
    };

    let values = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values,
        Err(e) => return LoadOutcome::Fallback(FallbackReason::Corrupt(e)),
    };

    let entries = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<WatchlistEntry>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable watchlist entry at index {}: {}", index, e);
                None
            }
        })
        .collect();

    LoadOutcome::Restored(dedup_by_key(entries))
}

/// Keeps the first occurrence of each (id, kind)
fn dedup_by_key(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let total = entries.len();
    let mut seen: HashSet<EntryKey> = HashSet::with_capacity(total);
    let unique: Vec<WatchlistEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.key()))
        .collect();

    if unique.len() < total {
        warn!(
            "Stored watchlist had {} duplicate entries; keeping first occurrences",
            total - unique.len()
        );
    }
    unique
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the writer lock and records which thread owns it
struct WriterGuard<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
    _lock: MutexGuard<'a, ()>,
}

impl Drop for WriterGuard<'_> {
    fn drop(&mut self) {
        *lock(self.owner) = None;
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Watchlist state shared by everything that shows or edits favorites.
///
/// Construct one per process and pass it by reference. Observers are invoked
/// synchronously on the mutating thread. They may read from the store and
/// subscribe to it; a mutation from inside an observer returns
/// `StorageError::ReentrantMutation`.
pub struct WatchlistStore {
    backing: Arc<dyn BackingStore>,
    key: String,
    entries: Mutex<Vec<WatchlistEntry>>,
    // Serializes mutations and subscriptions so events are delivered in commit order
    writer: Mutex<()>,
    writer_owner: Mutex<Option<ThreadId>>,
    observers: Arc<Mutex<ObserverRegistry>>,
    clock: fn() -> i64,
}

impl WatchlistStore {
    /// Loads the watchlist stored under `key`. Never fails: unreadable or
    /// corrupt data starts an empty watchlist.
    pub fn initialize(backing: Arc<dyn BackingStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let outcome = match backing.get(&key) {
            Ok(raw) => decode_watchlist(raw.as_deref()),
            Err(e) => LoadOutcome::Fallback(FallbackReason::Unreadable(e)),
        };

        match &outcome {
            LoadOutcome::Restored(entries) => {
                info!("Loaded watchlist '{}' ({} entries)", key, entries.len());
            }
            LoadOutcome::Fallback(FallbackReason::Missing) => {
                debug!("No stored watchlist under '{}', starting empty", key);
            }
            LoadOutcome::Fallback(FallbackReason::Unreadable(e)) => {
                warn!("Failed to read watchlist '{}': {}. Starting with an empty watchlist.", key, e);
            }
            LoadOutcome::Fallback(FallbackReason::Corrupt(e)) => {
                warn!("Error loading watchlist '{}': {}. Starting with an empty watchlist.", key, e);
            }
        }

        Self {
            backing,
            key,
            entries: Mutex::new(outcome.into_entries()),
            writer: Mutex::new(()),
            writer_owner: Mutex::new(None),
            observers: Arc::new(Mutex::new(ObserverRegistry::default())),
            clock: now_millis,
        }
    }

    /// Replaces the timestamp source used for `added_at`
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Adds `candidate` unless an entry with the same id and kind exists.
    /// Returns whether the watchlist changed.
    pub fn add(&self, candidate: &Title, kind: TitleKind) -> Result<bool, StorageError> {
        let added_at = (self.clock)();
        self.mutate(|current| {
            if current.iter().any(|e| e.matches(candidate.id, kind)) {
                debug!("{} {} already in watchlist", kind, candidate.id);
                return None;
            }
            let mut next = current.to_vec();
            next.push(WatchlistEntry::from_title(candidate, kind, added_at));
            Some(next)
        })
    }

    /// Removes the matching entry. Removing something absent neither writes
    /// nor notifies. Returns whether an entry was removed.
    pub fn remove(&self, id: u64, kind: TitleKind) -> Result<bool, StorageError> {
        self.mutate(|current| {
            if !current.iter().any(|e| e.matches(id, kind)) {
                debug!("{} {} not in watchlist, nothing to remove", kind, id);
                return None;
            }
            Some(
                current
                    .iter()
                    .filter(|e| !e.matches(id, kind))
                    .cloned()
                    .collect(),
            )
        })
    }

    /// Adds when absent, removes when present. Returns the new membership.
    pub fn toggle(&self, candidate: &Title, kind: TitleKind) -> Result<bool, StorageError> {
        let _writer = self.lock_writer_for_mutation()?;
        let present = self.is_member(candidate.id, kind);
        let next: Vec<WatchlistEntry> = {
            let current = lock(&self.entries);
            if present {
                current.iter().filter(|e| !e.matches(candidate.id, kind)).cloned().collect()
            } else {
                let mut next = current.clone();
                next.push(WatchlistEntry::from_title(candidate, kind, (self.clock)()));
                next
            }
        };
        self.commit(next)?;
        Ok(!present)
    }

    /// Empties the watchlist. Always writes and notifies, even when already empty.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.mutate(|_| Some(Vec::new()))?;
        info!("Cleared watchlist '{}'", self.key);
        Ok(())
    }

    pub fn is_member(&self, id: u64, kind: TitleKind) -> bool {
        lock(&self.entries).iter().any(|e| e.matches(id, kind))
    }

    /// Owned copy of the current watchlist, in insertion order
    pub fn snapshot(&self) -> Vec<WatchlistEntry> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Registers `observer` and immediately hands it the current watchlist,
    /// then every watchlist published after that.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&[WatchlistEntry]) + Send + Sync + 'static,
    {
        // From inside an observer this thread already holds the writer lock
        let _writer = (!self.writer_held_here()).then(|| self.lock_writer());
        let observer: Observer = Arc::new(observer);
        let id = lock(&self.observers).register(observer.clone());

        let current = self.snapshot();
        observer(current.as_slice());

        debug!("Watchlist subscriber {} registered", id);
        Subscription::new(id, &self.observers)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.observers).len()
    }

    /// Runs `change` against the current list; `None` means nothing to do
    fn mutate<F>(&self, change: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&[WatchlistEntry]) -> Option<Vec<WatchlistEntry>>,
    {
        let _writer = self.lock_writer_for_mutation()?;
        let next = {
            let current = lock(&self.entries);
            match change(current.as_slice()) {
                Some(next) => next,
                None => return Ok(false),
            }
        };
        self.commit(next)?;
        Ok(true)
    }

    fn writer_held_here(&self) -> bool {
        *lock(&self.writer_owner) == Some(thread::current().id())
    }

    fn lock_writer(&self) -> WriterGuard<'_> {
        let guard = lock(&self.writer);
        *lock(&self.writer_owner) = Some(thread::current().id());
        WriterGuard {
            owner: &self.writer_owner,
            _lock: guard,
        }
    }

    /// Fails instead of deadlocking when called from one of this store's observers
    fn lock_writer_for_mutation(&self) -> Result<WriterGuard<'_>, StorageError> {
        if self.writer_held_here() {
            warn!("Watchlist '{}' mutated from inside an observer; ignoring", self.key);
            return Err(StorageError::ReentrantMutation);
        }
        Ok(self.lock_writer())
    }

    /// Persist, then swap in memory, then publish. Callers hold the writer lock.
    fn commit(&self, next: Vec<WatchlistEntry>) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&next)?;
        if let Err(e) = self.backing.set(&self.key, &serialized) {
            warn!("Failed to save watchlist '{}': {}", self.key, e);
            return Err(e);
        }

        *lock(&self.entries) = next.clone();
        debug!("Saved watchlist '{}' ({} entries)", self.key, next.len());

        self.publish(&next);
        Ok(())
    }

    fn publish(&self, snapshot: &[WatchlistEntry]) {
        // Clone the observer list so callbacks run without holding the registry lock
        let observers = lock(&self.observers).observers();
        for observer in observers {
            observer(snapshot);
        }
    }
}

#[cfg(test)]
mod tests;
