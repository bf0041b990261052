use super::*;
use crate::backing::MemoryBackingStore;
use crate::file_store::FileBackingStore;
use std::sync::Mutex;

const KEY: &str = "netflix_watchlist";

fn movie(id: u64, title: &str) -> Title {
    Title {
        id,
        title: Some(title.to_string()),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        backdrop_path: Some(format!("/backdrop-{}.jpg", id)),
        vote_average: 7.5,
        ..Default::default()
    }
}

fn series(id: u64, name: &str) -> Title {
    Title {
        id,
        name: Some(name.to_string()),
        vote_average: 8.0,
        ..Default::default()
    }
}

fn fixed_clock() -> i64 {
    1_700_000_000_000
}

fn empty_store() -> (Arc<MemoryBackingStore>, WatchlistStore) {
    let backing = Arc::new(MemoryBackingStore::new());
    let store = WatchlistStore::initialize(backing.clone(), KEY).with_clock(fixed_clock);
    (backing, store)
}

/// Records every snapshot delivered to an observer
fn recorder() -> (Arc<Mutex<Vec<Vec<WatchlistEntry>>>>, impl Fn(&[WatchlistEntry]) + Send + Sync + 'static) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    (events, move |snapshot: &[WatchlistEntry]| sink.lock().unwrap().push(snapshot.to_vec()))
}

fn ids(entries: &[WatchlistEntry]) -> Vec<u64> {
    entries.iter().map(|e| e.id).collect()
}

#[test]
fn test_fight_club_membership() {
    let (_backing, store) = empty_store();
    let fight_club = Title {
        id: 550,
        title: Some("Fight Club".to_string()),
        poster_path: Some("/p.jpg".to_string()),
        backdrop_path: Some("/b.jpg".to_string()),
        vote_average: 8.4,
        ..Default::default()
    };

    assert!(store.add(&fight_club, TitleKind::Movie).unwrap());
    assert!(store.is_member(550, TitleKind::Movie));
    assert!(!store.is_member(550, TitleKind::Series));

    let entry = &store.snapshot()[0];
    assert_eq!(entry.title, "Fight Club");
    assert_eq!(entry.vote_average, 8.4);
    assert_eq!(entry.added_at, fixed_clock());
}

#[test]
fn test_add_is_idempotent() {
    let (backing, store) = empty_store();
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    let persisted = backing.raw(KEY);

    let (events, observer) = recorder();
    let _subscription = store.subscribe(observer);

    assert!(!store.add(&movie(1, "A again"), TitleKind::Movie).unwrap());
    assert_eq!(store.len(), 1);
    assert_eq!(store.snapshot()[0].title, "A");
    assert_eq!(backing.raw(KEY), persisted);
    // Only the replay, no event for the no-op
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_same_id_different_kind() {
    let (_backing, store) = empty_store();
    store.add(&movie(42, "Movie 42"), TitleKind::Movie).unwrap();
    store.add(&series(42, "Series 42"), TitleKind::Series).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.snapshot()[1].title, "Series 42");
    assert!(store.is_member(42, TitleKind::Movie));
    assert!(store.is_member(42, TitleKind::Series));
}

#[test]
fn test_add_then_remove_is_symmetric() {
    let (_backing, store) = empty_store();
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    let before = store.len();

    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    assert!(store.remove(2, TitleKind::Movie).unwrap());

    assert!(!store.is_member(2, TitleKind::Movie));
    assert_eq!(store.len(), before);
}

#[test]
fn test_remove_first_of_two() {
    let (_backing, store) = empty_store();
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    store.remove(1, TitleKind::Movie).unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "B");
}

#[test]
fn test_remove_preserves_order() {
    let (_backing, store) = empty_store();
    for id in 1..=5 {
        store.add(&movie(id, &format!("Movie {}", id)), TitleKind::Movie).unwrap();
    }
    store.remove(3, TitleKind::Movie).unwrap();
    assert_eq!(ids(&store.snapshot()), vec![1, 2, 4, 5]);
}

#[test]
fn test_remove_absent_is_silent() {
    let (backing, store) = empty_store();
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    let (events, observer) = recorder();
    let _subscription = store.subscribe(observer);

    backing.set_fail_writes(true);
    // Would fail if it tried to write
    assert!(!store.remove(1, TitleKind::Series).unwrap());
    assert!(!store.remove(99, TitleKind::Movie).unwrap());
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_uniqueness_after_mixed_operations() {
    let (_backing, store) = empty_store();
    let kinds = [TitleKind::Movie, TitleKind::Series];
    for round in 0..3u64 {
        for id in 0..6u64 {
            let kind = kinds[((id + round) % 2) as usize];
            store.add(&movie(id, "x"), kind).unwrap();
            if id % 3 == round {
                store.remove(id, kind).unwrap();
            }
        }
    }

    let snapshot = store.snapshot();
    let keys: HashSet<EntryKey> = snapshot.iter().map(|e| e.key()).collect();
    assert_eq!(keys.len(), snapshot.len());
}

#[test]
fn test_mutations_persist_before_notify() {
    let (backing, store) = empty_store();
    let seen_backing = backing.clone();
    let checks = Arc::new(Mutex::new(Vec::new()));
    let sink = checks.clone();

    let _subscription = store.subscribe(move |snapshot: &[WatchlistEntry]| {
        let stored = seen_backing.raw(KEY).unwrap_or_else(|| "[]".to_string());
        let stored: Vec<WatchlistEntry> = serde_json::from_str(&stored).unwrap();
        sink.lock().unwrap().push(stored == snapshot);
    });

    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    store.remove(1, TitleKind::Movie).unwrap();
    store.clear().unwrap();

    let checks = checks.lock().unwrap();
    assert_eq!(checks.len(), 5);
    assert!(checks.iter().all(|matched| *matched));
}

#[test]
fn test_write_failure_rolls_back() {
    let (backing, store) = empty_store();
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    let (events, observer) = recorder();
    let _subscription = store.subscribe(observer);

    backing.set_fail_writes(true);
    assert!(matches!(
        store.add(&movie(2, "B"), TitleKind::Movie),
        Err(StorageError::Write { .. })
    ));
    assert!(store.remove(1, TitleKind::Movie).is_err());
    assert!(store.clear().is_err());

    assert_eq!(ids(&store.snapshot()), vec![1]);
    assert!(!store.is_member(2, TitleKind::Movie));
    assert_eq!(events.lock().unwrap().len(), 1);

    backing.set_fail_writes(false);
    assert!(store.add(&movie(2, "B"), TitleKind::Movie).unwrap());
    assert_eq!(ids(&store.snapshot()), vec![1, 2]);
}

#[test]
fn test_subscribe_replays_current_snapshot() {
    let (_backing, store) = empty_store();
    for id in 1..=3 {
        store.add(&movie(id, "x"), TitleKind::Movie).unwrap();
    }

    let (events, observer) = recorder();
    let _subscription = store.subscribe(observer);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].len(), 3);
}

#[test]
fn test_subscriber_receives_every_publish_in_order() {
    let (_backing, store) = empty_store();
    let (events, observer) = recorder();
    let _subscription = store.subscribe(observer);

    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    store.remove(1, TitleKind::Movie).unwrap();

    let lengths: Vec<Vec<u64>> = events.lock().unwrap().iter().map(|e| ids(e)).collect();
    assert_eq!(lengths, vec![vec![], vec![1], vec![1, 2], vec![2]]);
}

#[test]
fn test_clear_then_subscribe_sees_empty() {
    let (backing, store) = empty_store();
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    store.clear().unwrap();

    assert_eq!(store.len(), 0);
    assert_eq!(backing.raw(KEY).as_deref(), Some("[]"));

    let (events, observer) = recorder();
    let _subscription = store.subscribe(observer);
    assert_eq!(events.lock().unwrap()[0].len(), 0);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let (_backing, store) = empty_store();
    let (events, observer) = recorder();
    let mut subscription = store.subscribe(observer);
    assert_eq!(store.subscriber_count(), 1);

    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    subscription.unsubscribe();
    subscription.unsubscribe();
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();

    assert_eq!(events.lock().unwrap().len(), 2);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_dropping_subscription_unsubscribes() {
    let (_backing, store) = empty_store();
    let (events, observer) = recorder();
    {
        let _subscription = store.subscribe(observer);
    }
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_observer_can_read_store() {
    let backing = Arc::new(MemoryBackingStore::new());
    let store = Arc::new(WatchlistStore::initialize(backing, KEY));
    let reader = Arc::downgrade(&store);
    let memberships = Arc::new(Mutex::new(Vec::new()));
    let sink = memberships.clone();

    let _subscription = store.subscribe(move |_: &[WatchlistEntry]| {
        if let Some(store) = reader.upgrade() {
            sink.lock().unwrap().push(store.is_member(7, TitleKind::Movie));
        }
    });
    store.add(&movie(7, "Seven"), TitleKind::Movie).unwrap();

    assert_eq!(*memberships.lock().unwrap(), vec![false, true]);
}

#[test]
fn test_observer_mutation_is_rejected() {
    let backing = Arc::new(MemoryBackingStore::new());
    let store = Arc::new(WatchlistStore::initialize(backing, KEY));
    let writer = Arc::downgrade(&store);
    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = results.clone();

    let _subscription = store.subscribe(move |_: &[WatchlistEntry]| {
        if let Some(store) = writer.upgrade() {
            let result = store.add(&movie(99, "Nested"), TitleKind::Movie);
            sink.lock().unwrap().push(matches!(result, Err(StorageError::ReentrantMutation)));
        }
    });
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();

    // Once for the replay, once for the add; neither nested add went through
    assert_eq!(*results.lock().unwrap(), vec![true, true]);
    assert_eq!(ids(&store.snapshot()), vec![1]);

    // The guard is released once the outer call returns
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_observer_can_subscribe() {
    let backing = Arc::new(MemoryBackingStore::new());
    let store = Arc::new(WatchlistStore::initialize(backing, KEY));
    let handle = Arc::downgrade(&store);
    let (events, observer) = recorder();
    let observer = Arc::new(observer);
    let nested = Arc::new(Mutex::new(Vec::new()));
    let keep = nested.clone();

    let _outer = store.subscribe(move |_: &[WatchlistEntry]| {
        if let Some(store) = handle.upgrade() {
            if keep.lock().unwrap().is_empty() {
                let observer = observer.clone();
                let subscription = store.subscribe(move |s: &[WatchlistEntry]| (*observer)(s));
                keep.lock().unwrap().push(subscription);
            }
        }
    });
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();

    assert_eq!(store.subscriber_count(), 2);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[0].is_empty());
    assert_eq!(ids(&events[1]), vec![1]);
}

#[test]
fn test_toggle() {
    let (_backing, store) = empty_store();
    let title = movie(10, "Toggle");
    assert!(store.toggle(&title, TitleKind::Movie).unwrap());
    assert!(store.is_member(10, TitleKind::Movie));
    assert!(!store.toggle(&title, TitleKind::Movie).unwrap());
    assert!(store.is_empty());
}

#[test]
fn test_initialize_restores_persisted_order() {
    let (backing, store) = empty_store();
    store.add(&movie(3, "C"), TitleKind::Movie).unwrap();
    store.add(&series(1, "A"), TitleKind::Series).unwrap();
    store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    let original = store.snapshot();

    let reloaded = WatchlistStore::initialize(backing, KEY);
    assert_eq!(reloaded.snapshot(), original);
}

#[test]
fn test_initialize_reads_prior_session_layout() {
    let stored = r#"[
        {"id":550,"type":"movie","title":"Fight Club","poster_path":"/p.jpg","backdrop_path":"/b.jpg","vote_average":8.4,"addedAt":1700000000000},
        {"id":1399,"type":"tv","title":"Game of Thrones","poster_path":"/g.jpg","backdrop_path":"/h.jpg","vote_average":8.5,"addedAt":1700000000500}
    ]"#;
    let backing = Arc::new(MemoryBackingStore::with_value(KEY, stored));
    let store = WatchlistStore::initialize(backing, KEY);

    assert_eq!(store.len(), 2);
    assert!(store.is_member(1399, TitleKind::Series));
    assert_eq!(store.snapshot()[1].added_at, 1_700_000_000_500);
}

#[test]
fn test_initialize_keeps_entries_with_null_fields() {
    let stored = r#"[
        {"id":550,"type":"movie","title":"Fight Club","poster_path":"/p.jpg","backdrop_path":"/b.jpg","vote_average":8.4,"addedAt":1},
        {"id":7,"type":"movie","poster_path":null,"backdrop_path":null,"vote_average":null,"addedAt":2}
    ]"#;
    let backing = Arc::new(MemoryBackingStore::with_value(KEY, stored));
    let store = WatchlistStore::initialize(backing.clone(), KEY);

    assert_eq!(ids(&store.snapshot()), vec![550, 7]);
    assert_eq!(store.snapshot()[1].vote_average, 0.0);

    // The next write keeps both prior entries
    store.add(&movie(3, "C"), TitleKind::Movie).unwrap();
    let stored: Vec<WatchlistEntry> = serde_json::from_str(&backing.raw(KEY).unwrap()).unwrap();
    assert_eq!(ids(&stored), vec![550, 7, 3]);
}

#[test]
fn test_initialize_skips_only_unreadable_elements() {
    let stored = r#"[
        {"id":550,"type":"movie","title":"Fight Club","vote_average":8.4,"addedAt":1},
        {"id":"not-a-number","type":"movie"},
        42,
        {"id":1399,"type":"tv","title":"Game of Thrones","vote_average":8.5,"addedAt":3}
    ]"#;
    let backing = Arc::new(MemoryBackingStore::with_value(KEY, stored));
    let store = WatchlistStore::initialize(backing, KEY);
    assert_eq!(ids(&store.snapshot()), vec![550, 1399]);
}

#[test]
fn test_initialize_fails_open_on_garbage() {
    let backing = Arc::new(MemoryBackingStore::with_value(KEY, "{not json"));
    let store = WatchlistStore::initialize(backing.clone(), KEY);
    assert!(store.is_empty());

    // The store stays usable and overwrites the corrupt blob on the next write
    store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
    let stored: Vec<WatchlistEntry> = serde_json::from_str(&backing.raw(KEY).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn test_initialize_from_file_backing_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let backing = Arc::new(FileBackingStore::new(dir.path()).unwrap());
    {
        let store = WatchlistStore::initialize(backing.clone(), KEY);
        store.add(&movie(1, "A"), TitleKind::Movie).unwrap();
        store.add(&movie(2, "B"), TitleKind::Movie).unwrap();
    }

    let reopened = WatchlistStore::initialize(backing, KEY);
    assert_eq!(ids(&reopened.snapshot()), vec![1, 2]);
}

#[test]
fn test_initialize_with_unusable_key_starts_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let backing = Arc::new(FileBackingStore::new(dir.path()).unwrap());
    let store = WatchlistStore::initialize(backing, "../escape");
    assert!(store.is_empty());
    assert!(matches!(
        store.add(&movie(1, "A"), TitleKind::Movie),
        Err(StorageError::InvalidKey(_))
    ));
}

#[test]
fn test_decode_watchlist_branches() {
    assert!(matches!(decode_watchlist(None), LoadOutcome::Fallback(FallbackReason::Missing)));
    assert!(matches!(decode_watchlist(Some("")), LoadOutcome::Fallback(FallbackReason::Missing)));
    assert!(matches!(decode_watchlist(Some("   ")), LoadOutcome::Fallback(FallbackReason::Corrupt(_))));
    assert!(matches!(decode_watchlist(Some("{}")), LoadOutcome::Fallback(FallbackReason::Corrupt(_))));
    assert!(matches!(decode_watchlist(Some("null")), LoadOutcome::Fallback(FallbackReason::Corrupt(_))));
    assert!(matches!(decode_watchlist(Some("[]")), LoadOutcome::Restored(ref e) if e.is_empty()));
}

#[test]
fn test_decode_watchlist_drops_duplicates() {
    let stored = r#"[
        {"id":1,"type":"movie","title":"first","vote_average":1.0,"addedAt":1},
        {"id":1,"type":"tv","title":"series","vote_average":1.0,"addedAt":2},
        {"id":1,"type":"movie","title":"second","vote_average":1.0,"addedAt":3}
    ]"#;
    let entries = decode_watchlist(Some(stored)).into_entries();
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "series"]);
}
