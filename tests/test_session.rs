use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use sar::session::{MAX_LIFE, SessionStore};

#[test]
fn test_find_unknown_id_creates_fresh_session() {
    let store = SessionStore::new();

    let session = store.find("not-a-session");

    assert_ne!(session.id(), "not-a-session");
    assert_eq!(session.id().len(), 32);
    assert!(store.contains(session.id()));
    assert!(!store.contains("not-a-session"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_find_known_id_returns_same_session_and_refreshes() {
    let store = SessionStore::new();
    let first = store.find("");
    let before = first.last_request();

    let again = store.find(first.id());

    assert!(again.same_session(&first));
    assert_eq!(again.id(), first.id());
    assert_eq!(again.creation_date(), first.creation_date());
    assert!(again.last_request() >= before);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_contains_does_not_refresh() {
    let store = SessionStore::new();
    let session = store.create();
    let before = session.last_request();

    assert!(store.contains(session.id()));

    assert_eq!(session.last_request(), before);
}

#[test]
fn test_ids_are_unique() {
    let store = SessionStore::new();

    let a = store.create();
    let b = store.create();

    assert_ne!(a.id(), b.id());
    assert!(!a.same_session(&b));
}

#[test]
fn test_handles_from_different_stores_are_distinct() {
    let a = SessionStore::new().create();
    let b = SessionStore::new().create();

    assert!(!a.same_session(&b));
}

#[test]
fn test_expiry_tracks_last_request() {
    let store = SessionStore::new();
    let session = store.create();

    assert_eq!(session.expiry_date(), session.last_request() + MAX_LIFE);
    assert_eq!(MAX_LIFE.as_secs(), 2 * 24 * 60 * 60);

    store.find(session.id());
    assert_eq!(session.expiry_date(), session.last_request() + MAX_LIFE);
}

#[test]
fn test_expired_sessions_stay_retrievable() {
    let store = SessionStore::new();
    let session = store.create();
    let later = SystemTime::now() + MAX_LIFE * 2;

    assert!(session.is_expired_at(later));
    assert!(!session.is_expired_at(SystemTime::now()));
    assert!(store.contains(session.id()));
}

#[test]
fn test_remove_expired_drops_only_stale_sessions() {
    let store = SessionStore::new();
    let stale = store.create();
    let fresh = store.create();

    thread::sleep(Duration::from_millis(20));
    store.find(fresh.id());
    let now = fresh.last_request() + MAX_LIFE;
    assert!(stale.is_expired_at(now));

    let removed = store.remove_expired(now);

    assert_eq!(removed, 1);
    assert!(!store.contains(stale.id()));
    assert!(store.contains(fresh.id()));
    assert!(!stale.is_live());
    assert!(fresh.is_live());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_expired_keeps_everything_before_expiry() {
    let store = SessionStore::new();
    for _ in 0..10 {
        store.find("");
    }

    assert_eq!(store.remove_expired(SystemTime::now()), 0);
    assert_eq!(store.len(), 10);

    assert_eq!(store.remove_expired(SystemTime::now() + MAX_LIFE * 2), 10);
    assert!(store.is_empty());
}

#[test]
fn test_removed_session_handle_has_no_data() {
    let store = SessionStore::new();
    let session = store.create();
    session.insert("user", String::from("ada"));
    let seen = session.last_request();

    store.remove_expired(seen + MAX_LIFE * 2);

    assert_eq!(session.get::<String>("user"), None);
    assert!(session.insert("user", String::from("bob")).is_none());
    assert!(!session.contains_key("user"));
    assert_eq!(session.with_data(|data| data.len()), 0);
    assert_eq!(session.last_request(), seen);

    let replacement = store.find(session.id());
    assert_ne!(replacement.id(), session.id());
    assert!(!replacement.same_session(&session));
}

#[test]
fn test_data_bag_is_shared_between_handles() {
    let store = SessionStore::new();
    let session = store.create();
    let other = store.find(session.id());

    assert!(session.insert("user", String::from("ada")).is_none());

    assert_eq!(other.get::<String>("user"), Some(Arc::new(String::from("ada"))));
    assert!(other.contains_key("user"));
    assert_eq!(other.get::<u32>("user"), None);

    assert!(other.remove("user").is_some());
    assert!(!session.contains_key("user"));
}

#[test]
fn test_insert_replaces_previous_value() {
    let store = SessionStore::new();
    let session = store.create();

    session.insert("n", 1u8);
    let previous = session.insert("n", 2u8).unwrap();

    assert_eq!(previous.downcast_ref::<u8>(), Some(&1));
    assert_eq!(session.get::<u8>("n"), Some(Arc::new(2)));
}

#[test]
fn test_concurrent_lookups_and_updates() {
    let store = SessionStore::new();
    let session = store.create();
    session.insert("hits", 0u64);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let id = session.id().to_string();
            thread::spawn(move || {
                for _ in 0..100 {
                    let s = store.find(&id);
                    s.with_data(|data| {
                        let hits = data
                            .get("hits")
                            .and_then(|v| v.downcast_ref::<u64>())
                            .copied()
                            .unwrap_or(0);
                        data.insert("hits".to_string(), Arc::new(hits + 1));
                    });
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(session.get::<u64>("hits"), Some(Arc::new(800)));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_creation_registers_every_session() {
    let store = SessionStore::new();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| store.find("").id().to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.extend(handle.join().unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 400);
    assert_eq!(store.len(), 400);
    assert!(ids.iter().all(|id| store.contains(id)));
}
