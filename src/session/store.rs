use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use uuid::Uuid;

/// Sliding lifetime of a session, counted from its last request.
pub const MAX_LIFE: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Opaque per-visitor value.
pub type Value = Arc<dyn Any + Send + Sync>;

struct Record {
    created: SystemTime,
    last_request: SystemTime,
    data: HashMap<String, Value>,
}

/// Sessions keyed by ID. Only the store inserts or removes entries.
#[derive(Default)]
struct Sessions {
    records: HashMap<String, Record>,
}

impl Sessions {
    fn register(&mut self, now: SystemTime) -> String {
        let mut id = new_id();
        while self.records.contains_key(&id) {
            id = new_id();
        }

        self.records.insert(
            id.clone(),
            Record {
                created: now,
                last_request: now,
                data: HashMap::new(),
            },
        );
        id
    }
}

/// 32 lowercase hex digits, no hyphens.
fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Process-wide map from session ID to session.
///
/// Cloning the store clones a handle; all clones share the same sessions.
/// Every read and write, including a session's data bag, goes through one
/// mutex.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").field("len", &self.len()).finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        // Lock bodies never leave the map half-updated, so a poisoned lock is safe to reuse.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a session with exactly this ID exists. Does not refresh it.
    pub fn contains(&self, id: &str) -> bool {
        self.lock().records.contains_key(id)
    }

    /// Returns the session for `id`, refreshing its last-request time.
    ///
    /// An unknown `id` is not adopted: a new session with a fresh ID is
    /// created and returned instead, so callers must read the ID back from
    /// the returned session.
    pub fn find(&self, id: &str) -> Session {
        let now = SystemTime::now();
        let mut sessions = self.lock();

        if let Some(record) = sessions.records.get_mut(id) {
            if now > record.last_request {
                record.last_request = now;
            }
            return self.handle(id.to_string(), record);
        }

        let fresh = sessions.register(now);
        tracing::debug!(requested = id, id = %fresh, "Created session");
        let record = &sessions.records[&fresh];
        self.handle(fresh.clone(), record)
    }

    /// Creates and registers a new session.
    pub fn create(&self) -> Session {
        let now = SystemTime::now();
        let mut sessions = self.lock();
        let id = sessions.register(now);

        tracing::debug!(id = %id, "Created session");

        let record = &sessions.records[&id];
        self.handle(id.clone(), record)
    }

    /// Drops every session whose expiry date is before `now`, returning how
    /// many were removed.
    pub fn remove_expired(&self, now: SystemTime) -> usize {
        let mut sessions = self.lock();
        let before = sessions.records.len();
        sessions
            .records
            .retain(|_, record| now <= record.last_request + MAX_LIFE);
        let removed = before - sessions.records.len();

        if removed > 0 {
            tracing::debug!(removed, live = sessions.records.len(), "Removed expired sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: String, record: &Record) -> Session {
        Session {
            id,
            created: record.created,
            last_seen: record.last_request,
            store: self.clone(),
        }
    }
}

/// Shared handle to one stored session.
///
/// Mutable state is read under the store lock on every call, so two handles
/// to the same session always agree. Once the store has removed the session,
/// [`Session::last_request`] reports the value seen when the handle was made,
/// reads find no data and writes are dropped.
#[derive(Clone)]
pub struct Session {
    id: String,
    created: SystemTime,
    last_seen: SystemTime,
    store: SessionStore,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created", &self.created)
            .finish()
    }
}

impl Session {
    fn with_record<R>(&self, f: impl FnOnce(&mut Record) -> R) -> Option<R> {
        let mut sessions = self.store.lock();
        sessions.records.get_mut(&self.id).map(f)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn creation_date(&self) -> SystemTime {
        self.created
    }

    pub fn last_request(&self) -> SystemTime {
        self.with_record(|r| r.last_request)
            .unwrap_or(self.last_seen)
    }

    /// `last_request + MAX_LIFE`, computed on every call.
    pub fn expiry_date(&self) -> SystemTime {
        self.last_request() + MAX_LIFE
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now > self.expiry_date()
    }

    /// Whether the store still holds this session.
    pub fn is_live(&self) -> bool {
        self.store.contains(&self.id)
    }

    /// Whether both handles refer to the same stored session.
    pub fn same_session(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.store.inner, &other.store.inner) && self.id == other.id
    }

    /// Returns the value under `key` if it holds a `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.with_record(|r| r.data.get(key).cloned())
            .flatten()
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> Option<Value> {
        let key = key.into();
        self.with_record(|r| r.data.insert(key, Arc::new(value)))
            .flatten()
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.with_record(|r| r.data.remove(key)).flatten()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.with_record(|r| r.data.contains_key(key))
            .unwrap_or(false)
    }

    /// Runs `f` on the data bag while holding the store lock, for
    /// read-modify-write updates. A removed session gets an empty, discarded bag.
    pub fn with_data<R>(&self, f: impl FnOnce(&mut HashMap<String, Value>) -> R) -> R {
        let mut sessions = self.store.lock();
        match sessions.records.get_mut(&self.id) {
            Some(record) => f(&mut record.data),
            None => f(&mut HashMap::new()),
        }
    }
}
