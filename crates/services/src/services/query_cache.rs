//! Process-wide cache of server responses keyed by structured query keys.
//!
//! Entries only go stale through [`QueryCache::invalidate`]; elapsed time never
//! expires anything. Entries are never evicted.
//!
//! Every fetch takes a ticket from a monotonic clock when it starts. A
//! completed fetch is written only if no younger fetch for the same key has
//! already been written, and a fetch that started before the last
//! invalidation of its key leaves the entry stale.

use std::{
    fmt,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use strum_macros::Display;
use tokio::sync::broadcast;
use tracing::debug;

use super::api_client::RequestError;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeySegment {
    Text(String),
    Id(i64),
}

impl From<&str> for KeySegment {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for KeySegment {
    fn from(value: i32) -> Self {
        Self::Id(i64::from(value))
    }
}

impl From<i64> for KeySegment {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Ordered segments identifying a cacheable resource, e.g.
/// `["lapin", 12, "genealogy"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    pub fn new(segments: Vec<KeySegment>) -> Self {
        Self(segments)
    }

    /// Appends a segment.
    pub fn with(mut self, segment: impl Into<KeySegment>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element-wise prefix match. The empty key is a prefix of every key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl<S: Into<KeySegment>> FromIterator<S> for QueryKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{segment}")?;
        }
        f.write_str("]")
    }
}

/// Builds a [`QueryKey`] from heterogeneous segments:
/// `query_key!["lapin", id, "genealogy"]`.
#[macro_export]
macro_rules! query_key {
    ($($segment:expr),* $(,)?) => {
        $crate::services::query_cache::QueryKey::new(vec![
            $($crate::services::query_cache::KeySegment::from($segment)),*
        ])
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Error,
    Success,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: QueryKey,
    /// Last accepted payload. Kept when a later fetch fails.
    pub payload: Option<Value>,
    pub status: FetchStatus,
    pub fetched_at: Option<DateTime<Utc>>,
    pub stale: bool,
    pub error: Option<RequestError>,
    issued: u64,
    written: u64,
    invalidated: u64,
}

impl CacheEntry {
    fn idle(key: QueryKey) -> Self {
        Self {
            key,
            payload: None,
            status: FetchStatus::Idle,
            fetched_at: None,
            stale: false,
            error: None,
            issued: 0,
            written: 0,
            invalidated: 0,
        }
    }

    fn fresh_payload(&self) -> Option<&Value> {
        self.payload.as_ref().filter(|_| !self.stale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    Updated(QueryKey),
    Invalidated(QueryKey),
    Failed(QueryKey),
}

#[derive(Debug)]
struct Inner {
    entries: DashMap<QueryKey, CacheEntry>,
    clock: AtomicU64,
    events: broadcast::Sender<CacheEvent>,
}

/// Shared handle to the cache; clones see the same entries.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                clock: AtomicU64::new(0),
                events,
            }),
        }
    }

    fn tick(&self) -> u64 {
        self.inner.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn emit(&self, event: CacheEvent) {
        // No receivers is the common case.
        let _ = self.inner.events.send(event);
    }

    /// Pure lookup, no network effect.
    pub fn read(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.inner.entries.get(key).map(|entry| entry.clone())
    }

    /// Returns the cached payload when present and not stale, otherwise runs
    /// `loader` and stores its result.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Value, RequestError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, RequestError>>,
    {
        if let Some(payload) = self
            .inner
            .entries
            .get(key)
            .and_then(|entry| entry.fresh_payload().cloned())
        {
            debug!(key = %key, "query cache hit");
            return Ok(payload);
        }

        let ticket = self.begin(key);
        debug!(key = %key, ticket, "query cache miss, loading");

        let result = loader().await;
        match &result {
            Ok(payload) => self.complete(key, ticket, payload.clone()),
            Err(e) => self.fail(key, ticket, e.clone()),
        }
        result
    }

    fn begin(&self, key: &QueryKey) -> u64 {
        let ticket = self.tick();
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::idle(key.clone()));
        entry.issued = ticket;
        entry.status = FetchStatus::Loading;
        ticket
    }

    fn complete(&self, key: &QueryKey, ticket: u64, payload: Value) {
        let accepted = {
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::idle(key.clone()));
            if ticket > entry.written {
                entry.payload = Some(payload);
                entry.written = ticket;
                entry.fetched_at = Some(Utc::now());
                entry.stale = entry.invalidated > ticket;
                entry.error = None;
                if ticket >= entry.issued {
                    entry.status = FetchStatus::Success;
                }
                true
            } else {
                false
            }
        };

        if accepted {
            self.emit(CacheEvent::Updated(key.clone()));
        } else {
            debug!(key = %key, ticket, "discarding out-of-order response");
        }
    }

    fn fail(&self, key: &QueryKey, ticket: u64, error: RequestError) {
        let recorded = {
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::idle(key.clone()));
            if ticket >= entry.issued {
                entry.status = FetchStatus::Error;
                entry.error = Some(error);
                true
            } else {
                false
            }
        };

        if recorded {
            self.emit(CacheEvent::Failed(key.clone()));
        }
    }

    /// Stores `payload` as a fresh successful result for `key`.
    pub fn set_data(&self, key: QueryKey, payload: Value) {
        let ticket = self.tick();
        {
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::idle(key.clone()));
            entry.payload = Some(payload);
            entry.written = ticket;
            entry.issued = entry.issued.max(ticket);
            entry.fetched_at = Some(Utc::now());
            entry.stale = false;
            entry.error = None;
            entry.status = FetchStatus::Success;
        }
        self.emit(CacheEvent::Updated(key));
    }

    /// Marks every entry whose key starts with `prefix` as stale. Returns the
    /// number of entries marked.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let ticket = self.tick();
        let mut marked = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.stale = true;
                entry.invalidated = ticket;
                marked.push(entry.key().clone());
            }
        }

        debug!(prefix = %prefix, count = marked.len(), "query cache invalidated");
        let count = marked.len();
        for key in marked {
            self.emit(CacheEvent::Invalidated(key));
        }
        count
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<_> = self.inner.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}
