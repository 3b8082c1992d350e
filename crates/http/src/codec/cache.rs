//! Bounded memoization of parse results for short requests.
//!
//! Both caches are keyed by exact raw bytes and evict in strict insertion order: a hit never
//! refreshes an entry's position, so this is FIFO and not LRU.
//!
//! A [`ParseCache`] is owned by whoever creates the decoders (usually a
//! [`Server`](crate::server::Server)) and shared between connections through an `Arc`, each
//! [`FifoCache`] sits behind its own mutex.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::trace;

use crate::codec::FrameMeta;
use crate::protocol::SharedRequest;

/// Maximum number of entries held by each cache.
pub const CACHE_CAPACITY: usize = 512;

/// Largest buffer (or frame) length whose parse result is memoized.
pub const CACHEABLE_LEN: usize = 512;

#[inline]
pub(crate) fn is_cacheable(len: usize) -> bool {
    len <= CACHEABLE_LEN
}

/// A map with a fixed capacity that evicts its oldest inserted entry first.
///
/// Insertion order is tracked in a queue next to the map, eviction never depends on the map's
/// iteration order.
pub struct FifoCache<V> {
    capacity: usize,
    entries: HashMap<Bytes, V>,
    order: VecDeque<Bytes>,
}

impl<V> FifoCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: HashMap::with_capacity(capacity + 1), order: VecDeque::with_capacity(capacity + 1) }
    }

    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` under `key` and returns the key evicted to stay within capacity.
    ///
    /// A key already present keeps both its value and its queue position.
    pub fn insert(&mut self, key: Bytes, value: V) -> Option<Bytes> {
        if self.entries.contains_key(&key) {
            return None;
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);

        if self.entries.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            self.entries.remove(&oldest);
            return Some(oldest);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V> fmt::Debug for FifoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache").field("capacity", &self.capacity).field("len", &self.entries.len()).finish()
    }
}

/// The frame metadata cache and the built request cache shared by all connections of a server.
#[derive(Debug)]
pub struct ParseCache {
    metadata: Mutex<FifoCache<FrameMeta>>,
    requests: Mutex<FifoCache<SharedRequest>>,
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { metadata: Mutex::new(FifoCache::new(capacity)), requests: Mutex::new(FifoCache::new(capacity)) }
    }

    pub(crate) fn metadata(&self, buf: &[u8]) -> Option<FrameMeta> {
        lock(&self.metadata).get(buf).cloned()
    }

    pub(crate) fn insert_metadata(&self, buf: &[u8], meta: FrameMeta) {
        // the receive buffer is reused, so the key must own its bytes
        if let Some(evicted) = lock(&self.metadata).insert(Bytes::copy_from_slice(buf), meta) {
            trace!(evicted_len = evicted.len(), "evicted frame metadata");
        }
    }

    pub(crate) fn request(&self, frame: &[u8]) -> Option<SharedRequest> {
        lock(&self.requests).get(frame).cloned()
    }

    pub(crate) fn insert_request(&self, frame: Bytes, request: SharedRequest) {
        if let Some(evicted) = lock(&self.requests).insert(frame, request) {
            trace!(evicted_len = evicted.len(), "evicted request");
        }
    }

    /// Number of memoized frame metadata entries.
    pub fn metadata_len(&self) -> usize {
        lock(&self.metadata).len()
    }

    /// Number of memoized requests.
    pub fn requests_len(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn contains_metadata(&self, buf: &[u8]) -> bool {
        lock(&self.metadata).contains(buf)
    }

    pub fn contains_request(&self, frame: &[u8]) -> bool {
        lock(&self.requests).contains(frame)
    }
}

// A panic while holding the lock can't leave the cache half updated, every operation above
// finishes its map and queue changes before anything that may panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
