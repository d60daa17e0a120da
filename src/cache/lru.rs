//! Bounded LRU store for complete origin responses.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// A single cached response. Never mutated after creation; a re-fetch of the
/// same url replaces the entry wholesale.
#[derive(Debug)]
struct CacheEntry {
    url: String,
    response: Vec<u8>,
}

/// Bounded, recency-ordered response cache shared across connection handlers.
///
/// Entries are kept most-recently-used first. Every operation takes the lock
/// once for its full logical extent, so the MRU→LRU order is a consistent
/// total order at any observation point.
pub struct ResponseCache {
    /// Front = most recently used, back = least recently used.
    entries: Mutex<VecDeque<CacheEntry>>,
    capacity: usize,
}

impl ResponseCache {
    /// Create an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CacheEntry>> {
        // Entry manipulation cannot panic mid-operation, so the list behind a
        // poisoned lock is still structurally sound.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a url, promoting its entry to most-recently-used on a hit.
    pub fn lookup(&self, url: &str) -> Option<Vec<u8>> {
        let mut entries = self.lock();
        let pos = entries.iter().position(|e| e.url == url)?;
        let entry = entries.remove(pos)?;
        let response = entry.response.clone();
        entries.push_front(entry);
        Some(response)
    }

    /// Insert a complete response at the most-recently-used position.
    ///
    /// An existing entry for the same url is removed first (urls are unique
    /// within the cache), then the least-recently-used entry is evicted if
    /// the insert pushed the size over capacity.
    pub fn insert(&self, url: String, response: Vec<u8>) {
        let mut entries = self.lock();
        if let Some(pos) = entries.iter().position(|e| e.url == url) {
            entries.remove(pos);
        }
        entries.push_front(CacheEntry { url, response });
        if entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_back() {
                tracing::debug!(url = %evicted.url, "evicted least recently used entry");
            }
        }
    }

    /// Snapshot of cached urls in MRU→LRU order.
    ///
    /// Callers print or log the result after this returns; the lock covers
    /// only the traversal.
    pub fn urls(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.url.clone()).collect()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
