//! In-process package cache owned by the package manager: bounded
//! capacity, per-entry TTL, three-way lookup.
//!
//! Staleness policy: entries are immutable `Arc` snapshots, so a reader
//! racing a writer can observe an outdated snapshot but never a torn one.
//! Callers that hit [`Lookup::Stale`] are expected to refresh and may fall
//! back to the stale snapshot if the refresh fails.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::model::CoursePackage;

#[derive(Debug)]
pub enum Lookup {
    Miss,
    Fresh(Arc<CoursePackage>),
    Stale(Arc<CoursePackage>),
}

struct Entry {
    value: Arc<CoursePackage>,
    inserted_at: Instant,
}

pub struct PackageCache {
    entries: Mutex<HashMap<String, Entry>>,
    capacity: usize,
    ttl: Duration,
}

impl PackageCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Lookup {
        let entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            None => Lookup::Miss,
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                Lookup::Fresh(Arc::clone(&entry.value))
            }
            Some(entry) => Lookup::Stale(Arc::clone(&entry.value)),
        }
    }

    /// Insert a snapshot, evicting the oldest entry when at capacity.
    pub fn insert(&self, key: impl Into<String>, value: Arc<CoursePackage>) {
        let key = key.into();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
