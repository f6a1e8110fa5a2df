use std::collections::{HashMap, VecDeque};

use crate::bank::QaRecord;

/// How many recent matches the cache keeps.
pub const CACHE_CAPACITY: usize = 100;

/// How many characters of the cleaned query form the cache key.
const KEY_CHARS: usize = 50;

/// Bounded memo of recent query -> record matches.
///
/// Eviction is strictly first-in first-out: lookups never refresh an
/// entry's position, and overwriting an existing key keeps its original
/// slot in the eviction queue. Not synchronized; only the worker thread
/// touches it.
#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<String, QaRecord>,
    order: VecDeque<String>,
    capacity: usize,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Cache key for a cleaned query: its first 50 characters.
    pub fn key_for(query: &str) -> String {
        query.chars().take(KEY_CHARS).collect()
    }

    pub fn get(&self, key: &str) -> Option<&QaRecord> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: String, record: QaRecord) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, record);
            return;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
