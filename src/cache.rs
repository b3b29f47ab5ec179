// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bounded result cache keyed by (language, content hash)
//!
//! Insert and evict happen under one lock, so a reader sees either the
//! complete entry or nothing. Eviction drops the oldest insertion.

use crate::types::{AnalysisResult, Language};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub language: Language,
    pub digest: String,
}

impl CacheKey {
    pub fn new(language: Language, text: &str) -> Self {
        Self {
            language,
            digest: blake3::hash(text.as_bytes()).to_hex().to_string(),
        }
    }
}

#[derive(Default)]
struct Entries {
    map: HashMap<CacheKey, AnalysisResult>,
    order: VecDeque<CacheKey>,
}

pub struct ResultCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &CacheKey) -> Option<AnalysisResult> {
        self.entries.lock().map.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, result: AnalysisResult) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.map.insert(key.clone(), result).is_none() {
            entries.order.push_back(key);
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.map.clear();
        entries.order.clear();
    }
}
