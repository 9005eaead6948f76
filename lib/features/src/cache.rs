//! Session-scoped analysis cache
//!
//! Remembers classifier results per chunk for the lifetime of one analysis
//! session. Keys are SHA-256 digests of the chunk text, so identical chunks
//! hit regardless of which file or run produced them. Nothing is evicted;
//! drop the cache to end the session.

use crate::oracle::ChunkAnalysis;
use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type CacheKey = [u8; 32];

#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: RwLock<HashMap<CacheKey, ChunkAnalysis>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Counters for one cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_for(chunk: &str) -> CacheKey {
        Sha256::digest(chunk.as_bytes()).into()
    }

    pub fn get(&self, chunk: &str) -> Option<ChunkAnalysis> {
        let found = self.entries.read().get(&Self::key_for(chunk)).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, chunk: &str, analysis: ChunkAnalysis) {
        self.entries.write().insert(Self::key_for(chunk), analysis);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::FeatureFinding;

    fn analysis(feature: &str) -> ChunkAnalysis {
        let mut analysis = ChunkAnalysis::default();
        analysis.set(feature, FeatureFinding::present("seen"));
        analysis
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = AnalysisCache::new();
        assert!(cache.get("fn main() {}").is_none());

        cache.insert("fn main() {}", analysis("caching"));
        let hit = cache.get("fn main() {}").unwrap();
        assert!(hit.is_present("caching"));

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn test_keys_are_content_addressed() {
        assert_eq!(AnalysisCache::key_for("abc"), AnalysisCache::key_for("abc"));
        assert_ne!(AnalysisCache::key_for("abc"), AnalysisCache::key_for("abd"));
    }

    #[test]
    fn test_insert_replaces() {
        let cache = AnalysisCache::new();
        cache.insert("chunk", analysis("caching"));
        cache.insert("chunk", analysis("database"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("chunk").unwrap().is_present("database"));
    }
}
