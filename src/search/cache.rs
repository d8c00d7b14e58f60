use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::search::results::SearchHit;

/// Memoizes ranked hits per normalized search term.
///
/// Every recomputation of the view re-queries the current term, even when
/// only a slider moved, so repeated terms are answered from here.
pub struct SearchCache {
    cache: Option<Mutex<LruCache<String, Arc<[SearchHit]>>>>, // None when disabled
    capacity: usize,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        SearchCache {
            cache: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            capacity,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, term: &str) -> Option<Arc<[SearchHit]>> {
        let cache = self.cache.as_ref()?;
        let found = cache.lock().get(term).cloned();
        match found {
            Some(hits) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Some(hits)
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, term: String, hits: Arc<[SearchHit]>) {
        if let Some(cache) = &self.cache {
            cache.lock().put(term, hits);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.as_ref().map_or(0, |cache| cache.lock().len()),
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
