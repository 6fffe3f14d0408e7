//! In-memory image store with opaque eviction
//!
//! The store owns no contract about retention: entries are evicted in LRU
//! order whenever the pixel byte budget is exceeded, and callers must treat
//! every lookup as possibly missing, even immediately after a put. The
//! coordinator never inspects or depends on the eviction policy.

use crate::key::CacheKey;
use crate::raster::SizedImage;
use lru::LruCache;
use std::sync::Arc;
use tracing::trace;

/// Default pixel byte budget: 64 MiB of decoded RGBA.
pub(crate) const DEFAULT_STORE_BUDGET_BYTES: usize = 64 * 1024 * 1024;

/// Key → resized image mapping, bounded by a byte budget.
///
/// Mutated only on the cache context, so no interior locking is needed.
pub(crate) struct ImageStore {
  entries: LruCache<CacheKey, Arc<SizedImage>>,
  budget_bytes: usize,
  used_bytes: usize,
}

impl ImageStore {
  pub(crate) fn new(budget_bytes: usize) -> Self {
    Self {
      entries: LruCache::unbounded(),
      budget_bytes,
      used_bytes: 0,
    }
  }

  /// Look up an entry, marking it most-recently-used on a hit.
  pub(crate) fn get(&mut self, key: &CacheKey) -> Option<Arc<SizedImage>> {
    self.entries.get(key).cloned()
  }

  /// Insert an entry, evicting least-recently-used entries until the byte
  /// budget holds again. An image larger than the whole budget may be
  /// evicted immediately; callers tolerate that.
  pub(crate) fn put(&mut self, key: CacheKey, image: Arc<SizedImage>) {
    self.used_bytes += image.byte_size();
    if let Some(old) = self.entries.put(key, image) {
      self.used_bytes -= old.byte_size();
    }

    while self.used_bytes > self.budget_bytes {
      match self.entries.pop_lru() {
        Some((evicted_key, evicted)) => {
          self.used_bytes -= evicted.byte_size();
          trace!(key = %evicted_key, "evicted from image store");
        }
        None => break,
      }
    }
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}
