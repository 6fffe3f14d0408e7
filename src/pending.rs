//! Pending-request registry
//!
//! Coalesces duplicate in-flight loads: the first miss for a key creates a
//! waiter list and starts a fetch, later misses for the same key only append
//! to the list. A list exists exactly between first miss and fetch
//! completion, and is drained exactly once.

use crate::key::CacheKey;
use crate::raster::SizedImage;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Callback invoked on the cache context with the loaded image, or `None`
/// when the fetch failed. Invoked exactly once, and never for cache hits.
pub type ImageCallback = Box<dyn FnOnce(Option<Arc<SizedImage>>) + Send + 'static>;

/// Key → FIFO list of callbacks waiting on an in-flight fetch.
///
/// Mutated only on the cache context.
#[derive(Default)]
pub(crate) struct PendingRegistry {
  waiters: FxHashMap<CacheKey, Vec<ImageCallback>>,
}

impl PendingRegistry {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Register a callback for `key`.
  ///
  /// Returns true when this is the first waiter, meaning the caller must
  /// start the fetch; false when a fetch is already in flight.
  pub(crate) fn register_first(&mut self, key: CacheKey, callback: ImageCallback) -> bool {
    match self.waiters.get_mut(&key) {
      Some(list) => {
        list.push(callback);
        false
      }
      None => {
        self.waiters.insert(key, vec![callback]);
        true
      }
    }
  }

  /// Remove and return all waiters for `key` in registration order.
  ///
  /// Returns an empty list if no fetch was pending; the state machine never
  /// produces that, but completion handles it without panicking.
  pub(crate) fn drain(&mut self, key: &CacheKey) -> Vec<ImageCallback> {
    self.waiters.remove(key).unwrap_or_default()
  }

  /// Whether a fetch is in flight for `key`.
  pub(crate) fn is_pending(&self, key: &CacheKey) -> bool {
    self.waiters.contains_key(key)
  }
}
