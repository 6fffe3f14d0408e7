//! The image cache coordinator and its service wrapper
//!
//! `ImageCache` is the single-writer coordinator: it owns the store and the
//! pending registry and is only ever touched on the cache context.
//! `ImageCacheService` wires the pieces together — context thread, fetch
//! worker pool, transport — and hands out [`CacheHandle`]s to consumers.

use crate::context::{CacheContext, CacheHandle};
use crate::error::{Error, Result};
use crate::geometry::TargetSize;
use crate::key::CacheKey;
use crate::pending::{ImageCallback, PendingRegistry};
use crate::raster::{fetch_and_raster, SizedImage};
use crate::resource::{HttpFetcher, ResourceFetcher};
use crate::store::{ImageStore, DEFAULT_STORE_BUDGET_BYTES};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Configuration for an [`ImageCacheService`].
#[derive(Debug, Clone)]
pub struct ImageCacheConfig {
  /// Byte budget for decoded pixels held in the store.
  pub max_cache_bytes: usize,
  /// Number of threads in the fetch worker pool.
  pub fetch_threads: usize,
  /// Optional delay applied to every fetch before its result is delivered.
  /// Off by default; test harnesses use it to widen the in-flight window.
  pub artificial_delay: Option<Duration>,
}

impl Default for ImageCacheConfig {
  fn default() -> Self {
    Self {
      max_cache_bytes: DEFAULT_STORE_BUDGET_BYTES,
      fetch_threads: 8,
      artificial_delay: None,
    }
  }
}

impl ImageCacheConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_cache_bytes(mut self, max: usize) -> Self {
    self.max_cache_bytes = max;
    self
  }

  pub fn with_fetch_threads(mut self, threads: usize) -> Self {
    self.fetch_threads = threads.max(1);
    self
  }

  pub fn with_artificial_delay(mut self, delay: Duration) -> Self {
    self.artificial_delay = Some(delay);
    self
  }
}

/// Single-writer coordinator for cached images.
///
/// Reachable only through jobs posted on the cache context, which is what
/// makes every method here safe to run without locks: there is exactly one
/// `&mut ImageCache` and it lives on the context loop.
pub struct ImageCache {
  store: ImageStore,
  pending: PendingRegistry,
  fetcher: Arc<dyn ResourceFetcher>,
  workers: Arc<ThreadPool>,
  handle: CacheHandle,
  artificial_delay: Option<Duration>,
}

impl ImageCache {
  fn new(
    config: &ImageCacheConfig,
    fetcher: Arc<dyn ResourceFetcher>,
    workers: Arc<ThreadPool>,
    handle: CacheHandle,
  ) -> Self {
    Self {
      store: ImageStore::new(config.max_cache_bytes),
      pending: PendingRegistry::new(),
      fetcher,
      workers,
      handle,
      artificial_delay: config.artificial_delay,
    }
  }

  /// Retrieve the image for (url, size) from the cache, or load it in the
  /// background and deliver it to `callback` later.
  ///
  /// - On a cache hit the image is returned and `callback` is never invoked.
  /// - On a miss this returns `None` and `callback` is invoked exactly once,
  ///   later, on the cache context — with the image, or with `None` when the
  ///   fetch failed.
  /// - Passing no callback turns a miss into a pure cache probe: nothing is
  ///   registered and no fetch is started.
  ///
  /// Concurrent misses for the same (url, size) coalesce into one fetch;
  /// their callbacks fire in registration order. Misses for distinct keys
  /// fetch in parallel on the worker pool.
  pub fn load_image(
    &mut self,
    url: &str,
    size: TargetSize,
    callback: Option<ImageCallback>,
  ) -> Option<Arc<SizedImage>> {
    let key = CacheKey::new(url, size);

    if let Some(image) = self.store.get(&key) {
      trace!(key = %key, "cache hit");
      return Some(image);
    }
    trace!(key = %key, "cache miss");

    let callback = callback?;

    if !self.pending.register_first(key.clone(), callback) {
      trace!(key = %key, "joined pending load");
      return None;
    }

    debug!(key = %key, "starting fetch");
    self.spawn_fetch(key);
    None
  }

  /// Whether a fetch for (url, size) is currently in flight.
  pub fn is_loading(&self, url: &str, size: TargetSize) -> bool {
    self.pending.is_pending(&CacheKey::new(url, size))
  }

  fn spawn_fetch(&self, key: CacheKey) {
    let fetcher = Arc::clone(&self.fetcher);
    let handle = self.handle.clone();
    let delay = self.artificial_delay;

    self.workers.spawn(move || {
      let image = match fetch_and_raster(fetcher.as_ref(), key.url(), key.size()) {
        Ok(image) => Some(Arc::new(image)),
        Err(err) => {
          debug!(key = %key, error = %err, "fetch failed");
          None
        }
      };
      if let Some(delay) = delay {
        thread::sleep(delay);
      }
      // The context may already be gone during shutdown; waiters go with it.
      let _ = handle.dispatch(move |cache| cache.complete(&key, image));
    });
  }

  /// Apply a fetch result: store the image (if any) and fan it out to every
  /// waiter registered for the key, in FIFO order.
  fn complete(&mut self, key: &CacheKey, image: Option<Arc<SizedImage>>) {
    if let Some(image) = &image {
      self.store.put(key.clone(), Arc::clone(image));
    }

    let waiters = self.pending.drain(key);
    debug!(key = %key, waiters = waiters.len(), loaded = image.is_some(), "load complete");
    for callback in waiters {
      callback(image.clone());
    }
  }
}

/// The cache service: context thread, fetch pool, and transport, wired
/// together with injected dependencies instead of a process-wide singleton.
/// Construct one at startup and pass its [`CacheHandle`] to consumers.
///
/// # Example
///
/// ```rust,no_run
/// use thumbcache::{ImageCacheService, TargetSize};
///
/// # fn main() -> thumbcache::Result<()> {
/// let service = ImageCacheService::new()?;
/// let handle = service.handle();
///
/// let hit = handle.call(|cache| {
///   cache.load_image(
///     "https://example.com/avatar.png",
///     TargetSize::new(64, 64),
///     Some(Box::new(|image| {
///       if let Some(image) = image {
///         println!("loaded {}x{}", image.width(), image.height());
///       }
///     })),
///   )
/// })?;
/// assert!(hit.is_none()); // first request is a miss
/// # Ok(())
/// # }
/// ```
pub struct ImageCacheService {
  handle: CacheHandle,
  // Keeps the context thread alive; dropped last to stop the loop.
  _context: CacheContext,
}

impl ImageCacheService {
  /// Create a service with the default HTTP fetcher and configuration.
  pub fn new() -> Result<Self> {
    Self::with_fetcher_and_config(Arc::new(HttpFetcher::new()), ImageCacheConfig::default())
  }

  /// Create a service with a custom fetcher and default configuration.
  pub fn with_fetcher(fetcher: Arc<dyn ResourceFetcher>) -> Result<Self> {
    Self::with_fetcher_and_config(fetcher, ImageCacheConfig::default())
  }

  /// Create a service with the default HTTP fetcher and custom configuration.
  pub fn with_config(config: ImageCacheConfig) -> Result<Self> {
    Self::with_fetcher_and_config(Arc::new(HttpFetcher::new()), config)
  }

  /// Create a service with both a custom fetcher and configuration.
  pub fn with_fetcher_and_config(
    fetcher: Arc<dyn ResourceFetcher>,
    config: ImageCacheConfig,
  ) -> Result<Self> {
    let workers = ThreadPoolBuilder::new()
      .num_threads(config.fetch_threads.max(1))
      .thread_name(|i| format!("thumbcache-fetch-{i}"))
      .build()
      .map_err(|e| Error::WorkerPool(e.to_string()))?;
    let workers = Arc::new(workers);

    let (context, handle) = CacheContext::spawn(move |handle| {
      Ok(ImageCache::new(&config, fetcher, workers, handle))
    })?;

    Ok(Self {
      handle,
      _context: context,
    })
  }

  /// A cloneable handle for posting work onto the cache context.
  pub fn handle(&self) -> CacheHandle {
    self.handle.clone()
  }
}
