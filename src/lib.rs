//! thumbcache — a size-aware in-memory image cache with coalesced loading
//!
//! The cache maps (url, target size) to decoded images that are already
//! resized to the requested size. Hits are returned synchronously; misses
//! start one background fetch per key, and every caller that asked for the
//! same key while the fetch was in flight gets the result delivered to its
//! callback, in registration order, on the cache's designated context.
//!
//! All cache state lives on a single event-loop thread owned by
//! [`ImageCacheService`]; fetching, decoding, and resizing run on a separate
//! concurrent worker pool so distinct images load in parallel.
//!
//! ```rust,no_run
//! use thumbcache::{ImageCacheService, TargetSize};
//!
//! # fn main() -> thumbcache::Result<()> {
//! let service = ImageCacheService::new()?;
//! let handle = service.handle();
//!
//! handle.dispatch(|cache| {
//!   let image = cache.load_image(
//!     "https://example.com/photo.jpg",
//!     TargetSize::new(120, 0),
//!     Some(Box::new(|image| {
//!       // Delivered later, on the cache context, exactly once.
//!       // Consumers must re-check their display context here before
//!       // applying the image; the cache does not track stale views.
//!       let _ = image;
//!     })),
//!   );
//!   if image.is_some() {
//!     // Cache hit: returned synchronously, callback never fires.
//!   }
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod context;
pub mod error;
pub mod geometry;
pub mod key;
pub mod raster;
pub mod resource;

mod pending;
mod store;

pub use cache::{ImageCache, ImageCacheConfig, ImageCacheService};
pub use context::CacheHandle;
pub use error::{DecodeError, Error, Result, TransportError};
pub use geometry::TargetSize;
pub use key::CacheKey;
pub use pending::ImageCallback;
pub use raster::SizedImage;
pub use resource::{FetchedResource, HttpFetcher, ResourceFetcher};
