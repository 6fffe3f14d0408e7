//! Resource fetching abstraction
//!
//! A trait-based boundary for retrieving raw image bytes, keeping the cache
//! agnostic about transport. This allows:
//!
//! - Mocking for tests (counting, failing, or blocking fetchers)
//! - Offline or bundled-asset modes
//! - Custom transports behind the same cache
//!
//! The default [`HttpFetcher`] issues one GET per call over its own agent, so
//! fetches running on different worker threads proceed in parallel rather
//! than serializing behind a shared connection queue.

use crate::error::{Result, TransportError};
use std::time::Duration;

/// Default User-Agent string used by HTTP fetchers
pub const DEFAULT_USER_AGENT: &str = "thumbcache/0.1";

/// Result of fetching an external resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
  /// Raw bytes of the resource
  pub bytes: Vec<u8>,
  /// Content-Type header value, if available (e.g., "image/png")
  pub content_type: Option<String>,
}

impl FetchedResource {
  /// Create a new FetchedResource
  pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
    Self {
      bytes,
      content_type,
    }
  }

  /// Check if this resource appears to be an image based on content-type
  pub fn is_image(&self) -> bool {
    self
      .content_type
      .as_ref()
      .map(|ct| ct.starts_with("image/"))
      .unwrap_or(false)
  }
}

/// Trait for fetching raw resource bytes from a URL.
///
/// Implementations must be `Send + Sync`: the cache shares one fetcher
/// across all fetch worker threads.
pub trait ResourceFetcher: Send + Sync {
  /// Fetch the resource at `url`, returning its bytes or an error.
  fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

// Allow Arc<dyn ResourceFetcher> to be used as ResourceFetcher
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for std::sync::Arc<T> {
  fn fetch(&self, url: &str) -> Result<FetchedResource> {
    (**self).fetch(url)
  }
}

/// Default HTTP resource fetcher
///
/// Fetches resources over HTTP/HTTPS with configurable timeout, User-Agent,
/// and response size limit. Redirects are followed by the underlying agent.
///
/// # Example
///
/// ```rust,ignore
/// use thumbcache::resource::HttpFetcher;
/// use std::time::Duration;
///
/// let fetcher = HttpFetcher::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("MyApp/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  timeout: Duration,
  user_agent: String,
  max_size: usize,
}

impl HttpFetcher {
  /// Create a new HttpFetcher with default settings
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the request timeout
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Set the User-Agent header
  pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.user_agent = user_agent.into();
    self
  }

  /// Set the maximum response size in bytes
  pub fn with_max_size(mut self, max_size: usize) -> Self {
    self.max_size = max_size;
    self
  }

  fn fetch_http(&self, url: &str) -> Result<FetchedResource> {
    let config = ureq::Agent::config_builder()
      .timeout_global(Some(self.timeout))
      .build();
    let agent: ureq::Agent = config.into();

    let mut response = agent
      .get(url)
      .header("User-Agent", &self.user_agent)
      .call()
      .map_err(|e| TransportError::RequestFailed {
        url: url.to_string(),
        reason: e.to_string(),
      })?;

    let content_type = response
      .headers()
      .get("content-type")
      .and_then(|h| h.to_str().ok())
      .map(|s| s.to_string());

    let bytes = response
      .body_mut()
      .with_config()
      .limit(self.max_size as u64)
      .read_to_vec()
      .map_err(|e| TransportError::RequestFailed {
        url: url.to_string(),
        reason: e.to_string(),
      })?;

    if bytes.is_empty() {
      return Err(
        TransportError::EmptyBody {
          url: url.to_string(),
        }
        .into(),
      );
    }

    Ok(FetchedResource::new(bytes, content_type))
  }
}

impl Default for HttpFetcher {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(30),
      user_agent: DEFAULT_USER_AGENT.to_string(),
      max_size: 50 * 1024 * 1024, // 50MB default limit
    }
  }
}

impl ResourceFetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> Result<FetchedResource> {
    if url.starts_with("http://") || url.starts_with("https://") {
      self.fetch_http(url)
    } else {
      Err(
        TransportError::UnsupportedScheme {
          url: url.to_string(),
        }
        .into(),
      )
    }
  }
}
