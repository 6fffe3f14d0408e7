//! Error types for thumbcache
//!
//! Fetch and decode failures are carried as typed errors inside the loader
//! pipeline, but they never reach waiters as errors: the cache collapses every
//! failure to an absent image at the delivery boundary. The variants here
//! exist so transports and tests can report precise causes, and so service
//! construction and context dispatch can fail loudly.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations.

use thiserror::Error;

/// Result type alias for thumbcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for thumbcache
#[derive(Error, Debug)]
pub enum Error {
  /// Network retrieval failed
  #[error("transport error: {0}")]
  Transport(#[from] TransportError),

  /// Response bytes could not be decoded into a raster image
  #[error("decode error: {0}")]
  Decode(#[from] DecodeError),

  /// The designated cache context has shut down and can no longer run jobs
  #[error("cache context is no longer running")]
  ContextClosed,

  /// The fetch worker pool could not be started
  #[error("failed to start fetch worker pool: {0}")]
  WorkerPool(String),
}

/// Errors produced by [`ResourceFetcher`](crate::resource::ResourceFetcher)
/// implementations.
#[derive(Error, Debug)]
pub enum TransportError {
  /// The HTTP request failed (connect, TLS, timeout, or non-success status)
  #[error("request for {url} failed: {reason}")]
  RequestFailed { url: String, reason: String },

  /// The server returned a success status with an empty body
  #[error("empty response body for {url}")]
  EmptyBody { url: String },

  /// The URL scheme is not one the fetcher knows how to retrieve
  #[error("unsupported URL scheme: {url}")]
  UnsupportedScheme { url: String },
}

/// Errors produced while decoding fetched bytes into pixels.
#[derive(Error, Debug)]
pub enum DecodeError {
  /// The bytes are not a valid image in any supported format
  #[error("failed to decode image: {reason}")]
  InvalidImage { reason: String },
}
