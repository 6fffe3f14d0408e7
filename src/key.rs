//! Cache key derivation

use crate::geometry::TargetSize;
use std::fmt;

/// Identity of one cached image: the source URL plus the requested size.
///
/// Two requests for the same URL at different sizes are distinct keys and
/// resolve to independent cache entries. The key is a pure function of its
/// inputs; the `Display` form is a canonical `url[WxH]` encoding meant for
/// logs, not for parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
  url: String,
  size: TargetSize,
}

impl CacheKey {
  /// Derive the key for a (url, size) request
  pub fn new(url: impl Into<String>, size: TargetSize) -> Self {
    Self {
      url: url.into(),
      size,
    }
  }

  /// The source URL this key was derived from
  pub fn url(&self) -> &str {
    &self.url
  }

  /// The requested target size this key was derived from
  pub fn size(&self) -> TargetSize {
    self.size
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}[{}]", self.url, self.size)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_inputs_same_key() {
    let a = CacheKey::new("https://example.com/a.png", TargetSize::new(50, 50));
    let b = CacheKey::new("https://example.com/a.png", TargetSize::new(50, 50));
    assert_eq!(a, b);
  }

  #[test]
  fn size_discriminates_keys() {
    let small = CacheKey::new("https://example.com/a.png", TargetSize::new(50, 50));
    let large = CacheKey::new("https://example.com/a.png", TargetSize::new(100, 100));
    assert_ne!(small, large);
  }

  #[test]
  fn url_discriminates_keys() {
    let a = CacheKey::new("https://example.com/a.png", TargetSize::new(50, 50));
    let b = CacheKey::new("https://example.com/b.png", TargetSize::new(50, 50));
    assert_ne!(a, b);
  }

  #[test]
  fn display_includes_url_and_size() {
    let key = CacheKey::new("https://example.com/a.png", TargetSize::new(50, 25));
    assert_eq!(key.to_string(), "https://example.com/a.png[50x25]");
  }
}
