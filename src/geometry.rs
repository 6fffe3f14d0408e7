//! Pixel geometry for requested image sizes

use std::fmt;

/// Requested target size for a cached image, in pixels.
///
/// A zero dimension means "derive this dimension from the source image's
/// aspect ratio"; a fully zero size means "keep the source size". The target
/// size participates in cache key identity, so the same URL requested at two
/// different sizes produces two independent cache entries.
///
/// # Examples
///
/// ```
/// use thumbcache::TargetSize;
///
/// let size = TargetSize::new(100, 0);
/// assert_eq!(size.width, 100);
/// assert_eq!(size.height, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetSize {
  /// Requested width in pixels (0 = derive from aspect ratio)
  pub width: u32,
  /// Requested height in pixels (0 = derive from aspect ratio)
  pub height: u32,
}

impl TargetSize {
  /// A size that requests the source image unscaled
  pub const ZERO: Self = Self {
    width: 0,
    height: 0,
  };

  /// Creates a new target size with the given dimensions
  pub const fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }

  /// Returns true when both dimensions are zero (source size requested)
  pub const fn is_zero(&self) -> bool {
    self.width == 0 && self.height == 0
  }
}

impl fmt::Display for TargetSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}
