//! Decoding fetched bytes into resized raster images

use crate::error::{DecodeError, Result};
use crate::geometry::TargetSize;
use crate::resource::ResourceFetcher;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// A decoded image, already resized to the size it was requested at.
///
/// Entries are immutable once created and shared between the store and every
/// consumer that received one, so they are handed out as `Arc<SizedImage>`.
#[derive(Debug, Clone)]
pub struct SizedImage {
  image: RgbaImage,
}

impl SizedImage {
  /// Width of the resized image in pixels
  pub fn width(&self) -> u32 {
    self.image.width()
  }

  /// Height of the resized image in pixels
  pub fn height(&self) -> u32 {
    self.image.height()
  }

  /// The decoded RGBA pixels
  pub fn image(&self) -> &RgbaImage {
    &self.image
  }

  /// Size of the pixel buffer in bytes, used for store accounting
  pub fn byte_size(&self) -> usize {
    self.image.as_raw().len()
  }
}

/// Fetch `url` and decode/resize the response to `target`.
///
/// Runs on the fetch worker pool, never on the cache context.
pub(crate) fn fetch_and_raster(
  fetcher: &dyn ResourceFetcher,
  url: &str,
  target: TargetSize,
) -> Result<SizedImage> {
  let resource = fetcher.fetch(url)?;
  decode_and_resize(&resource.bytes, target)
}

/// Decode image bytes and resize them to `target`.
///
/// A zero dimension in `target` is computed from the other dimension using
/// the source aspect ratio; a fully zero target keeps the source size.
pub(crate) fn decode_and_resize(bytes: &[u8], target: TargetSize) -> Result<SizedImage> {
  let decoded = image::load_from_memory(bytes).map_err(|e| DecodeError::InvalidImage {
    reason: e.to_string(),
  })?;
  let rgba = decoded.to_rgba8();

  let (width, height) = scaled_dimensions(rgba.width(), rgba.height(), target);
  if (width, height) == (rgba.width(), rgba.height()) {
    return Ok(SizedImage { image: rgba });
  }

  let resized = imageops::resize(&rgba, width, height, FilterType::CatmullRom);
  Ok(SizedImage { image: resized })
}

/// Resolve a requested target size against the source dimensions.
fn scaled_dimensions(src_width: u32, src_height: u32, target: TargetSize) -> (u32, u32) {
  match (target.width, target.height) {
    (0, 0) => (src_width, src_height),
    (0, height) => {
      let width = (height as f64 * src_width as f64 / src_height as f64).round();
      ((width as u32).max(1), height)
    }
    (width, 0) => {
      let height = (width as f64 * src_height as f64 / src_width as f64).round();
      (width, (height as u32).max(1))
    }
    (width, height) => (width, height),
  }
}
