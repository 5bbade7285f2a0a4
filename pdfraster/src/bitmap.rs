//! RGBA pixel buffers produced by the rasterizer.

use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::engine::BYTES_PER_PIXEL;
use crate::error::RasterResult;

/// A rendered page: tightly packed RGBA rows, top to bottom.
///
/// Invariants: `stride == width * 4` and `pixels.len() == stride * height`.
/// Only the rasterizer constructs bitmaps, so a `Bitmap` is always fully
/// populated. The pixel buffer is owned exclusively and freed on drop.
#[derive(Debug, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
}

impl Bitmap {
    pub(crate) fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        let stride = width as usize * BYTES_PER_PIXEL;
        debug_assert_eq!(pixels.len(), stride * height as usize);
        Self {
            pixels,
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// One row of RGBA bytes, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        Some(&self.pixels[start..start + self.stride])
    }

    /// The `[r, g, b, a]` value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width {
            return None;
        }
        let offset = x as usize * BYTES_PER_PIXEL;
        let row = self.row(y)?;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&row[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Convert into an `image` buffer without copying.
    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> RasterResult<()> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        debug!(
            path = %path.display(),
            size = format!("{}x{}", self.width, self.height),
            "Saved bitmap"
        );
        Ok(())
    }
}

/// Release a bitmap. Absent bitmaps are ignored.
///
/// Dropping a `Bitmap` has the same effect; this exists for callers that want
/// the release to be explicit at the call site.
pub fn free_bitmap(bitmap: Option<Bitmap>) {
    drop(bitmap);
}
