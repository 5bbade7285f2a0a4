//! Page rasterization.
//!
//! A page is painted at a caller-chosen pixel width. The height follows from
//! the page's aspect ratio, rounded up so the last partial row is never cut
//! off. The output buffer is reserved up front without aborting on failure,
//! the engine paints BGRA straight into it, and the bytes are reordered to RGBA
//! in place before the buffer is handed to the returned [`Bitmap`].

use tracing::debug;

use crate::bitmap::Bitmap;
use crate::document::Document;
use crate::engine::{BYTES_PER_PIXEL, Engine, EngineDocument, EnginePage, PaintRequest};
use crate::error::{RasterError, RasterResult};

/// Output size of a page rendered at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterDimensions {
    pub width: i32,
    pub height: i32,
    pub stride: usize,
}

impl RasterDimensions {
    /// Scale a `page_width x page_height` page (in page units) to `target_width` pixels.
    ///
    /// `target_width` must already be positive. Fails with
    /// [`RasterError::DegenerateContent`] for non-positive or non-finite page
    /// sizes and [`RasterError::BufferAllocation`] when the result cannot be
    /// addressed.
    pub fn compute(
        page_index: i32,
        target_width: i32,
        page_width: f32,
        page_height: f32,
    ) -> RasterResult<Self> {
        let degenerate = || RasterError::DegenerateContent {
            index: page_index,
            width: page_width,
            height: page_height,
        };
        let usable = |extent: f32| extent.is_finite() && extent > 0.0;
        if !usable(page_width) || !usable(page_height) {
            return Err(degenerate());
        }

        let scale = f64::from(target_width) / f64::from(page_width);
        let height = (f64::from(page_height) * scale).ceil();
        if height < 1.0 {
            return Err(degenerate());
        }
        if height > f64::from(i32::MAX) {
            return Err(RasterError::BufferAllocation { bytes: usize::MAX });
        }
        let height = height as i32;

        let stride = target_width as usize * BYTES_PER_PIXEL;
        if stride.checked_mul(height as usize).is_none() {
            return Err(RasterError::BufferAllocation { bytes: usize::MAX });
        }

        Ok(Self {
            width: target_width,
            height,
            stride,
        })
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.stride * self.height as usize
    }
}

/// Render one page of `document` to an RGBA bitmap `target_width` pixels wide.
///
/// Checks run in order and stop at the first failure: absent handle,
/// non-positive width, page index outside `[0, page_count)`, page load,
/// degenerate page size, buffer allocation, painting. A page acquired before a
/// failure is released before returning, and a failure never invalidates the
/// document.
pub fn render_page<E: Engine>(
    document: Option<&Document<'_, E>>,
    page_index: i32,
    target_width: i32,
) -> RasterResult<Bitmap> {
    let document = document.ok_or(RasterError::InvalidHandle)?;
    if target_width <= 0 {
        return Err(RasterError::InvalidWidth {
            width: target_width,
        });
    }

    let page_count = document.inner.page_count();
    if page_index < 0 || page_index >= page_count {
        return Err(RasterError::PageOutOfRange {
            index: page_index,
            page_count,
        });
    }
    let engine_index = u16::try_from(page_index).map_err(|_| RasterError::PageOutOfRange {
        index: page_index,
        page_count,
    })?;

    let page = document
        .inner
        .load_page(engine_index)
        .map_err(|source| RasterError::PageLoad {
            index: page_index,
            source,
        })?;

    let dims = RasterDimensions::compute(page_index, target_width, page.width(), page.height())?;
    debug!(
        page = page_index,
        page_size = format!("{:.1}x{:.1}", page.width(), page.height()),
        output_size = format!("{}x{}", dims.width, dims.height),
        "Rendering page"
    );

    let mut pixels = allocate_pixels(dims.byte_len())?;
    page.paint(&PaintRequest::for_page(dims.width, dims.height), &mut pixels)
        .map_err(|source| RasterError::SurfaceAllocation {
            width: dims.width,
            height: dims.height,
            source,
        })?;
    drop(page);

    bgra_to_rgba(&mut pixels);

    Ok(Bitmap::from_rgba(
        pixels,
        dims.width as u32,
        dims.height as u32,
    ))
}

/// Render several pages at the same width, stopping at the first failure.
pub fn render_pages<E: Engine>(
    document: &Document<'_, E>,
    page_indices: impl IntoIterator<Item = i32>,
    target_width: i32,
) -> RasterResult<Vec<(i32, Bitmap)>> {
    page_indices
        .into_iter()
        .map(|index| Ok((index, render_page(Some(document), index, target_width)?)))
        .collect()
}

/// Zeroed buffer of `len` bytes, reporting allocation failure instead of aborting.
fn allocate_pixels(len: usize) -> RasterResult<Vec<u8>> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| RasterError::BufferAllocation { bytes: len })?;
    pixels.resize(len, 0);
    Ok(pixels)
}

/// Reorder BGRA pixels to RGBA in place by swapping bytes 0 and 2 of every pixel.
///
/// Trailing bytes that do not form a whole pixel are left untouched.
pub fn bgra_to_rgba(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        pixel.swap(0, 2);
    }
}
