//! Boundary with the PDF rendering engine.
//!
//! The rasterizer only needs a narrow slice of an engine: open a document,
//! count and load pages, and paint a page as BGRA into a buffer the caller
//! owns. Documents and pages release their engine resources on drop, so
//! cleanup happens on every exit path without explicit close calls.

#[cfg(test)]
pub(crate) mod fake;
pub mod pdfium;

use std::path::Path;

use crate::error::EngineError;

pub use pdfium::PdfiumEngine;

/// Opaque white with full alpha, as `0xAARRGGBB`.
pub const WHITE_ARGB: u32 = 0xFFFF_FFFF;

/// Bytes per pixel of every surface the engine hands back.
pub const BYTES_PER_PIXEL: usize = 4;

/// A loaded rendering engine. Documents borrow it, so it outlives all of them.
pub trait Engine {
    type Document<'a>: EngineDocument
    where
        Self: 'a;

    fn open_document<'a>(&'a self, path: &Path) -> Result<Self::Document<'a>, EngineError>;
}

/// An engine-owned document. Dropping it closes the document.
pub trait EngineDocument {
    type Page<'p>: EnginePage
    where
        Self: 'p;

    /// Number of pages, queried from the engine on every call.
    fn page_count(&self) -> i32;

    fn load_page(&self, index: u16) -> Result<Self::Page<'_>, EngineError>;
}

/// An engine-owned page. Dropping it closes the page.
pub trait EnginePage {
    /// Intrinsic width in page units.
    fn width(&self) -> f32;

    /// Intrinsic height in page units.
    fn height(&self) -> f32;

    /// Fill `dst` with the request background and paint the page over all of it.
    ///
    /// `dst` holds `request.byte_len()` bytes and receives B-G-R-A pixels, rows
    /// top to bottom, no row padding. Any surface the engine creates for this
    /// is destroyed before returning.
    fn paint(&self, request: &PaintRequest, dst: &mut [u8]) -> Result<(), EngineError>;
}

/// Page rotation applied while painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Rotate180,
    Counterclockwise90,
}

/// Rendering mode switches passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintFlags {
    /// Draw annotations and form widgets.
    pub annotations: bool,
    /// Apply print-oriented rendering rules.
    pub printing: bool,
}

impl PaintFlags {
    pub const ANNOTATIONS_FOR_PRINT: PaintFlags = PaintFlags {
        annotations: true,
        printing: true,
    };
}

/// Everything the engine needs to paint one page onto a fresh surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintRequest {
    pub width: i32,
    pub height: i32,
    pub background: u32,
    pub rotation: Rotation,
    pub flags: PaintFlags,
}

impl PaintRequest {
    /// Full-surface paint on opaque white, unrotated, with annotations in print mode.
    pub fn for_page(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            background: WHITE_ARGB,
            rotation: Rotation::None,
            flags: PaintFlags::ANNOTATIONS_FOR_PRINT,
        }
    }

    /// Bytes needed to hold the painted surface.
    pub fn byte_len(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize * BYTES_PER_PIXEL
    }

    /// Reject a destination that is not exactly one surface long.
    pub fn check_buffer(&self, dst: &[u8]) -> Result<(), EngineError> {
        let required = self.byte_len();
        if dst.len() != required {
            return Err(EngineError::BufferSize {
                actual: dst.len(),
                required,
            });
        }
        Ok(())
    }

    /// Background split into `(alpha, red, green, blue)`.
    pub fn background_channels(&self) -> (u8, u8, u8, u8) {
        let [a, r, g, b] = self.background.to_be_bytes();
        (a, r, g, b)
    }
}
