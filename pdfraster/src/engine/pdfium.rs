//! PDFium-backed engine using pdfium-render.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use pdfium_render::prelude::*;
use tracing::debug;

use super::{Engine, EngineDocument, EnginePage, PaintRequest, Rotation};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Set while a `PdfiumEngine` is alive; PDFium supports one library instance per process.
static ENGINE_LIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide claim on the PDFium library, released on drop.
#[derive(Debug)]
pub(crate) struct EngineClaim(());

impl EngineClaim {
    pub(crate) fn acquire() -> Option<Self> {
        ENGINE_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| EngineClaim(()))
    }
}

impl Drop for EngineClaim {
    fn drop(&mut self) {
        ENGINE_LIVE.store(false, Ordering::Release);
    }
}

/// A bound and initialized PDFium library.
///
/// `Pdfium::new` initializes the library and dropping it tears the library down.
/// Field order matters: `pdfium` is destroyed before the claim is released.
pub struct PdfiumEngine {
    pdfium: Pdfium,
    _claim: EngineClaim,
}

impl PdfiumEngine {
    /// Bind and initialize PDFium (dynamically linked).
    ///
    /// Searches for libpdfium in:
    /// 1. `library_path`, when configured (no further search)
    /// 2. Each of `search_paths`, in order
    /// 3. System library paths
    ///
    /// Fails with [`EngineError::AlreadyBound`] while another engine is alive.
    pub fn bind(config: &EngineConfig) -> Result<Self, EngineError> {
        let claim = EngineClaim::acquire().ok_or(EngineError::AlreadyBound)?;
        let pdfium = bind_library(config)?;
        Ok(PdfiumEngine {
            pdfium,
            _claim: claim,
        })
    }
}

fn bind_library(config: &EngineConfig) -> Result<Pdfium, EngineError> {
    if let Some(path) = &config.library_path {
        debug!(path = %path.display(), "Binding PDFium from configured path");
        return Pdfium::bind_to_library(path.as_path())
            .map(Pdfium::new)
            .map_err(|e| EngineError::Binding {
                message: format!("{}: {}", path.display(), e),
            });
    }

    for dir in &config.search_paths {
        let candidate = Pdfium::pdfium_platform_library_name_at_path(dir);
        match Pdfium::bind_to_library(candidate) {
            Ok(bindings) => {
                debug!(dir = %dir.display(), "Bound PDFium library");
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => debug!(dir = %dir.display(), error = %e, "PDFium not found"),
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| EngineError::Binding {
            message: format!(
                "not found in search paths or system library paths. Install libpdfium or set PDFRASTER__ENGINE__LIBRARY_PATH: {}",
                e
            ),
        })
}

impl Engine for PdfiumEngine {
    type Document<'a>
        = PdfiumDocument<'a>
    where
        Self: 'a;

    fn open_document<'a>(&'a self, path: &Path) -> Result<PdfiumDocument<'a>, EngineError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| EngineError::Document {
                message: e.to_string(),
            })?;
        Ok(PdfiumDocument { document })
    }
}

pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl EngineDocument for PdfiumDocument<'_> {
    type Page<'p>
        = PdfiumPage<'p>
    where
        Self: 'p;

    fn page_count(&self) -> i32 {
        self.document.pages().len() as i32
    }

    fn load_page(&self, index: u16) -> Result<PdfiumPage<'_>, EngineError> {
        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|e| EngineError::Page {
                index,
                message: e.to_string(),
            })?;
        Ok(PdfiumPage { page })
    }
}

pub struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl EnginePage for PdfiumPage<'_> {
    fn width(&self) -> f32 {
        self.page.width().value
    }

    fn height(&self) -> f32 {
        self.page.height().value
    }

    fn paint(&self, request: &PaintRequest, dst: &mut [u8]) -> Result<(), EngineError> {
        request.check_buffer(dst)?;
        let settings = RenderSettings::for_request(request);
        let surface_error = |e: PdfiumError| EngineError::Surface {
            message: e.to_string(),
        };

        // SAFETY: `check_buffer` guarantees `dst` is exactly `width * height * 4`
        // bytes, which is what PDFium computes for a BGRA bitmap created with a
        // zero stride. The bitmap is destroyed at the end of this scope, before
        // the borrow of `dst` ends, and PDFium never frees an external buffer.
        let mut bitmap = unsafe {
            PdfBitmap::from_bytes(
                settings.width,
                settings.height,
                settings.format,
                dst,
                self.page.bindings(),
            )
        }
        .map_err(surface_error)?;

        self.page
            .render_into_bitmap_with_config(&mut bitmap, &settings.to_config())
            .map_err(surface_error)
    }
}

/// Everything `paint` asks of pdfium-render, kept apart from `PdfRenderConfig`
/// so the mapping can be checked without a bound library.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderSettings {
    width: Pixels,
    height: Pixels,
    format: PdfBitmapFormat,
    /// `FPDF_REVERSE_BYTE_ORDER`. pdfium-render turns it on by default, which
    /// makes PDFium write R-G-B-A into a BGRA bitmap.
    reverse_byte_order: bool,
    /// Clear color as `[red, green, blue, alpha]`.
    clear_rgba: [u8; 4],
    rotation: PdfPageRenderRotation,
    annotations: bool,
    form_data: bool,
    print_quality: bool,
}

impl RenderSettings {
    fn for_request(request: &PaintRequest) -> Self {
        let (a, r, g, b) = request.background_channels();
        RenderSettings {
            width: request.width,
            height: request.height,
            format: PdfBitmapFormat::BGRA,
            reverse_byte_order: false,
            clear_rgba: [r, g, b, a],
            rotation: render_rotation(request.rotation),
            annotations: request.flags.annotations,
            form_data: request.flags.annotations,
            print_quality: request.flags.printing,
        }
    }

    fn to_config(&self) -> PdfRenderConfig {
        let [r, g, b, a] = self.clear_rgba;
        PdfRenderConfig::new()
            .set_fixed_size(self.width, self.height)
            .set_format(self.format)
            .set_reverse_byte_order(self.reverse_byte_order)
            .clear_before_rendering(true)
            .set_clear_color(PdfColor::new(r, g, b, a))
            .rotate(self.rotation, false)
            .render_annotations(self.annotations)
            .render_form_data(self.form_data)
            .use_print_quality(self.print_quality)
    }
}

fn render_rotation(rotation: Rotation) -> PdfPageRenderRotation {
    match rotation {
        Rotation::None => PdfPageRenderRotation::None,
        Rotation::Clockwise90 => PdfPageRenderRotation::Degrees90,
        Rotation::Rotate180 => PdfPageRenderRotation::Degrees180,
        Rotation::Counterclockwise90 => PdfPageRenderRotation::Degrees270,
    }
}
