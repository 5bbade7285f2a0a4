//! Scripted in-memory engine for tests.
//!
//! Tracks live documents and pages so tests can assert that every
//! acquired engine resource is released, and counts calls so tests can assert
//! that early failures never reach the engine.

use std::cell::Cell;
use std::path::Path;

use super::{BYTES_PER_PIXEL, Engine, EngineDocument, EnginePage, PaintRequest};
use crate::error::EngineError;

#[derive(Debug, Clone)]
pub(crate) struct ScriptedPage {
    pub width: f32,
    pub height: f32,
    /// BGRA bytes painted over the top half of the surface.
    pub ink: Option<[u8; 4]>,
    pub fail_load: bool,
}

impl ScriptedPage {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ink: None,
            fail_load: false,
        }
    }

    pub fn letter() -> Self {
        Self::sized(612.0, 792.0)
    }

    pub fn inked(mut self, bgra: [u8; 4]) -> Self {
        self.ink = Some(bgra);
        self
    }

    pub fn broken() -> Self {
        Self {
            fail_load: true,
            ..Self::letter()
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    pages: Vec<ScriptedPage>,
    reject_documents: bool,
    fail_surfaces: bool,
    open_documents: Cell<usize>,
    open_pages: Cell<usize>,
    calls: Cell<usize>,
    last_request: Cell<Option<PaintRequest>>,
}

fn inc(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

fn dec(cell: &Cell<usize>) {
    cell.set(cell.get() - 1);
}

impl FakeEngine {
    pub fn with_pages(pages: Vec<ScriptedPage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn rejecting_documents(mut self) -> Self {
        self.reject_documents = true;
        self
    }

    pub fn failing_surfaces(mut self) -> Self {
        self.fail_surfaces = true;
        self
    }

    pub fn open_documents(&self) -> usize {
        self.open_documents.get()
    }

    pub fn open_pages(&self) -> usize {
        self.open_pages.get()
    }

    /// Total engine entry points invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<PaintRequest> {
        self.last_request.get()
    }
}

impl Engine for FakeEngine {
    type Document<'a>
        = FakeDocument<'a>
    where
        Self: 'a;

    fn open_document<'a>(&'a self, path: &Path) -> Result<FakeDocument<'a>, EngineError> {
        inc(&self.calls);
        if self.reject_documents {
            return Err(EngineError::Document {
                message: format!("{} is not a PDF", path.display()),
            });
        }
        inc(&self.open_documents);
        Ok(FakeDocument { engine: self })
    }
}

pub(crate) struct FakeDocument<'a> {
    engine: &'a FakeEngine,
}

impl Drop for FakeDocument<'_> {
    fn drop(&mut self) {
        dec(&self.engine.open_documents);
    }
}

impl EngineDocument for FakeDocument<'_> {
    type Page<'p>
        = FakePage<'p>
    where
        Self: 'p;

    fn page_count(&self) -> i32 {
        inc(&self.engine.calls);
        self.engine.pages.len() as i32
    }

    fn load_page(&self, index: u16) -> Result<FakePage<'_>, EngineError> {
        inc(&self.engine.calls);
        let script = match self.engine.pages.get(usize::from(index)) {
            Some(script) if !script.fail_load => script.clone(),
            _ => {
                return Err(EngineError::Page {
                    index,
                    message: "page dictionary unreadable".to_string(),
                });
            }
        };
        inc(&self.engine.open_pages);
        Ok(FakePage {
            engine: self.engine,
            script,
        })
    }
}

pub(crate) struct FakePage<'a> {
    engine: &'a FakeEngine,
    script: ScriptedPage,
}

impl Drop for FakePage<'_> {
    fn drop(&mut self) {
        dec(&self.engine.open_pages);
    }
}

impl EnginePage for FakePage<'_> {
    fn width(&self) -> f32 {
        self.script.width
    }

    fn height(&self) -> f32 {
        self.script.height
    }

    fn paint(&self, request: &PaintRequest, dst: &mut [u8]) -> Result<(), EngineError> {
        inc(&self.engine.calls);
        self.engine.last_request.set(Some(*request));
        request.check_buffer(dst)?;
        if self.engine.fail_surfaces {
            return Err(EngineError::Surface {
                message: "out of memory".to_string(),
            });
        }

        let (a, r, g, b) = request.background_channels();
        for pixel in dst.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&[b, g, r, a]);
        }
        if let Some(ink) = self.script.ink {
            let inked = (request.height as usize / 2) * request.width as usize * BYTES_PER_PIXEL;
            for pixel in dst[..inked].chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&ink);
            }
        }
        Ok(())
    }
}
