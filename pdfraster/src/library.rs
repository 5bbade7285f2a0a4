//! Library lifecycle.
//!
//! A [`Library`] is the explicit context for all document work. Initializing
//! one starts the engine, and [`Library::shutdown`] tears it down. Documents
//! borrow their library, so it cannot be shut down while any remain open.

use std::path::Path;

use tracing::info;

use crate::config::EngineConfig;
use crate::document::{Document, load_document};
use crate::engine::{Engine, PdfiumEngine};
use crate::error::{EngineError, RasterError, RasterResult};

pub struct Library<E: Engine = PdfiumEngine> {
    engine: E,
}

impl Library<PdfiumEngine> {
    /// Bind and start PDFium.
    ///
    /// Only one PDFium library may be live per process; a second call before
    /// the first library is shut down fails with [`RasterError::AlreadyInitialized`].
    pub fn initialize(config: &EngineConfig) -> RasterResult<Self> {
        let engine = PdfiumEngine::bind(config).map_err(|e| match e {
            EngineError::AlreadyBound => RasterError::AlreadyInitialized,
            other => RasterError::EngineUnavailable(other),
        })?;
        info!("PDFium library initialized");
        Ok(Self { engine })
    }
}

impl<E: Engine> Library<E> {
    /// Wrap an already started engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// See [`load_document`].
    pub fn load_document(&self, path: impl AsRef<Path>) -> RasterResult<Document<'_, E>> {
        load_document(self, path)
    }

    /// Tear down the engine. Every document must already be closed.
    pub fn shutdown(self) {
        drop(self.engine);
        info!("Rendering library shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::{FakeEngine, ScriptedPage};

    #[test]
    fn test_with_engine_then_shutdown() {
        let library = Library::with_engine(FakeEngine::with_pages(vec![ScriptedPage::letter()]));
        assert_eq!(library.engine().calls(), 0);
        library.shutdown();
    }

    #[test]
    fn test_documents_closed_before_shutdown() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let library = Library::with_engine(FakeEngine::with_pages(vec![ScriptedPage::letter()]));

        let document = library.load_document(file.path()).unwrap();
        assert_eq!(library.engine().open_documents(), 1);
        document.close();
        assert_eq!(library.engine().open_documents(), 0);

        library.shutdown();
    }
}
