//! Document handles.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::bitmap::Bitmap;
use crate::engine::{Engine, EngineDocument, PdfiumEngine};
use crate::error::{RasterError, RasterResult};
use crate::library::Library;

/// An open PDF document.
///
/// The engine document inside is not reachable from outside this crate; the
/// handle can only be passed back to rasterizer operations. It is released on
/// drop or through [`Document::close`].
pub struct Document<'lib, E: Engine + 'lib = PdfiumEngine> {
    pub(crate) inner: E::Document<'lib>,
    path: PathBuf,
}

impl<'lib, E: Engine + 'lib> Document<'lib, E> {
    /// Number of pages, queried from the engine on every call.
    pub fn page_count(&self) -> i32 {
        self.inner.page_count()
    }

    /// Path this document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// See [`crate::raster::render_page`].
    pub fn render_page(&self, page_index: i32, target_width: i32) -> RasterResult<Bitmap> {
        crate::raster::render_page(Some(self), page_index, target_width)
    }

    /// Release the document and its engine resources.
    pub fn close(self) {
        drop(self);
    }
}

impl<'lib, E: Engine + 'lib> std::fmt::Debug for Document<'lib, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("path", &self.path).finish()
    }
}

/// Open the PDF at `path`.
///
/// An empty path fails with [`RasterError::InvalidPath`], a path that cannot be
/// opened for reading with [`RasterError::UnreadableFile`], and anything the
/// engine refuses with [`RasterError::MalformedDocument`].
pub fn load_document<E: Engine>(
    library: &Library<E>,
    path: impl AsRef<Path>,
) -> RasterResult<Document<'_, E>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(RasterError::InvalidPath);
    }

    let unreadable = |source| RasterError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    };
    let metadata = File::open(path)
        .and_then(|file| file.metadata())
        .map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(unreadable(std::io::Error::other("not a regular file")));
    }

    let inner = library
        .engine()
        .open_document(path)
        .map_err(|source| RasterError::MalformedDocument {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), pages = inner.page_count(), "Opened document");
    Ok(Document {
        inner,
        path: path.to_path_buf(),
    })
}

/// Close a document. Absent handles are ignored.
pub fn close_document<E: Engine>(document: Option<Document<'_, E>>) {
    if let Some(document) = document {
        document.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::{FakeEngine, ScriptedPage};
    use crate::error::ErrorKind;

    fn library(pages: usize) -> Library<FakeEngine> {
        Library::with_engine(FakeEngine::with_pages(vec![ScriptedPage::letter(); pages]))
    }

    #[test]
    fn test_load_reports_page_count() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let library = library(3);

        let document = load_document(&library, file.path()).unwrap();
        assert_eq!(document.page_count(), 3);
        assert_eq!(document.path(), file.path());
    }

    #[test]
    fn test_empty_path_never_reaches_engine() {
        let library = library(1);
        let err = load_document(&library, "").unwrap_err();
        assert!(matches!(err, RasterError::InvalidPath));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(library.engine().calls(), 0);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(1);

        let err = load_document(&library, dir.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, RasterError::UnreadableFile { .. }));
        assert_eq!(library.engine().calls(), 0);
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(1);

        let err = load_document(&library, dir.path()).unwrap_err();
        assert!(matches!(err, RasterError::UnreadableFile { .. }));
    }

    #[test]
    fn test_engine_refusal_is_malformed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let library = Library::with_engine(
            FakeEngine::with_pages(vec![ScriptedPage::letter()]).rejecting_documents(),
        );

        let err = load_document(&library, file.path()).unwrap_err();
        assert!(matches!(err, RasterError::MalformedDocument { .. }));
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert_eq!(library.engine().open_documents(), 0);
    }

    #[test]
    fn test_close_document_releases_engine_document() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let library = library(1);

        let document = load_document(&library, file.path()).unwrap();
        assert_eq!(library.engine().open_documents(), 1);
        close_document(Some(document));
        assert_eq!(library.engine().open_documents(), 0);

        close_document::<FakeEngine>(None);
    }
}
