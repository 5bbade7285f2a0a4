use std::path::PathBuf;

use thiserror::Error;

/// Main rasterizer error type
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Document handle is absent")]
    InvalidHandle,

    #[error("Target width must be positive, got {width}")]
    InvalidWidth { width: i32 },

    #[error("Document path is empty")]
    InvalidPath,

    #[error("Rendering engine is already initialized in this process")]
    AlreadyInitialized,

    #[error("Cannot read document at {}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document at {} could not be parsed", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("Page {index} out of range (document has {page_count} pages)")]
    PageOutOfRange { index: i32, page_count: i32 },

    #[error("Failed to load page {index}")]
    PageLoad {
        index: i32,
        #[source]
        source: EngineError,
    },

    #[error("Page {index} has degenerate size {width}x{height}")]
    DegenerateContent { index: i32, width: f32, height: f32 },

    #[error("Failed to allocate {width}x{height} render surface")]
    SurfaceAllocation {
        width: i32,
        height: i32,
        #[source]
        source: EngineError,
    },

    #[error("Failed to allocate {bytes} byte pixel buffer")]
    BufferAllocation { bytes: usize },

    #[error("Rendering engine unavailable")]
    EngineUnavailable(#[source] EngineError),

    #[error("Image encoding failed")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Rendering engine errors, carried as the source of a [`RasterError`]
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("PDFium is already bound in this process")]
    AlreadyBound,

    #[error("Failed to bind PDFium library: {message}")]
    Binding { message: String },

    #[error("Failed to open document: {message}")]
    Document { message: String },

    #[error("Failed to load page {index}: {message}")]
    Page { index: u16, message: String },

    #[error("Failed to render surface: {message}")]
    Surface { message: String },

    #[error("Surface buffer holds {actual} bytes, {required} required")]
    BufferSize { actual: usize, required: usize },
}

/// Coarse classification of a [`RasterError`] for diagnostics.
///
/// Callers that only care about success or failure can ignore this entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    ParseFailure,
    DegenerateContent,
    ResourceExhaustion,
    Environment,
}

impl RasterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RasterError::InvalidHandle
            | RasterError::InvalidWidth { .. }
            | RasterError::InvalidPath
            | RasterError::AlreadyInitialized => ErrorKind::InvalidInput,
            RasterError::UnreadableFile { .. } | RasterError::PageOutOfRange { .. } => {
                ErrorKind::NotFound
            }
            RasterError::MalformedDocument { .. } | RasterError::PageLoad { .. } => {
                ErrorKind::ParseFailure
            }
            RasterError::DegenerateContent { .. } => ErrorKind::DegenerateContent,
            RasterError::SurfaceAllocation { .. } | RasterError::BufferAllocation { .. } => {
                ErrorKind::ResourceExhaustion
            }
            RasterError::EngineUnavailable(_)
            | RasterError::Image(_)
            | RasterError::Config { .. } => ErrorKind::Environment,
        }
    }

    /// Short machine-readable code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            RasterError::InvalidHandle => "invalid_handle",
            RasterError::InvalidWidth { .. } => "invalid_width",
            RasterError::InvalidPath => "invalid_path",
            RasterError::AlreadyInitialized => "already_initialized",
            RasterError::UnreadableFile { .. } => "unreadable_file",
            RasterError::MalformedDocument { .. } => "malformed_document",
            RasterError::PageOutOfRange { .. } => "page_out_of_range",
            RasterError::PageLoad { .. } => "page_load_error",
            RasterError::DegenerateContent { .. } => "degenerate_page",
            RasterError::SurfaceAllocation { .. } => "surface_allocation",
            RasterError::BufferAllocation { .. } => "buffer_allocation",
            RasterError::EngineUnavailable(_) => "engine_unavailable",
            RasterError::Image(_) => "image_error",
            RasterError::Config { .. } => "config_error",
        }
    }
}

/// Result type alias for rasterizer operations
pub type RasterResult<T> = Result<T, RasterError>;
