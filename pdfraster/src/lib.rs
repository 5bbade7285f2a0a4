//! Rasterize PDF pages into RGBA pixel buffers.
//!
//! The whole surface is six operations:
//!
//! - [`Library::initialize`] / [`Library::shutdown`] start and stop the engine
//! - [`load_document`] / [`close_document`] open and release a document
//! - [`render_page`] paints one page at a chosen pixel width
//! - [`free_bitmap`] releases the result
//!
//! ```no_run
//! use pdfraster::{EngineConfig, Library, free_bitmap};
//!
//! let library = Library::initialize(&EngineConfig::default())?;
//! let document = library.load_document("report.pdf")?;
//! let bitmap = document.render_page(0, 300)?;
//! assert_eq!(bitmap.stride(), bitmap.width() as usize * 4);
//! free_bitmap(Some(bitmap));
//! document.close();
//! library.shutdown();
//! # Ok::<(), pdfraster::RasterError>(())
//! ```
//!
//! Every operation is synchronous. Callers serialize all calls, including
//! calls on distinct documents.

pub mod bitmap;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod library;
pub mod raster;

pub use bitmap::{Bitmap, free_bitmap};
pub use config::{EngineConfig, RasterConfig, RenderDefaults, load_config, load_config_from};
pub use document::{Document, close_document, load_document};
pub use error::{EngineError, ErrorKind, RasterError, RasterResult};
pub use library::Library;
pub use raster::{RasterDimensions, bgra_to_rgba, render_page, render_pages};
