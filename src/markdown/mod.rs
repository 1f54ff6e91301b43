//! Markdown module for md2poster
//!
//! Handles turning a Markdown document into poster cards:
//! - Pagination into pages
//! - Poster rendering and export (HTML)
//! - The built-in sample document

pub mod export;
pub mod paginate;
pub mod sample;

pub use export::{page_file_name, PosterExporter, PosterOptions, RenderedPage, DEFAULT_FILE_STEM};
pub use paginate::{paginate, split_auto, split_manual, ParseRenderModeError, RenderMode, PAGE_LINE_COUNT};
pub use sample::SAMPLE_DOCUMENT;
