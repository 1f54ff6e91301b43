//! File handler module for md2poster
//!
//! Handles all file system operations including:
//! - Reading source documents with encoding detection
//! - Atomic writes of exported posters
//! - Watching the source document for live re-rendering

pub mod io;
pub mod watcher;

pub use io::*;
pub use watcher::*;
