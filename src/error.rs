//! Error types for md2poster
//!
//! This module defines the error types used outside of pagination, which
//! itself cannot fail. Error types are organized by category for clear
//! error handling and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O related errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Poster export errors
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Clipboard errors
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// File watcher errors
    #[error(transparent)]
    Watcher(#[from] WatcherError),
}

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File is too large
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing file
    #[error("Could not save file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error deleting a file
    #[error("Could not remove file: {path}")]
    RemoveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory operation error
    #[error("Directory error: {path}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(#[source] FileError),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(#[source] FileError),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Poster export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing a poster page failed
    #[error(transparent)]
    File(#[from] FileError),

    /// Output file stem is empty or contains a path separator
    #[error("Invalid output file name: '{0}'")]
    InvalidFileStem(String),
}

/// Clipboard related errors
#[derive(Error, Debug, Clone)]
pub enum ClipboardError {
    /// Could not access clipboard
    #[error("Failed to access clipboard: {0}")]
    AccessError(String),

    /// Error setting clipboard content
    #[error("Failed to write to clipboard: {0}")]
    WriteError(String),

    /// Requested page does not exist
    #[error("Page {requested} does not exist (document has {available} page(s))")]
    NoSuchPage { requested: usize, available: usize },
}

/// File watcher errors
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Could not initialize file watcher
    #[error("Could not start file watcher: {0}")]
    InitError(#[source] notify::Error),

    /// Could not watch path
    #[error("Could not watch path: {path}")]
    WatchError {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type alias for clipboard operations
pub type ClipboardResult<T> = Result<T, ClipboardError>;

impl FileError {
    /// Create a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound(_) => {
                "The file could not be found. It may have been moved or deleted.".to_string()
            }
            FileError::FileTooLarge { max_size, .. } => {
                format!(
                    "This file is too large to open. Maximum file size is {} bytes.",
                    max_size
                )
            }
            FileError::WriteError { .. } => {
                "Could not save the poster. Check disk space and permissions.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ClipboardError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ClipboardError::AccessError(_) => {
                "Could not access the clipboard. Another application may be using it.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl AppError {
    /// User-facing message for any error category
    pub fn user_message(&self) -> String {
        match self {
            AppError::FileIO(e) => e.user_message(),
            AppError::Export(ExportError::File(e)) => e.user_message(),
            AppError::Clipboard(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
