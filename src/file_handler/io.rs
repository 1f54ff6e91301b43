//! File I/O operations with encoding detection and atomic writes
//!
//! Provides safe file reading and writing with:
//! - UTF-8 and UTF-16 encoding detection
//! - Atomic writes so a poster is never left half-written
//! - File size limits

use crate::error::{FileError, FileResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Maximum source file size allowed (10 MB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
    /// Unknown/binary (lossy UTF-8 conversion used)
    Unknown,
}

/// Result of reading a file
#[derive(Debug, Clone)]
pub struct FileReadResult {
    /// The file content as a string
    pub content: String,
    /// Detected encoding
    pub encoding: FileEncoding,
    /// Original file size in bytes
    pub size_bytes: u64,
    /// Whether lossy conversion was used
    pub lossy: bool,
}

impl FileReadResult {
    fn from_bytes(bytes: &[u8]) -> Self {
        let encoding = detect_encoding(bytes);
        let (content, lossy) = decode_content(bytes, encoding);
        Self {
            content,
            encoding,
            size_bytes: bytes.len() as u64,
            lossy,
        }
    }
}

/// Detect file encoding from raw bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return FileEncoding::Utf8Bom;
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return FileEncoding::Utf16Le;
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return FileEncoding::Utf16Be;
    }

    if std::str::from_utf8(bytes).is_ok() {
        FileEncoding::Utf8
    } else {
        FileEncoding::Unknown
    }
}

/// Decode bytes to string based on detected encoding
fn decode_content(bytes: &[u8], encoding: FileEncoding) -> (String, bool) {
    match encoding {
        FileEncoding::Utf8 => decode_utf8(bytes),
        FileEncoding::Utf8Bom => decode_utf8(&bytes[3..]),
        FileEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        FileEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        FileEncoding::Unknown => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

fn decode_utf8(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let mut lossy = bytes.len() % 2 != 0;
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));

    let result: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    (result, lossy)
}

fn check_size(path: &Path, size_bytes: u64) -> FileResult<()> {
    if size_bytes > MAX_FILE_SIZE {
        return Err(FileError::FileTooLarge {
            path: path.to_path_buf(),
            size: size_bytes,
            max_size: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Read a file with encoding detection
pub async fn read_file(path: impl AsRef<Path>) -> FileResult<FileReadResult> {
    let path = path.as_ref();

    let metadata = tokio::fs::metadata(path).await.map_err(|e| read_error(path, e))?;
    check_size(path, metadata.len())?;

    let bytes = tokio::fs::read(path).await.map_err(|e| read_error(path, e))?;
    let result = FileReadResult::from_bytes(&bytes);
    if result.lossy {
        log::warn!("{} is not valid {:?}; invalid bytes were replaced", path.display(), result.encoding);
    }
    Ok(result)
}

/// Read a file synchronously with encoding detection
pub fn read_file_sync(path: impl AsRef<Path>) -> FileResult<FileReadResult> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
    check_size(path, metadata.len())?;

    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    Ok(FileReadResult::from_bytes(&bytes))
}

/// Read the whole of standard input as a document
pub async fn read_stdin() -> FileResult<FileReadResult> {
    let stdin_path = PathBuf::from("<stdin>");
    let mut bytes = Vec::new();
    tokio::io::stdin()
        .take(MAX_FILE_SIZE + 1)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| read_error(&stdin_path, e))?;
    check_size(&stdin_path, bytes.len() as u64)?;
    Ok(FileReadResult::from_bytes(&bytes))
}

fn read_error(path: &Path, source: std::io::Error) -> FileError {
    if source.kind() == std::io::ErrorKind::NotFound {
        FileError::NotFound(path.to_path_buf())
    } else {
        FileError::ReadError {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Temp file next to `path`, hidden and timestamped
fn temp_path_for(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    parent.join(format!(".{}.{}.tmp", filename, timestamp))
}

/// Write content to a file using atomic write
///
/// The file is either fully written or unchanged.
pub async fn write_file_atomic(path: impl AsRef<Path>, content: &str) -> FileResult<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let write_result = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = write_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(FileError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(FileError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}

/// Write content to a file synchronously using atomic write
pub fn write_file_atomic_sync(path: impl AsRef<Path>, content: &str) -> FileResult<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let write_result = (|| {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        Ok::<(), std::io::Error>(())
    })();

    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FileError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FileError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}

/// Ensure a directory exists, creating it and its parents if needed
pub async fn ensure_dir(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| FileError::DirectoryError {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    Ok(())
}

/// Synchronous [`ensure_dir`]
pub fn ensure_dir_sync(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| FileError::DirectoryError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
