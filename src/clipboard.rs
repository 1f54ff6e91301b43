//! Clipboard delivery of poster pages
//!
//! Uses the arboard crate for cross-platform clipboard access.

use crate::error::{ClipboardError, ClipboardResult};
use arboard::Clipboard;

/// Put `text` on the system clipboard
pub fn copy_text(text: &str) -> ClipboardResult<()> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::WriteError(e.to_string()))
}

/// Look up page `number` (1-based) in `pages`
pub fn select_page(pages: &[String], number: usize) -> ClipboardResult<&str> {
    number
        .checked_sub(1)
        .and_then(|index| pages.get(index))
        .map(String::as_str)
        .ok_or(ClipboardError::NoSuchPage {
            requested: number,
            available: pages.len(),
        })
}

/// Copy page `number` (1-based) to the clipboard
pub fn copy_page(pages: &[String], number: usize) -> ClipboardResult<()> {
    let page = select_page(pages, number)?;
    copy_text(page)?;
    log::info!("Copied page {} of {} to the clipboard", number, pages.len());
    Ok(())
}
