//! Poster editor state
//!
//! An immutable snapshot of everything the poster view depends on. State
//! is never mutated in place; each [`Message`] produces a new value.

use crate::markdown::{paginate, RenderMode};
use crate::message::Message;

/// Progress of the current export or copy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportStatus {
    /// Nothing in progress
    #[default]
    Idle,
    /// Export or copy running
    Exporting,
    /// Last export delivered this many pages
    Done(usize),
    /// Last export failed with a user-facing message
    Failed(String),
}

impl ExportStatus {
    /// Whether export actions should be disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, ExportStatus::Exporting)
    }
}

/// Snapshot of the poster editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PosterState {
    /// Markdown source, replaced wholesale on every change
    pub source: String,
    /// Selected pagination mode
    pub mode: RenderMode,
    /// Dark card styling
    pub dark_mode: bool,
    /// Export lifecycle
    pub status: ExportStatus,
}

impl PosterState {
    /// Create state for a document
    pub fn new(source: impl Into<String>, mode: RenderMode) -> Self {
        Self {
            source: source.into(),
            mode,
            ..Self::default()
        }
    }

    /// Apply a message, returning the next state
    #[must_use]
    pub fn update(self, message: Message) -> Self {
        match message {
            Message::SourceChanged(source) => Self { source, ..self },
            Message::ModeChanged(mode) => Self { mode, ..self },
            Message::ToggleDarkMode => Self {
                dark_mode: !self.dark_mode,
                ..self
            },
            Message::ExportStarted => Self {
                status: ExportStatus::Exporting,
                ..self
            },
            Message::ExportFinished(count) => Self {
                status: ExportStatus::Done(count),
                ..self
            },
            Message::ExportFailed(reason) => {
                log::warn!("Export failed: {}", reason);
                Self {
                    status: ExportStatus::Failed(reason),
                    ..self
                }
            }
        }
    }

    /// Current page sequence, recomputed on every call
    pub fn pages(&self) -> Vec<String> {
        paginate(&self.source, self.mode)
    }

    /// Number of pages in the current sequence
    pub fn page_count(&self) -> usize {
        self.pages().len()
    }
}
