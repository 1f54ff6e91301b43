//! Messages that drive poster state transitions
//!
//! Every user action becomes one message; [`PosterState::update`]
//! turns the current state and a message into the next state.
//!
//! [`PosterState::update`]: crate::state::PosterState::update

use crate::markdown::RenderMode;

/// Discrete user actions and async results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The source text was replaced (typing, file reload)
    SourceChanged(String),

    /// A different pagination mode was selected
    ModeChanged(RenderMode),

    /// Switch between light and dark card styling
    ToggleDarkMode,

    /// Export or copy began
    ExportStarted,

    /// Export finished with the number of pages delivered
    ExportFinished(usize),

    /// Export or copy failed
    ExportFailed(String),
}
