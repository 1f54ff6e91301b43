//! md2poster - turn Markdown into paginated poster cards
//!
//! The core is [`markdown::paginate`], a pure function splitting a
//! document into pages. Around it sit poster rendering and export,
//! clipboard delivery, source watching, configuration, and the
//! message-driven [`state::PosterState`].

pub mod clipboard;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod markdown;
pub mod message;
pub mod state;

pub use markdown::{paginate, RenderMode};
