//! State management module for md2poster
//!
//! - `poster_state`: the document being turned into posters and the
//!   export lifecycle

mod poster_state;

pub use poster_state::*;
