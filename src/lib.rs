// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. error::AppError)
    clippy::module_name_repetitions
)]

//! # Palace
//!
//! A command-line tool for memory palaces. `palace explain` opens an
//! explanation of the Method of Loci in a full-screen, scrollable viewer.
//!
//! The viewer:
//! - Renders markdown to styled, word-wrapped terminal lines
//! - Frames the text in a centered, rounded box with a title and footer
//! - Reports scroll position as a percentage
//! - Scrolls by keyboard and mouse wheel
//!
//! ## Architecture
//!
//! Palace uses The Elm Architecture (TEA) pattern:
//! - **Model**: Viewer state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Event loop, model and terminal lifecycle
//! - [`config`]: Layout settings and saved defaults
//! - [`document`]: Markdown loading and rendering
//! - [`error`]: Typed errors
//! - [`highlight`]: Syntax highlighting for code blocks
//! - [`ui`]: Layout, viewport and drawing

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod highlight;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::error::AppError;
    pub use crate::ui::viewport::Viewport;
}
