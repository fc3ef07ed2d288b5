//! Viewer state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete viewer state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod terminal;
mod update;

pub use model::{Model, ViewState};
pub use terminal::{AltScreenGuard, CrosstermEvents, CrosstermMode, EventSource, TerminalMode};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::LayoutConfig;

/// Main application struct: what to show and how to show it.
#[derive(Debug, Clone)]
pub struct App {
    document_path: PathBuf,
    config: LayoutConfig,
    mouse: bool,
}

impl App {
    /// Create a viewer for the given document.
    pub fn new(document_path: PathBuf) -> Self {
        Self {
            document_path,
            config: LayoutConfig::default(),
            mouse: true,
        }
    }

    /// Replace the layout settings.
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable mouse wheel scrolling.
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }
}
