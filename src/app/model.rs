use ratatui::layout::Size;

use crate::config::LayoutConfig;
use crate::document::Document;
use crate::ui::layout::{self, FrameLayout, TITLE, footer_info};
use crate::ui::viewport::Viewport;

/// Whether the first terminal size has arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Waiting for the terminal size; only a placeholder is drawn.
    NotReady,
    /// Laid out and scrollable. Never goes back to `NotReady`.
    Ready,
}

/// The complete viewer state.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Document and scroll position
    pub viewport: Viewport,
    /// Set by the first resize
    pub ready: bool,
    /// Last known full terminal size
    pub terminal_size: Size,
    /// Colors, padding and scale for the box
    pub config: LayoutConfig,
    /// Set by a quit input; the event loop stops at the next check
    pub should_quit: bool,
}

impl Model {
    /// Create a not-ready model holding `document`.
    pub fn new(document: Document, config: LayoutConfig) -> Self {
        let mut viewport = Viewport::new(0, 0);
        viewport.set_content(document);
        Self {
            viewport,
            ready: false,
            terminal_size: Size::default(),
            config,
            should_quit: false,
        }
    }

    pub const fn state(&self) -> ViewState {
        if self.ready {
            ViewState::Ready
        } else {
            ViewState::NotReady
        }
    }

    /// Recompute the viewport for a new terminal size. The first call marks
    /// the model ready.
    pub fn apply_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = Size::new(width, height);
        let inner = layout::viewport_size(self.terminal_size, &self.config);
        self.viewport.resize(inner.width, inner.height);

        if self.ready {
            tracing::debug!(
                width,
                height,
                viewport_width = inner.width,
                viewport_height = inner.height,
                offset = self.viewport.offset(),
                "resize applied"
            );
        } else {
            self.ready = true;
            tracing::info!(
                width,
                height,
                lines = self.viewport.total_lines(),
                "viewer ready"
            );
        }
    }

    /// Box geometry for the last known terminal size.
    pub fn layout(&self) -> FrameLayout {
        FrameLayout::compute(
            self.terminal_size,
            TITLE,
            &footer_info(self.viewport.scroll_percent()),
            &self.config,
        )
    }
}
