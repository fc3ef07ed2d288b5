//! Error types for the explain viewer.
//!
//! Only startup can fail in a way the user sees: the document cannot be
//! read, the renderer rejects its configuration, or the renderer rejects
//! the document. Once the event loop runs, out-of-range scroll offsets and
//! degenerate terminal sizes are clamped rather than reported, so the only
//! in-loop failure left is the terminal itself going away.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure inside the markdown renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The configured wrap width leaves no room for text.
    #[error("wrap width must be at least 1 column")]
    ZeroWrapWidth,

    /// The document bytes are not UTF-8 text.
    #[error("document is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Top-level error returned by [`crate::app::App`].
#[derive(Debug, Error)]
pub enum AppError {
    /// The document file is missing or unreadable.
    #[error("could not read {}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The renderer could not be built from the given options.
    #[error("could not create renderer")]
    RenderConstruction(#[source] RenderError),

    /// The renderer failed on the document content.
    #[error("could not render markdown")]
    RenderExecution(#[source] RenderError),

    /// Reading events from or drawing to the terminal failed.
    #[error("terminal I/O failed")]
    Terminal(#[source] io::Error),
}

impl AppError {
    /// Wrap a backend error whose concrete type depends on the ratatui backend.
    pub(crate) fn terminal(err: impl std::fmt::Display) -> Self {
        Self::Terminal(io::Error::other(err.to_string()))
    }

    /// True for errors raised before the terminal is taken over.
    pub const fn is_startup(&self) -> bool {
        !matches!(self, Self::Terminal(_))
    }
}
