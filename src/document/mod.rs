//! Markdown document loading and rendering.
//!
//! This module handles:
//! - Reading the document bytes from disk
//! - Rendering markdown with comrak into wrapped, styled lines
//! - Holding the rendered lines for the viewport

mod parser;
mod types;

use std::path::Path;

pub use parser::{MarkdownRenderer, RenderOptions};
pub use types::{Document, InlineColor, InlineSpan, InlineStyle, LineType, RenderedLine};

use crate::error::AppError;

/// Read the raw document bytes.
///
/// # Errors
///
/// Returns [`AppError::DocumentRead`] naming `path` when the file is missing
/// or unreadable.
pub fn load(path: &Path) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|source| AppError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and render a document in one step.
///
/// # Errors
///
/// Fails with the startup error matching whichever stage broke: reading,
/// building the renderer, or rendering.
pub fn load_and_render(path: &Path, options: RenderOptions) -> Result<Document, AppError> {
    let raw = load(path)?;
    let renderer = MarkdownRenderer::new(options).map_err(AppError::RenderConstruction)?;
    let document = renderer.render(&raw).map_err(AppError::RenderExecution)?;
    tracing::debug!(
        path = %path.display(),
        bytes = raw.len(),
        lines = document.line_count(),
        "document rendered"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Background;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.md");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, AppError::DocumentRead { .. }));
        assert!(err.to_string().contains("nope.md"));
    }

    #[test]
    fn test_load_and_render_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Palace\n\nRooms and routes.").unwrap();
        let doc = load_and_render(file.path(), RenderOptions::default()).unwrap();
        assert_eq!(doc.lines()[0].to_string(), "# Palace");
    }

    #[test]
    fn test_zero_wrap_width_is_construction_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let options = RenderOptions {
            wrap_width: 0,
            background: Background::Dark,
        };
        let err = load_and_render(file.path(), options).unwrap_err();
        assert!(matches!(err, AppError::RenderConstruction(_)));
    }

    #[test]
    fn test_binary_file_is_execution_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xc3, 0x28, 0xa0]).unwrap();
        let err = load_and_render(file.path(), RenderOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::RenderExecution(_)));
    }
}
