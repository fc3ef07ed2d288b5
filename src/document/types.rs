//! Core document types.

use ratatui::text::{Line, Span};

use crate::highlight::Background;
use crate::ui::style::{Theme, style_for_inline, style_for_line_type};

/// A rendered markdown document: styled terminal lines, wrapped once at
/// render time and never reflowed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Styled lines for display
    lines: Vec<Line<'static>>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a document from plain text, one unstyled line per source line.
    pub fn from_plain_text(source: &str) -> Self {
        Self {
            lines: source.lines().map(|l| Line::raw(l.to_string())).collect(),
        }
    }

    /// Style rendered lines with the palette for `background`.
    pub(crate) fn from_rendered(rendered: Vec<RenderedLine>, background: Background) -> Self {
        let theme = Theme::for_background(background);
        let lines = rendered
            .into_iter()
            .map(|line| line.into_styled(&theme))
            .collect();
        Self { lines }
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All styled lines.
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Lines from `offset` to `offset + count`, clamped to the document.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[Line<'static>] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Width of the widest line in terminal cells.
    pub fn max_width(&self) -> usize {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The text content of the line
    content: String,
    /// The type of line (for styling)
    line_type: LineType,
    /// Optional inline-styled spans for rendering
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    fn into_styled(self, theme: &Theme) -> Line<'static> {
        let line_style = style_for_line_type(&self.line_type, theme);
        if self.spans.is_empty() {
            return Line::from(Span::styled(self.content, line_style));
        }
        let spans = self
            .spans
            .into_iter()
            .map(|span| {
                let style = style_for_inline(line_style, span.style, theme);
                Span::styled(span.text, style)
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub fg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Empty line
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Document {
        let text = (0..count)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        Document::from_plain_text(&text)
    }

    #[test]
    fn test_visible_lines_window() {
        let doc = numbered(10);
        let window = doc.visible_lines(3, 4);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].to_string(), "line 3");
    }

    #[test]
    fn test_visible_lines_past_end_is_empty() {
        let doc = numbered(5);
        assert!(doc.visible_lines(7, 3).is_empty());
        assert_eq!(doc.visible_lines(3, usize::MAX).len(), 2);
    }

    #[test]
    fn test_max_width_counts_wide_chars() {
        let doc = Document::from_plain_text("ab\n城市");
        assert_eq!(doc.max_width(), 4);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert_eq!(doc.line_count(), 0);
        assert_eq!(doc.max_width(), 0);
    }
}
