//! Scroll state for the document pane.
//!
//! The [`Viewport`] owns the rendered document and tracks which window of it
//! is visible. Every operation clamps instead of failing, so the offset always
//! stays within `0..=max(0, total_lines - height)`.

use ratatui::text::Line;

use crate::document::Document;

/// The visible window onto a rendered document.
///
/// # Example
///
/// ```
/// use palace::document::Document;
/// use palace::ui::viewport::Viewport;
///
/// let text = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
/// let mut vp = Viewport::new(80, 24);
/// vp.set_content(Document::from_plain_text(&text));
/// assert_eq!(vp.visible_slice().len(), 24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_slice()[0].to_string(), "10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    content: Document,
}

impl Viewport {
    /// Create an empty viewport of the given inner size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            offset: 0,
            content: Document::empty(),
        }
    }

    /// Install the document. Installing again replaces it and re-clamps.
    pub fn set_content(&mut self, content: Document) {
        self.content = content;
        self.clamp();
    }

    /// The installed document.
    pub const fn content(&self) -> &Document {
        &self.content
    }

    /// Get the current scroll offset.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Get the viewport width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the viewport height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of lines in the document.
    pub fn total_lines(&self) -> usize {
        self.content.line_count()
    }

    /// The lines currently in view. Shorter than `height` when the document
    /// ends first; callers leave the remaining rows blank.
    pub fn visible_slice(&self) -> &[Line<'static>] {
        self.content
            .visible_lines(self.offset, usize::from(self.height))
    }

    /// Fraction of the scrollable range above the top edge, as 0.0..=100.0.
    ///
    /// A document that fits entirely reports 0.
    pub fn scroll_percent(&self) -> f64 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 0.0;
        }

        // Line counts are far below f64's exact integer range
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.offset as f64 / max_offset as f64;
        fraction.clamp(0.0, 1.0) * 100.0
    }

    /// Move by a signed number of lines.
    pub fn scroll_by(&mut self, delta: isize) {
        if delta.is_negative() {
            self.scroll_up(delta.unsigned_abs());
        } else {
            self.scroll_down(delta.unsigned_abs());
        }
    }

    /// Jump so `offset` is the first visible line.
    pub fn scroll_to(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    /// Scroll up by n lines.
    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Scroll down by n lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    /// Scroll up one page.
    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height));
    }

    /// Scroll up half a page.
    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    /// Scroll down half a page.
    pub fn half_page_down(&mut self) {
        self.scroll_down(usize::from(self.height) / 2);
    }

    /// Go to the beginning of the document.
    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Go to the end of the document.
    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Change the inner size. The document is not reflowed; the offset is
    /// re-clamped but otherwise kept.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    /// Largest valid offset.
    pub fn max_offset(&self) -> usize {
        self.total_lines().saturating_sub(usize::from(self.height))
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}
