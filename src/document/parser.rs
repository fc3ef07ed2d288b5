//! Markdown rendering with comrak.
//!
//! The renderer turns raw document bytes into styled lines wrapped at a fixed
//! width. Wrapping happens exactly once; the viewer never reflows.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{Document, InlineSpan, InlineStyle, LineType, RenderedLine};
use crate::error::RenderError;
use crate::highlight::{Background, highlight_code};

/// Columns of blank space kept to the right of code inside its frame.
const CODE_RIGHT_PADDING: usize = 3;

/// Fixed renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub wrap_width: usize,
    pub background: Background,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wrap_width: usize::from(crate::config::DEFAULT_WRAP_WIDTH),
            background: Background::Dark,
        }
    }
}

/// Renders markdown into a [`Document`].
///
/// # Example
///
/// ```
/// use palace::document::{MarkdownRenderer, RenderOptions};
///
/// let renderer = MarkdownRenderer::new(RenderOptions::default()).unwrap();
/// let doc = renderer.render(b"# Hello\n\nWorld").unwrap();
/// assert!(doc.line_count() >= 3);
/// ```
#[derive(Debug)]
pub struct MarkdownRenderer {
    options: RenderOptions,
    comrak: Options,
}

impl MarkdownRenderer {
    /// Build a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ZeroWrapWidth`] when `wrap_width` is 0.
    pub fn new(options: RenderOptions) -> Result<Self, RenderError> {
        if options.wrap_width == 0 {
            return Err(RenderError::ZeroWrapWidth);
        }
        Ok(Self {
            options,
            comrak: comrak_options(),
        })
    }

    /// Render raw document bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidUtf8`] when `raw` is not UTF-8.
    pub fn render(&self, raw: &[u8]) -> Result<Document, RenderError> {
        let source = std::str::from_utf8(raw)?;
        let arena = Arena::new();
        let root = parse_document(&arena, source, &self.comrak);

        let mut ctx = RenderContext {
            lines: Vec::new(),
            wrap_width: self.options.wrap_width,
            background: self.options.background,
        };
        ctx.process_node(root, 0, None);
        while ctx
            .lines
            .last()
            .is_some_and(|line| matches!(line.line_type(), LineType::Empty))
        {
            ctx.lines.pop();
        }

        Ok(Document::from_rendered(ctx.lines, self.options.background))
    }
}

fn comrak_options() -> Options {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options
}

struct RenderContext {
    lines: Vec<RenderedLine>,
    wrap_width: usize,
    background: Background,
}

impl RenderContext {
    fn blank(&mut self) {
        self.lines
            .push(RenderedLine::new(String::new(), LineType::Empty));
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.wrap_width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }

    fn process_node<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        depth: usize,
        list_marker: Option<&str>,
    ) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                let gap = usize::from(!self.lines.is_empty());
                ensure_trailing_empty_lines(&mut self.lines, gap);
                let prefix = format!("{} ", "#".repeat(usize::from(heading.level)));
                let spans = vec![InlineSpan::new(extract_text(node), InlineStyle::default())];
                let indent = " ".repeat(prefix.len());
                self.push_wrapped(&spans, LineType::Heading(heading.level), &prefix, &indent);
                self.blank();
            }

            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, "", "");
                self.blank();
            }

            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .filter(|s| !s.is_empty());
                self.render_code_block(language, &code_block.literal);
                self.blank();
            }

            NodeValue::List(list) => {
                let list_depth = depth + 1;
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                let max_number = list.start + node.children().count().saturating_sub(1);
                let number_width = max_number.to_string().len();

                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => format!(
                            "{:>number_width$}{delimiter} ",
                            list.start + index
                        ),
                    };
                    self.process_node(child, list_depth, Some(&marker));
                }
                if depth == 0 {
                    self.blank();
                }
            }

            NodeValue::Item(_) | NodeValue::TaskItem(_) => {
                self.render_item(node, depth, list_marker);
            }

            NodeValue::BlockQuote => {
                self.render_blockquote(node, 1);
                self.blank();
            }

            NodeValue::ThematicBreak => {
                self.lines.push(RenderedLine::new(
                    "─".repeat(self.wrap_width),
                    LineType::HorizontalRule,
                ));
                self.blank();
            }

            NodeValue::Table(_) => {
                for line in render_table(node, self.wrap_width) {
                    self.lines.push(RenderedLine::new(line, LineType::Table));
                }
                self.blank();
            }

            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let continuation = " ".repeat(display_width(&label));
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, &label, &continuation);
                self.blank();
            }

            NodeValue::HtmlBlock(html) => {
                for raw in html.literal.lines() {
                    let spans = vec![InlineSpan::new(raw.to_string(), InlineStyle::default())];
                    self.push_wrapped(&spans, LineType::Paragraph, "", "");
                }
                self.blank();
            }

            _ => {
                for child in node.children() {
                    self.process_node(child, depth, list_marker);
                }
            }
        }
    }

    fn render_item<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, list_marker: Option<&str>) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let marker = match &node.data.borrow().value {
            NodeValue::TaskItem(symbol) => task_marker(symbol.is_some()).to_string(),
            _ => list_marker.unwrap_or("- ").to_string(),
        };
        let prefix_first = format!("{indent}{marker}");
        let prefix_next = format!("{indent}{}", " ".repeat(display_width(&marker)));
        let mut rendered_paragraphs = 0usize;

        for child in node.children() {
            if matches!(child.data.borrow().value, NodeValue::Paragraph) {
                if rendered_paragraphs > 0 {
                    self.lines
                        .push(RenderedLine::new(String::new(), LineType::ListItem(depth)));
                }
                let prefix = if rendered_paragraphs == 0 {
                    &prefix_first
                } else {
                    &prefix_next
                };
                let spans = collect_inline_spans(child);
                self.push_wrapped(&spans, LineType::ListItem(depth), prefix, &prefix_next);
                rendered_paragraphs += 1;
            } else {
                self.process_node(child, depth, None);
            }
        }

        if rendered_paragraphs == 0 {
            let spans = collect_inline_spans(node);
            self.push_wrapped(&spans, LineType::ListItem(depth), &prefix_first, &prefix_next);
        }
    }

    fn render_blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = quote_prefix(quote_depth);

        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                }
                NodeValue::BlockQuote => {
                    self.render_blockquote(child, quote_depth + 1);
                }
                _ => {
                    for raw_line in extract_text(child).lines() {
                        let spans =
                            vec![InlineSpan::new(raw_line.to_string(), InlineStyle::default())];
                        self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                    }
                }
            }
        }
    }

    fn render_code_block(&mut self, language: Option<&str>, literal: &str) {
        // Frame takes "│ " on the left and padding plus " │" on the right.
        let content_width = literal
            .lines()
            .map(display_width)
            .max()
            .unwrap_or(0)
            .min(
                self.wrap_width
                    .saturating_sub(4 + CODE_RIGHT_PADDING)
                    .max(1),
            );
        let frame_inner_width = content_width + 2 + CODE_RIGHT_PADDING;

        let label = format!(" {} ", language.unwrap_or("code"));
        let visible_label = truncate_text(&label, frame_inner_width);
        let top = format!(
            "┌{visible_label}{}┐",
            "─".repeat(frame_inner_width.saturating_sub(display_width(&visible_label)))
        );
        self.lines.push(RenderedLine::new(top, LineType::CodeBlock));

        for highlighted in highlight_code(language, literal, self.background) {
            let trimmed = truncate_spans(&highlighted, content_width);
            let used = display_width(&spans_to_string(&trimmed));
            let padding = " ".repeat(content_width.saturating_sub(used) + CODE_RIGHT_PADDING);

            let mut line_spans = Vec::with_capacity(trimmed.len() + 2);
            line_spans.push(InlineSpan::new("│ ".to_string(), InlineStyle::default()));
            line_spans.extend(trimmed);
            line_spans.push(InlineSpan::new(format!("{padding} │"), InlineStyle::default()));
            let content = spans_to_string(&line_spans);
            self.lines.push(RenderedLine::with_spans(
                content,
                LineType::CodeBlock,
                line_spans,
            ));
        }

        self.lines.push(RenderedLine::new(
            format!("└{}┘", "─".repeat(frame_inner_width)),
            LineType::CodeBlock,
        ));
    }
}

const fn task_marker(checked: bool) -> &'static str {
    if checked { "✓ " } else { "□ " }
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| matches!(line.line_type(), LineType::Empty))
        .count();
    for _ in existing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

fn quote_prefix(depth: usize) -> String {
    let mut prefix = String::from("  ");
    for _ in 0..depth {
        prefix.push_str("│ ");
    }
    prefix
}

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    for row in &mut rows {
        row.resize(num_cols, String::new());
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(display_width(cell));
        }
    }

    // Row width is 1 + sum(col_width + 3); shrink the widest column until it fits.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        let Some((widest, _)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if col_widths[widest] <= 1 {
            break;
        }
        col_widths[widest] -= 1;
    }

    let mid = render_table_border(&col_widths, '├', '┼', '┤');
    let mut lines = vec![render_table_border(&col_widths, '┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        lines.push(render_table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 {
            lines.push(mid.clone());
        }
    }
    lines.push(render_table_border(&col_widths, '└', '┴', '┘'));
    lines
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        match &row_node.data.borrow().value {
            NodeValue::TableRow(header) => has_header |= *header,
            _ => continue,
        }

        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| {
                extract_text(cell)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        rows.push(cells);
    }

    (alignments, rows, has_header)
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let inner = widths
        .iter()
        .map(|width| "─".repeat(width + 2))
        .collect::<Vec<_>>()
        .join(&middle.to_string());
    format!("{left}{inner}{right}")
}

fn render_table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(display_width(&content));
        let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => (padding, 0),
            TableAlignment::Center => (padding / 2, padding - padding / 2),
            TableAlignment::Left | TableAlignment::None => (0, padding),
        };
        out.push(' ');
        out.push_str(&" ".repeat(left));
        out.push_str(&content);
        out.push_str(&" ".repeat(right));
        out.push_str(" │");
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => {
            text.push('`');
            text.push_str(&c.literal);
            text.push('`');
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str("[^");
            text.push_str(&reference.name);
            text.push(']');
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    let mut next = style;
    match &node.data.borrow().value {
        // Nested blocks are rendered by their own pass.
        NodeValue::List(_) | NodeValue::Item(_) => return,
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
            return;
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                link: style.link,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
            return;
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
            return;
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
            return;
        }
        NodeValue::Emph => next.emphasis = true,
        NodeValue::Strong => next.strong = true,
        NodeValue::Strikethrough => next.strikethrough = true,
        NodeValue::Link(_) => next.link = true,
        _ => {}
    }
    for child in node.children() {
        collect_inline_spans_recursive(child, next, spans);
    }
}

/// Greedy word wrap over styled spans. Widths are terminal cells.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens = spans.iter().flat_map(split_inline_tokens);

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = start_line(prefix_first, &mut current);
    let mut has_word = false;

    for token in tokens {
        let token_len = display_width(token.text());
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(finish_line(&mut current));
            current_len = start_line(prefix_next, &mut current);
            has_word = false;
        }

        // Drop leading whitespace at wrapped line starts.
        if token_is_ws && !has_word {
            continue;
        }

        if !token_is_ws && current_len + token_len > width {
            // A single word wider than the line is split by cells.
            for piece in split_long_token(&token, width.saturating_sub(current_len).max(1), width) {
                if has_word {
                    lines.push(finish_line(&mut current));
                    current_len = start_line(prefix_next, &mut current);
                }
                current_len += display_width(piece.text());
                current.push(piece);
                has_word = true;
            }
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word |= !token_is_ws;
    }

    if has_word {
        lines.push(finish_line(&mut current));
    } else {
        lines.push(current);
    }
    lines
}

/// Take a line that holds at least one word, dropping trailing whitespace.
fn finish_line(current: &mut Vec<InlineSpan>) -> Vec<InlineSpan> {
    while current
        .last()
        .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        current.pop();
    }
    std::mem::take(current)
}

fn start_line(prefix: &str, current: &mut Vec<InlineSpan>) -> usize {
    if prefix.is_empty() {
        return 0;
    }
    current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
    display_width(prefix)
}

fn split_long_token(token: &InlineSpan, first: usize, rest: usize) -> Vec<InlineSpan> {
    let mut pieces = Vec::new();
    let mut buf = String::new();
    let mut buf_width = 0usize;
    let mut limit = first;
    for ch in token.text().chars() {
        let ch_width = ch.width().unwrap_or(0);
        if buf_width + ch_width > limit && !buf.is_empty() {
            pieces.push(InlineSpan::new(std::mem::take(&mut buf), token.style()));
            buf_width = 0;
            limit = rest.max(1);
        }
        buf.push(ch);
        buf_width += ch_width;
    }
    if !buf.is_empty() {
        pieces.push(InlineSpan::new(buf, token.style()));
    }
    pieces
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        if remaining == 0 {
            break;
        }
        let taken = truncate_text(span.text(), remaining);
        let taken_width = display_width(&taken);
        if !taken.is_empty() {
            out.push(InlineSpan::new(taken, span.style()));
        }
        if taken_width < display_width(span.text()) {
            break;
        }
        remaining -= taken_width;
    }
    out
}
