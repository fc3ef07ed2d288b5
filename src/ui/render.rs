use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect, Size};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::app::Model;
use crate::config::LayoutConfig;

use super::layout::{FrameLayout, TITLE, footer_info};
use super::viewport::Viewport;

/// Text drawn before the first terminal size is known.
pub const LOADING: &str = "Loading...";

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    if !model.ready {
        frame.render_widget(Paragraph::new(LOADING), area);
        return;
    }

    let info = footer_info(model.viewport.scroll_percent());
    let layout = FrameLayout::compute(Size::from(area), TITLE, &info, &model.config);
    let boxed = compose_box(&layout, &model.viewport, &info, &model.config);
    blit(&boxed, layout.origin, frame.buffer_mut());
}

/// Draw the whole box into its own buffer, anchored at (0, 0).
pub fn compose_box(
    layout: &FrameLayout,
    viewport: &Viewport,
    info: &str,
    config: &LayoutConfig,
) -> Buffer {
    let mut buf = Buffer::empty(Rect::new(0, 0, layout.box_size.width, layout.box_size.height));
    let outer = buf.area;

    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(config.border_color))
        .render(outer, &mut buf);

    // Header: title label, then a rule out to the body width. When a label is
    // wider than the body the rest of the row stays blank.
    let title_style = Style::new()
        .fg(config.title_color)
        .add_modifier(Modifier::BOLD);
    let title_area = Rect {
        width: layout.title_width.min(layout.header.width),
        ..layout.header
    };
    render_label(TITLE, title_style, title_area, config, &mut buf);
    draw_rule(
        layout.header.x + title_area.width,
        layout.header.y + 1,
        layout.body.width.saturating_sub(title_area.width),
        &mut buf,
    );

    // Body: visible document lines; rows past the document end stay blank.
    let body = layout.body;
    for (row, line) in (body.y..body.bottom()).zip(viewport.visible_slice()) {
        buf.set_line(body.x, row, line, body.width);
    }

    // Footer: a rule out to the body width, then the info label.
    let info_width = layout.info_width.min(layout.footer.width);
    let rule_width = layout.body.width.saturating_sub(info_width);
    draw_rule(layout.footer.x, layout.footer.y + 1, rule_width, &mut buf);
    let info_area = Rect {
        x: layout.footer.x + rule_width,
        width: info_width,
        ..layout.footer
    };
    render_label(
        info,
        Style::new().fg(config.info_color),
        info_area,
        config,
        &mut buf,
    );

    buf
}

fn render_label(text: &str, style: Style, area: Rect, config: &LayoutConfig, buf: &mut Buffer) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .padding(Padding::horizontal(config.label_padding_x));
    Paragraph::new(Span::styled(text.to_string(), style))
        .block(block)
        .render(area, buf);
}

fn draw_rule(x: u16, y: u16, width: u16, buf: &mut Buffer) {
    if width == 0 {
        return;
    }
    buf.set_string(x, y, "─".repeat(usize::from(width)), Style::new());
}

/// Copy `src` into `dst` with its top-left corner at `origin`, dropping
/// whatever falls outside `dst`.
fn blit(src: &Buffer, origin: Position, dst: &mut Buffer) {
    for y in 0..src.area.height {
        for x in 0..src.area.width {
            let (Some(tx), Some(ty)) = (origin.x.checked_add(x), origin.y.checked_add(y)) else {
                continue;
            };
            let (Some(cell), Some(target)) = (src.cell((x, y)), dst.cell_mut((tx, ty))) else {
                continue;
            };
            *target = cell.clone();
        }
    }
}
