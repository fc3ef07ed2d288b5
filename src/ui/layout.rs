//! Geometry of the centered explain box.
//!
//! Everything here is a pure function of the terminal size, the label texts
//! and [`LayoutConfig`]. Subtractions saturate at zero, so a terminal smaller
//! than the chrome yields a squashed layout instead of an error.

use ratatui::layout::{Position, Rect, Size};
use unicode_width::UnicodeWidthStr;

use crate::config::LayoutConfig;

/// Title shown in the header label.
pub const TITLE: &str = "palace — Explain Mode";

/// Rows taken by a bordered label: top border, text, bottom border.
pub const LABEL_HEIGHT: u16 = 3;

/// Footer text for a scroll position given as 0.0..=100.0.
pub fn footer_info(percent: f64) -> String {
    format!("{percent:>3.0}%  |  ↑↓ scroll  |  q quit")
}

/// Inner size of the scrollable document area.
pub fn viewport_size(terminal: Size, config: &LayoutConfig) -> Size {
    let scaled = scaled_box(terminal, config.scale_percent);
    let chrome_height = LABEL_HEIGHT * 2;
    Size::new(
        scaled.width.saturating_sub(config.viewport_padding),
        scaled
            .height
            .saturating_sub(chrome_height)
            .saturating_sub(config.viewport_padding),
    )
}

/// `scale_percent` of the terminal in each direction, rounded down.
pub fn scaled_box(terminal: Size, scale_percent: u16) -> Size {
    let scale = |v: u16| {
        let scaled = u32::from(v) * u32::from(scale_percent) / 100;
        u16::try_from(scaled).unwrap_or(u16::MAX)
    };
    Size::new(scale(terminal.width), scale(terminal.height))
}

/// Width of `text` once wrapped in a bordered, padded label.
pub fn label_width(text: &str, config: &LayoutConfig) -> u16 {
    let text_width = u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX);
    text_width
        .saturating_add(config.label_padding_x.saturating_mul(2))
        .saturating_add(2)
}

/// Placement of every part of the box. `header`, `body` and `footer` are
/// relative to the box's top-left corner; `origin` places the box in the
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Top-left corner of the box in terminal coordinates
    pub origin: Position,
    /// Outer size of the box including border and padding
    pub box_size: Size,
    /// Title label plus trailing rule
    pub header: Rect,
    /// Document lines
    pub body: Rect,
    /// Leading rule plus scroll/key-hint label
    pub footer: Rect,
    /// Width of the title label
    pub title_width: u16,
    /// Width of the footer label
    pub info_width: u16,
}

impl FrameLayout {
    /// Lay out the box for `terminal`, sized from the scaled viewport.
    pub fn compute(terminal: Size, title: &str, info: &str, config: &LayoutConfig) -> Self {
        let viewport = viewport_size(terminal, config);
        let title_width = label_width(title, config);
        let info_width = label_width(info, config);

        // The rule pads each label out to the viewport width; a label wider
        // than the viewport widens the whole stack.
        let content_width = viewport.width.max(title_width).max(info_width);
        let content_height = LABEL_HEIGHT
            .saturating_add(viewport.height)
            .saturating_add(LABEL_HEIGHT);

        let inset_x = config.box_padding_x.saturating_add(1);
        let inset_y = config.box_padding_y.saturating_add(1);
        let box_size = Size::new(
            content_width.saturating_add(inset_x.saturating_mul(2)),
            content_height.saturating_add(inset_y.saturating_mul(2)),
        );

        let header = Rect::new(inset_x, inset_y, content_width, LABEL_HEIGHT);
        let body = Rect::new(
            inset_x,
            inset_y.saturating_add(LABEL_HEIGHT),
            viewport.width,
            viewport.height,
        );
        let footer = Rect::new(
            inset_x,
            body.y.saturating_add(viewport.height),
            content_width,
            LABEL_HEIGHT,
        );

        let origin = Position::new(
            terminal.width.saturating_sub(box_size.width) / 2,
            terminal.height.saturating_sub(box_size.height) / 2,
        );

        Self {
            origin,
            box_size,
            header,
            body,
            footer,
            title_width,
            info_width,
        }
    }

    /// The box in terminal coordinates. May extend past a tiny terminal.
    pub const fn area(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y,
            width: self.box_size.width,
            height: self.box_size.height,
        }
    }

    /// Inner document size.
    pub const fn viewport(&self) -> Size {
        Size::new(self.body.width, self.body.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute(width: u16, height: u16) -> FrameLayout {
        let config = LayoutConfig::default();
        FrameLayout::compute(
            Size::new(width, height),
            TITLE,
            &footer_info(0.0),
            &config,
        )
    }

    #[test]
    fn test_footer_info_format() {
        assert_eq!(footer_info(0.0), "  0%  |  ↑↓ scroll  |  q quit");
        assert_eq!(footer_info(42.4), " 42%  |  ↑↓ scroll  |  q quit");
        assert_eq!(footer_info(100.0), "100%  |  ↑↓ scroll  |  q quit");
    }

    #[test]
    fn test_footer_width_is_stable_while_scrolling() {
        let config = LayoutConfig::default();
        let top = label_width(&footer_info(0.0), &config);
        let bottom = label_width(&footer_info(100.0), &config);
        assert_eq!(top, bottom);
    }

    #[test]
    fn test_scaled_box_rounds_down() {
        assert_eq!(scaled_box(Size::new(100, 40), 80), Size::new(80, 32));
        assert_eq!(scaled_box(Size::new(99, 39), 80), Size::new(79, 31));
    }

    #[test]
    fn test_viewport_size_subtracts_chrome() {
        let config = LayoutConfig::default();
        // 80x32 box, minus padding 4 and two 3-row labels
        assert_eq!(
            viewport_size(Size::new(100, 40), &config),
            Size::new(76, 22)
        );
    }

    #[test]
    fn test_viewport_size_floors_at_zero() {
        let config = LayoutConfig::default();
        assert_eq!(viewport_size(Size::new(3, 3), &config), Size::new(0, 0));
        assert_eq!(viewport_size(Size::new(0, 0), &config), Size::new(0, 0));
    }

    #[test]
    fn test_label_width() {
        let config = LayoutConfig::default();
        // text + one cell of padding each side + two border cells
        assert_eq!(label_width("abc", &config), 7);
        assert_eq!(label_width(TITLE, &config), 25);
    }

    #[test]
    fn test_box_is_centered() {
        let layout = compute(100, 40);
        // content 76 wide + 2 padding + 1 border each side
        assert_eq!(layout.box_size, Size::new(82, 32));
        assert_eq!(layout.origin, Position::new(9, 4));
    }

    #[test]
    fn test_sections_stack_vertically() {
        let layout = compute(100, 40);
        assert_eq!(layout.header, Rect::new(3, 2, 76, 3));
        assert_eq!(layout.body, Rect::new(3, 5, 76, 22));
        assert_eq!(layout.footer, Rect::new(3, 27, 76, 3));
        assert_eq!(layout.footer.bottom() + 2, layout.box_size.height);
    }

    #[test]
    fn test_narrow_terminal_widens_to_labels() {
        let layout = compute(20, 40);
        assert_eq!(layout.viewport().width, 12);
        assert!(layout.header.width >= layout.info_width);
        assert!(layout.header.width >= layout.title_width);
    }

    #[test]
    fn test_oversized_box_pins_to_top_left() {
        let layout = compute(10, 5);
        assert_eq!(layout.origin, Position::new(0, 0));
        assert_eq!(layout.viewport(), Size::new(4, 0));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn viewport_never_exceeds_scaled_box(
                width in 0..1000u16,
                height in 0..500u16,
                scale in 10..=100u16,
            ) {
                let config = LayoutConfig { scale_percent: scale, ..LayoutConfig::default() };
                let terminal = Size::new(width, height);
                let vp = viewport_size(terminal, &config);
                let scaled = scaled_box(terminal, scale);
                prop_assert!(vp.width <= scaled.width);
                prop_assert!(vp.height <= scaled.height);
                prop_assert!(scaled.width <= width);
                prop_assert!(scaled.height <= height);
            }

            #[test]
            fn box_fits_and_is_centered_when_it_can(
                width in 0..1000u16,
                height in 0..500u16,
            ) {
                let layout = compute(width, height);
                let area = layout.area();
                if layout.box_size.width <= width {
                    let left = area.x;
                    let right = width - area.right();
                    prop_assert!(right == left || right == left + 1);
                } else {
                    prop_assert_eq!(area.x, 0);
                }
                if layout.box_size.height <= height {
                    let top = area.y;
                    let bottom = height - area.bottom();
                    prop_assert!(bottom == top || bottom == top + 1);
                } else {
                    prop_assert_eq!(area.y, 0);
                }
            }

            #[test]
            fn compute_is_deterministic(width in 0..1000u16, height in 0..500u16) {
                prop_assert_eq!(compute(width, height), compute(width, height));
            }
        }
    }
}
