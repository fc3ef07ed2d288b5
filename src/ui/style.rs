//! Theming and color definitions.
//!
//! The palette for rendered markdown is an explicit [`Theme`] value chosen
//! from the resolved terminal background.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineColor, InlineStyle, LineType};
use crate::highlight::Background;

/// Palette for rendered document lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Heading level 1 style
    pub h1: Style,
    /// Heading level 2 style
    pub h2: Style,
    /// Heading level 3 style
    pub h3: Style,
    /// Heading level 4 style
    pub h4: Style,
    /// Heading level 5+ style
    pub h5: Style,
    /// Code block frame and plain code
    pub code: Style,
    /// Inline code without highlighting
    pub inline_code: Style,
    /// Block quote style
    pub quote: Style,
    /// Link color, used when a span carries no color of its own
    pub link: Color,
    /// Table borders and cells
    pub table: Style,
    /// Horizontal rule style
    pub hr: Style,
    /// Emit 24-bit colors for highlighted code instead of the 256 palette
    pub truecolor: bool,
}

impl Theme {
    /// Pick the palette for `background`, probing the terminal for 24-bit color.
    pub fn for_background(background: Background) -> Self {
        let theme = match background {
            Background::Dark => Self::dark(),
            Background::Light => Self::light(),
        };
        Self {
            truecolor: supports_truecolor(),
            ..theme
        }
    }

    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            h4: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            h5: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            code: Style::default()
                .fg(Color::Indexed(245))
                .add_modifier(Modifier::DIM),
            inline_code: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::ITALIC),
            link: Color::LightBlue,
            table: Style::default(),
            hr: Style::default()
                .fg(Color::Indexed(240))
                .add_modifier(Modifier::DIM),
            truecolor: false,
        }
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Indexed(24))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Indexed(22))
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Indexed(58))
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD),
            h5: Style::default()
                .fg(Color::Indexed(54))
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(238)),
            inline_code: Style::default()
                .fg(Color::Indexed(88))
                .add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(24))
                .add_modifier(Modifier::ITALIC),
            link: Color::Blue,
            table: Style::default(),
            hr: Style::default().fg(Color::Indexed(245)),
            truecolor: false,
        }
    }
}

/// Get the style for a given line type.
pub const fn style_for_line_type(line_type: &LineType, theme: &Theme) -> Style {
    match line_type {
        LineType::Heading(1) => theme.h1,
        LineType::Heading(2) => theme.h2,
        LineType::Heading(3) => theme.h3,
        LineType::Heading(4) => theme.h4,
        LineType::Heading(_) => theme.h5,
        LineType::CodeBlock => theme.code,
        LineType::BlockQuote => theme.quote,
        LineType::HorizontalRule => theme.hr,
        LineType::Table => theme.table,
        LineType::ListItem(_) | LineType::Paragraph | LineType::Empty => Style::new(),
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle, theme: &Theme) -> Style {
    let mut style = base;

    if let Some(fg) = inline.fg {
        style = style
            .fg(fg_color(fg, theme.truecolor))
            .remove_modifier(Modifier::DIM);
    }

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.add_modifier(Modifier::UNDERLINED);
        if inline.fg.is_none() {
            style = style.fg(theme.link);
        }
    }
    if inline.code && inline.fg.is_none() {
        style = style.patch(theme.inline_code);
    }

    style
}

fn fg_color(fg: InlineColor, truecolor: bool) -> Color {
    if truecolor {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("PALACE_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let has = |value: Option<&str>, needles: &[&str]| {
        value.is_some_and(|v| {
            let lower = v.to_ascii_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    };
    has(colorterm, &["truecolor", "24bit"]) || has(term, &["direct", "truecolor"])
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for theme in [Theme::dark(), Theme::light()] {
            for level in 1..=6 {
                let style = style_for_line_type(&LineType::Heading(level), &theme);
                assert!(style.add_modifier.contains(Modifier::BOLD));
            }
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = style_for_line_type(&LineType::Heading(1), &Theme::dark());
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_light_and_dark_headings_differ() {
        let dark = style_for_line_type(&LineType::Heading(2), &Theme::dark());
        let light = style_for_line_type(&LineType::Heading(2), &Theme::light());
        assert_ne!(dark.fg, light.fg);
    }

    #[test]
    fn test_paragraph_is_unstyled() {
        let style = style_for_line_type(&LineType::Paragraph, &Theme::dark());
        assert_eq!(style, Style::new());
    }

    #[test]
    fn test_inline_color_removes_dim_modifier() {
        let base = Style::default().add_modifier(Modifier::DIM);
        let inline = InlineStyle {
            fg: Some(InlineColor { r: 255, g: 0, b: 0 }),
            ..InlineStyle::default()
        };

        let styled = style_for_inline(base, inline, &Theme::dark());
        assert!(!styled.add_modifier.contains(Modifier::DIM));
        assert_eq!(styled.fg, Some(Color::Indexed(196)));
    }

    #[test]
    fn test_truecolor_theme_keeps_rgb() {
        let theme = Theme {
            truecolor: true,
            ..Theme::dark()
        };
        let inline = InlineStyle {
            fg: Some(InlineColor { r: 1, g: 2, b: 3 }),
            ..InlineStyle::default()
        };
        let styled = style_for_inline(Style::new(), inline, &theme);
        assert_eq!(styled.fg, Some(Color::Rgb(1, 2, 3)));
    }

    #[test]
    fn test_link_uses_theme_color() {
        let inline = InlineStyle {
            link: true,
            ..InlineStyle::default()
        };
        let styled = style_for_inline(Style::new(), inline, &Theme::light());
        assert_eq!(styled.fg, Some(Color::Blue));
        assert!(styled.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_truecolor_detection_without_colorterm() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
    }

    #[test]
    fn test_truecolor_detection_with_colorterm() {
        assert!(supports_truecolor_from_env(
            Some("truecolor"),
            Some("xterm-256color")
        ));
    }

    #[test]
    fn test_fallback_indexed_color_when_not_truecolor() {
        assert_eq!(rgb_to_xterm_256(255, 0, 0), 196);
    }
}
