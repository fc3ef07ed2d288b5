use crate::app::Model;

/// All possible events and actions in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to beginning of document
    GoToTop,
    /// Go to end of document
    GoToBottom,

    // Terminal
    /// Terminal resized to (width, height)
    Resize(u16, u16),

    // Application
    /// Leave the viewer
    Quit,
}

impl Message {
    const fn is_navigation(self) -> bool {
        !matches!(self, Self::Resize(..) | Self::Quit)
    }
}

/// Apply one message. Navigation is ignored until the first resize.
pub fn update(mut model: Model, msg: Message) -> Model {
    if msg.is_navigation() && !model.ready {
        return model;
    }

    match msg {
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),
        Message::Resize(width, height) => model.apply_resize(width, height),
        Message::Quit => {
            tracing::info!(offset = model.viewport.offset(), "quit requested");
            model.should_quit = true;
        }
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ViewState;
    use crate::config::LayoutConfig;
    use crate::document::Document;

    fn model_with_lines(count: usize) -> Model {
        let text = (0..count)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        Model::new(Document::from_plain_text(&text), LayoutConfig::default())
    }

    fn ready_model(count: usize) -> Model {
        update(model_with_lines(count), Message::Resize(100, 40))
    }

    #[test]
    fn test_scroll_ignored_before_ready() {
        let model = update(model_with_lines(200), Message::ScrollDown(5));
        assert_eq!(model.viewport.offset(), 0);
        assert_eq!(model.state(), ViewState::NotReady);
    }

    #[test]
    fn test_resize_marks_ready() {
        let model = ready_model(200);
        assert_eq!(model.state(), ViewState::Ready);
    }

    #[test]
    fn test_quit_in_any_state() {
        let not_ready = update(model_with_lines(5), Message::Quit);
        assert!(not_ready.should_quit);
        let ready = update(ready_model(5), Message::Quit);
        assert!(ready.should_quit);
    }

    #[test]
    fn test_navigation() {
        let mut model = ready_model(200);
        model = update(model, Message::ScrollDown(3));
        assert_eq!(model.viewport.offset(), 3);
        model = update(model, Message::PageDown);
        assert_eq!(model.viewport.offset(), 25);
        model = update(model, Message::HalfPageUp);
        assert_eq!(model.viewport.offset(), 14);
        model = update(model, Message::GoToBottom);
        assert_eq!(model.viewport.offset(), 178);
        model = update(model, Message::PageUp);
        assert_eq!(model.viewport.offset(), 156);
        model = update(model, Message::HalfPageDown);
        assert_eq!(model.viewport.offset(), 167);
        model = update(model, Message::ScrollUp(7));
        assert_eq!(model.viewport.offset(), 160);
        model = update(model, Message::GoToTop);
        assert_eq!(model.viewport.offset(), 0);
    }

    #[test]
    fn test_shrinking_terminal_keeps_offset_in_range() {
        let mut model = ready_model(200);
        model = update(model, Message::ScrollDown(50));
        assert_eq!(model.viewport.offset(), 50);

        model = update(model, Message::Resize(40, 10));
        let max = 200 - usize::from(model.viewport.height());
        assert!(model.viewport.offset() <= max);
        assert_eq!(model.viewport.offset(), 50);
    }

    #[test]
    fn test_growing_terminal_reclamps_offset() {
        let mut model = ready_model(200);
        model = update(model, Message::ScrollDown(50));
        // 250 rows: 200-row box, 190-row viewport, max offset 10
        model = update(model, Message::Resize(100, 250));
        assert_eq!(model.viewport.height(), 190);
        assert_eq!(model.viewport.offset(), 10);
    }

    #[test]
    fn test_fitting_document_never_scrolls() {
        let mut model = ready_model(10);
        for msg in [
            Message::ScrollDown(1),
            Message::PageDown,
            Message::GoToBottom,
            Message::HalfPageDown,
        ] {
            model = update(model, msg);
            assert_eq!(model.viewport.offset(), 0);
            assert!(model.viewport.scroll_percent().abs() < f64::EPSILON);
        }
    }
}
