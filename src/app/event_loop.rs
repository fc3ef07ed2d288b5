use std::io::stdout;

use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Size;

use crate::app::terminal::{
    AltScreenGuard, CrosstermEvents, CrosstermMode, EventSource, TerminalMode,
};
use crate::app::{App, Model, update};
use crate::document::{self, RenderOptions};
use crate::error::AppError;

impl App {
    /// Load and render the document and build the initial model. Runs before
    /// the terminal is touched, so a failure here leaves the screen alone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DocumentRead`], [`AppError::RenderConstruction`] or
    /// [`AppError::RenderExecution`].
    pub fn prepare(&self) -> Result<Model, AppError> {
        let options = RenderOptions {
            wrap_width: usize::from(self.config.wrap_width),
            background: self.config.background,
        };
        let document = document::load_and_render(&self.document_path, options)?;
        tracing::info!(
            path = %self.document_path.display(),
            lines = document.line_count(),
            "document loaded"
        );
        Ok(Model::new(document, self.config.clone()))
    }

    /// Run the viewer on the real terminal until the user quits.
    ///
    /// # Errors
    ///
    /// Returns a startup error before the alternate screen is entered, or
    /// [`AppError::Terminal`] if terminal I/O fails while running.
    pub fn run(&self) -> Result<Model, AppError> {
        let model = self.prepare()?;
        let (width, height) = crossterm::terminal::size().map_err(AppError::Terminal)?;
        tracing::debug!(width, height, "terminal size");
        Self::drive(
            model,
            CrosstermMode::new(self.mouse),
            CrosstermBackend::new(stdout()),
            CrosstermEvents::new(Size::new(width, height)),
        )
    }

    /// Run the viewer against any terminal mode, backend and event source.
    ///
    /// # Errors
    ///
    /// Same as [`App::run`].
    pub fn run_with<M, B, E>(&self, mode: M, backend: B, events: E) -> Result<Model, AppError>
    where
        M: TerminalMode,
        B: Backend,
        E: EventSource,
    {
        let model = self.prepare()?;
        Self::drive(model, mode, backend, events)
    }

    fn drive<M, B, E>(mut model: Model, mode: M, backend: B, mut events: E) -> Result<Model, AppError>
    where
        M: TerminalMode,
        B: Backend,
        E: EventSource,
    {
        let mut guard = AltScreenGuard::enter(mode).map_err(AppError::Terminal)?;
        let result = Terminal::new(backend)
            .map_err(AppError::terminal)
            .and_then(|mut terminal| Self::event_loop(&mut terminal, &mut model, &mut events));
        let restored = guard.release().map_err(AppError::Terminal);
        result?;
        restored?;
        Ok(model)
    }

    fn event_loop<B: Backend, E: EventSource>(
        terminal: &mut Terminal<B>,
        model: &mut Model,
        events: &mut E,
    ) -> Result<(), AppError> {
        terminal
            .draw(|frame| crate::ui::render(model, frame))
            .map_err(AppError::terminal)?;

        while !model.should_quit {
            let Some(event) = events.next_event().map_err(AppError::Terminal)? else {
                tracing::debug!("event stream ended");
                break;
            };
            let Some(msg) = Self::handle_event(&event) else {
                continue;
            };
            tracing::trace!(?msg, "message");
            *model = update(std::mem::take(model), msg);
            if model.should_quit {
                break;
            }
            terminal
                .draw(|frame| crate::ui::render(model, frame))
                .map_err(AppError::terminal)?;
        }
        Ok(())
    }
}
