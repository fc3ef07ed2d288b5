//! Terminal driver seams.
//!
//! [`TerminalMode`] switches the terminal into and out of full-screen mode and
//! [`EventSource`] yields input. The crossterm implementations drive a real
//! terminal; tests substitute scripted ones.

use std::io::{self, stdout};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::Size;

/// Entering and leaving full-screen mode.
pub trait TerminalMode {
    /// Switch to raw input on the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the terminal.
    fn enter(&mut self) -> io::Result<()>;

    /// Restore the terminal as it was before [`TerminalMode::enter`].
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the terminal.
    fn leave(&mut self) -> io::Result<()>;
}

/// Raw mode plus alternate screen on stdout, optionally with mouse capture.
#[derive(Debug, Clone, Copy)]
pub struct CrosstermMode {
    mouse: bool,
}

impl CrosstermMode {
    pub const fn new(mouse: bool) -> Self {
        Self { mouse }
    }
}

impl TerminalMode for CrosstermMode {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        if self.mouse {
            execute!(stdout(), EnableMouseCapture)?;
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        // Undo every step even if an earlier one fails; report the first error.
        let mouse = if self.mouse {
            execute!(stdout(), DisableMouseCapture)
        } else {
            Ok(())
        };
        let screen = execute!(stdout(), LeaveAlternateScreen);
        let raw = disable_raw_mode();
        mouse.and(screen).and(raw)
    }
}

/// Holds the terminal in full-screen mode and restores it exactly once,
/// either through [`AltScreenGuard::release`] or on drop.
#[derive(Debug)]
pub struct AltScreenGuard<M: TerminalMode> {
    mode: M,
    active: bool,
}

impl<M: TerminalMode> AltScreenGuard<M> {
    /// Enter full-screen mode.
    ///
    /// # Errors
    ///
    /// Returns the error from [`TerminalMode::enter`]. The terminal is
    /// restored before returning.
    pub fn enter(mut mode: M) -> io::Result<Self> {
        if let Err(err) = mode.enter() {
            let _ = mode.leave();
            return Err(err);
        }
        tracing::debug!("entered alternate screen");
        Ok(Self { mode, active: true })
    }

    /// Restore the terminal. Later calls, and the drop, do nothing.
    ///
    /// # Errors
    ///
    /// Returns the error from [`TerminalMode::leave`].
    pub fn release(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        tracing::debug!("leaving alternate screen");
        self.mode.leave()
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl<M: TerminalMode> Drop for AltScreenGuard<M> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(error = %err, "failed to restore terminal");
        }
    }
}

/// A blocking stream of terminal events.
pub trait EventSource {
    /// Wait for the next event. `Ok(None)` means the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the terminal.
    fn next_event(&mut self) -> io::Result<Option<Event>>;
}

/// Crossterm's event queue, preceded by one synthetic resize carrying the
/// size measured at startup so the viewer lays out without waiting for the
/// user to resize.
#[derive(Debug)]
pub struct CrosstermEvents {
    initial: Option<Event>,
}

impl CrosstermEvents {
    pub const fn new(initial_size: Size) -> Self {
        Self {
            initial: Some(Event::Resize(initial_size.width, initial_size.height)),
        }
    }
}

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<Option<Event>> {
        if let Some(event) = self.initial.take() {
            return Ok(Some(event));
        }
        event::read().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingMode {
        calls: Rc<RefCell<Vec<&'static str>>>,
        fail_enter: bool,
    }

    impl TerminalMode for CountingMode {
        fn enter(&mut self) -> io::Result<()> {
            self.calls.borrow_mut().push("enter");
            if self.fail_enter {
                return Err(io::Error::other("no tty"));
            }
            Ok(())
        }

        fn leave(&mut self) -> io::Result<()> {
            self.calls.borrow_mut().push("leave");
            Ok(())
        }
    }

    #[test]
    fn test_release_is_idempotent() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mode = CountingMode {
            calls: Rc::clone(&calls),
            fail_enter: false,
        };
        let mut guard = AltScreenGuard::enter(mode).unwrap();
        assert!(guard.is_active());
        guard.release().unwrap();
        guard.release().unwrap();
        drop(guard);
        assert_eq!(*calls.borrow(), vec!["enter", "leave"]);
    }

    #[test]
    fn test_drop_releases() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        {
            let _guard = AltScreenGuard::enter(CountingMode {
                calls: Rc::clone(&calls),
                fail_enter: false,
            })
            .unwrap();
        }
        assert_eq!(*calls.borrow(), vec!["enter", "leave"]);
    }

    #[test]
    fn test_failed_enter_restores() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let result = AltScreenGuard::enter(CountingMode {
            calls: Rc::clone(&calls),
            fail_enter: true,
        });
        assert!(result.is_err());
        assert_eq!(*calls.borrow(), vec!["enter", "leave"]);
    }

    #[test]
    fn test_crossterm_events_start_with_initial_size() {
        let mut events = CrosstermEvents::new(Size::new(120, 40));
        let first = events.next_event().unwrap();
        assert_eq!(first, Some(Event::Resize(120, 40)));
    }
}
