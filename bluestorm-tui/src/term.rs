//! Terminal primitives: scoped raw mode, drawing, single-key reads

use std::io;

use crossterm::event::{self, Event, KeyEvent};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute};

/// Scoped raw-mode acquisition.
///
/// Raw mode is process-global terminal state; tying it to a guard keeps
/// every exit path, including panics and early returns, line-buffered.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Block until one key event arrives.
///
/// Callers hold a [`RawModeGuard`] around this so the read is
/// unbuffered; resize and other non-key events are ignored.
pub fn read_key() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            return Ok(key);
        }
    }
}

pub fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
}

/// Print one menu line, reverse-video when highlighted
pub fn print_line(text: &str, highlighted: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if highlighted {
        execute!(
            stdout,
            SetAttribute(Attribute::Reverse),
            Print(text),
            SetAttribute(Attribute::Reset),
            Print("\n")
        )
    } else {
        execute!(stdout, Print(text), Print("\n"))
    }
}
