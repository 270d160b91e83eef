//! The single-threaded input loop

use bluestorm_core::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::menu::Menu;
use crate::term::{self, RawModeGuard};

enum Dispatch {
    Continue,
    Quit,
}

/// Run the menu loop until the user interrupts.
///
/// Each iteration renders, switches the terminal to raw mode for exactly
/// one key read, restores it, then dispatches. Prompt sequences
/// triggered by a selection therefore always run line-buffered. The loop
/// never stops attacks on its own; the caller owns shutdown.
pub fn run(menu: &mut dyn Menu) -> Result<()> {
    let mut cursor = 0usize;
    loop {
        // A selection may have shrunk the list (rescan); never let the
        // cursor point past the last line.
        cursor = clamp(cursor, menu.line_count());
        draw(menu, cursor)?;

        let key = {
            let _raw = RawModeGuard::enter()?;
            term::read_key()?
        };

        match dispatch(menu, &mut cursor, key)? {
            Dispatch::Quit => return Ok(()),
            Dispatch::Continue => {}
        }
    }
}

fn dispatch(menu: &mut dyn Menu, cursor: &mut usize, key: KeyEvent) -> Result<Dispatch> {
    if key.kind != KeyEventKind::Press {
        return Ok(Dispatch::Continue);
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            debug!("interrupt, leaving menu loop");
            return Ok(Dispatch::Quit);
        }
        KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            if *cursor + 1 < menu.line_count() {
                *cursor += 1;
            }
        }
        KeyCode::Enter => menu.select(*cursor)?,
        _ => {}
    }

    Ok(Dispatch::Continue)
}

fn clamp(cursor: usize, line_count: usize) -> usize {
    cursor.min(line_count.saturating_sub(1))
}

fn draw(menu: &dyn Menu, cursor: usize) -> Result<()> {
    term::clear_screen()?;
    term::print_line(&format!("### {} ###", menu.title()), false)?;
    for line in 0..menu.line_count() {
        term::print_line(&menu.label(line), line == cursor)?;
    }
    Ok(())
}
