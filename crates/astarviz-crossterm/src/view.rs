use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor, event, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use astarviz_core::{Bounds, Cell, Coord, Role, SearchState};

use crate::board::Board;
use crate::input::{Command, map_event};

/// Terminal columns per grid cell. Two columns keep cells roughly square.
pub const CELL_WIDTH: u16 = 2;

const FILLED: &str = "██";
const EMPTY: &str = " ·";

/// Glyph and color for one cell. Roles win over labels.
fn glyph(cell: Cell, backward: bool) -> (Color, &'static str) {
    match cell.role {
        Role::Start => (Color::Blue, FILLED),
        Role::End => (Color::Yellow, FILLED),
        Role::Obstacle => (Color::White, FILLED),
        Role::Empty => match cell.state {
            SearchState::Unvisited => (Color::DarkGrey, EMPTY),
            SearchState::Open if backward => (Color::Cyan, FILLED),
            SearchState::Open => (Color::Green, FILLED),
            SearchState::Closed => (Color::Red, FILLED),
            SearchState::Path => (Color::Magenta, FILLED),
        },
    }
}

/// The terminal, set up for drawing a grid and reading clicks.
///
/// Call [`init`](Self::init) before drawing. The terminal is restored by
/// [`close`](Self::close) or when the view is dropped.
#[derive(Debug)]
pub struct TermView {
    origin: (u16, u16),
    mouse_enabled: bool,
    active: bool,
}

impl TermView {
    pub fn new() -> Self {
        Self {
            origin: (0, 0),
            mouse_enabled: true,
            active: false,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Terminal position of the grid's top-left cell.
    pub fn with_origin(mut self, column: u16, row: u16) -> Self {
        self.origin = (column, row);
        self
    }

    /// The largest grid that fits the current terminal, leaving a line for
    /// the status text.
    pub fn fitting_bounds(&self) -> io::Result<Bounds> {
        let (cols, rows) = terminal::size()?;
        let width = cols.saturating_sub(self.origin.0) / CELL_WIDTH;
        let height = rows.saturating_sub(self.origin.1 + 1);
        Ok(Bounds::new(width as i32, height as i32))
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        self.active = true;
        Ok(())
    }

    /// Wait up to `timeout` for input and map it to a command.
    pub fn poll(&self, timeout: Duration, bounds: Bounds) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let ev = event::read()?;
        Ok(map_event(&ev, self.origin, bounds))
    }

    /// Redraw the whole board with `status` on the line below it.
    pub fn draw(&self, board: &Board, status: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        let grid = board.grid();
        let (x0, y0) = self.origin;

        for row in 0..grid.height() {
            queue!(stdout, cursor::MoveTo(x0, y0 + row as u16))?;
            for col in 0..grid.width() {
                let c = Coord::new(row, col);
                let cell = grid.cell(c).unwrap_or_default();
                let (color, text) = glyph(cell, board.is_backward(c));
                queue!(stdout, SetForegroundColor(color), Print(text))?;
            }
        }

        queue!(
            stdout,
            ResetColor,
            cursor::MoveTo(x0, y0 + grid.height() as u16),
            terminal::Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        stdout.flush()
    }

    pub fn close(&mut self) {
        if !self.active {
            return;
        }
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            restore_step(
                "disabling mouse capture",
                execute!(stdout, event::DisableMouseCapture),
            );
        }
        restore_step(
            "leaving alternate screen",
            execute!(stdout, ResetColor, cursor::Show, terminal::LeaveAlternateScreen),
        );
        restore_step("disabling raw mode", terminal::disable_raw_mode());
        self.active = false;
    }
}

/// Report a failed terminal restore step and carry on with the rest.
fn restore_step(what: &str, result: io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{what}: {e}");
            false
        }
    }
}

impl Default for TermView {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TermView {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_restore_steps_are_reported() {
        assert!(restore_step("ok", Ok(())));
        assert!(!restore_step("broken", Err(io::Error::other("gone"))));
    }

    #[test]
    fn roles_are_drawn_over_labels() {
        let start = Cell::default().with_role(Role::Start);
        assert_eq!(glyph(start, false).0, Color::Blue);
        assert_eq!(glyph(Cell::default().with_role(Role::End), true).0, Color::Yellow);
    }

    #[test]
    fn labels_pick_colors() {
        let open = Cell {
            role: Role::Empty,
            state: SearchState::Open,
        };
        assert_eq!(glyph(open, false).0, Color::Green);
        assert_eq!(glyph(open, true).0, Color::Cyan);

        let path = Cell {
            state: SearchState::Path,
            ..open
        };
        assert_eq!(glyph(path, true).0, Color::Magenta);
        assert_eq!(glyph(Cell::default(), false), (Color::DarkGrey, EMPTY));
    }
}
