//! Terminal input and the grid edits it triggers.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use astarviz_core::{Bounds, Coord, GridError, GridGraph, Role};

use crate::view::CELL_WIDTH;

/// What the user asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Left click: Start first, then End, then obstacles.
    Place(Coord),
    /// Left drag: draw obstacles.
    Paint(Coord),
    /// Right click: return the cell to Empty.
    Erase(Coord),
    /// Space: start a run.
    Run,
    /// C: clear the grid, or cancel the active run.
    Clear,
    /// R: scatter random obstacles.
    Scatter,
    /// Q, Esc or Ctrl-C.
    Quit,
}

/// Grid cell under the terminal position (`column`, `row`), for a grid drawn
/// with its top-left corner at `origin`.
fn cell_at(column: u16, row: u16, origin: (u16, u16), bounds: Bounds) -> Option<Coord> {
    let col = column.checked_sub(origin.0)? / CELL_WIDTH;
    let row = row.checked_sub(origin.1)?;
    let c = Coord::new(row as i32, col as i32);
    bounds.contains(c).then_some(c)
}

fn key_command(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::Run),
        KeyCode::Char('c' | 'C') => Some(Command::Clear),
        KeyCode::Char('r' | 'R') => Some(Command::Scatter),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn mouse_command(me: &MouseEvent, origin: (u16, u16), bounds: Bounds) -> Option<Command> {
    let c = cell_at(me.column, me.row, origin, bounds)?;
    match me.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::Place(c)),
        MouseEventKind::Drag(MouseButton::Left) => Some(Command::Paint(c)),
        MouseEventKind::Down(MouseButton::Right) => Some(Command::Erase(c)),
        _ => None,
    }
}

/// Map a terminal event to a command. Clicks outside the grid and
/// unbound keys map to `None`.
pub fn map_event(ev: &Event, origin: (u16, u16), bounds: Bounds) -> Option<Command> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => key_command(*code, *modifiers),
        Event::Mouse(me) => mouse_command(me, origin, bounds),
        _ => None,
    }
}

/// Apply a left click at `c`.
///
/// The first click places Start, the next places End, and later clicks
/// place obstacles. Clicking an endpoint does nothing.
pub fn place(grid: &mut GridGraph, c: Coord) -> Result<(), GridError> {
    match grid.role(c) {
        Role::Start | Role::End => Ok(()),
        _ if grid.start().is_none() => grid.set_start(c),
        _ if grid.end().is_none() => grid.set_end(c),
        _ => grid.set_obstacle(c),
    }
}

/// Apply a left drag over `c`: obstacles everywhere but on endpoints.
pub fn paint(grid: &mut GridGraph, c: Coord) -> Result<(), GridError> {
    if grid.role(c).is_endpoint() {
        return Ok(());
    }
    grid.set_obstacle(c)
}
