//! Grids built from text.
//!
//! A layout is ASCII art, one line per row:
//!
//! ```text
//! S.#.
//! ..#.
//! ...E
//! ```
//!
//! `.` is empty, `#` an obstacle, `S` the start and `E` the end. Lines must
//! all have the same width. Leading/trailing whitespace is trimmed from the
//! whole string and from each line.

use crate::cell::{Role, SearchState};
use crate::error::GridError;
use crate::geom::Coord;
use crate::grid::GridGraph;

fn role_for(ch: char) -> Option<Role> {
    match ch {
        '.' => Some(Role::Empty),
        '#' => Some(Role::Obstacle),
        'S' => Some(Role::Start),
        'E' => Some(Role::End),
        _ => None,
    }
}

impl GridGraph {
    /// Parse a layout into a new grid.
    pub fn from_layout(s: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = s.trim().lines().map(str::trim).collect();
        let height = lines.len() as i32;
        let width = lines.first().map_or(0, |l| l.chars().count()) as i32;

        let mut grid = GridGraph::new(width, height);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != width {
                return Err(GridError::InconsistentSize { line: row });
            }
            for (col, ch) in line.chars().enumerate() {
                let c = Coord::new(row as i32, col as i32);
                let role = role_for(ch).ok_or(GridError::InvalidChar { ch, coord: c })?;
                grid.set_role(c, role)?;
            }
        }
        Ok(grid)
    }

    /// Render the grid back into layout text.
    ///
    /// Empty cells carrying a search label are drawn as `o` (open),
    /// `x` (closed) and `*` (path), so the output is also a readable picture
    /// of a finished run.
    pub fn to_layout(&self) -> String {
        let mut out = String::with_capacity(self.bounds().len() + self.height() as usize);
        for (c, cell) in self.iter() {
            if c.col == 0 && c.row > 0 {
                out.push('\n');
            }
            let ch = match (cell.role, cell.state) {
                (Role::Obstacle, _) => '#',
                (Role::Start, _) => 'S',
                (Role::End, _) => 'E',
                (Role::Empty, SearchState::Unvisited) => '.',
                (Role::Empty, SearchState::Open) => 'o',
                (Role::Empty, SearchState::Closed) => 'x',
                (Role::Empty, SearchState::Path) => '*',
            };
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAZE: &str = "
        S.#.
        ..#.
        ...E";

    #[test]
    fn parse_layout() {
        let g = GridGraph::from_layout(MAZE).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.start(), Some(Coord::new(0, 0)));
        assert_eq!(g.end(), Some(Coord::new(2, 3)));
        assert_eq!(g.role(Coord::new(1, 2)), Role::Obstacle);
    }

    #[test]
    fn layout_round_trip() {
        let g = GridGraph::from_layout(MAZE).unwrap();
        assert_eq!(g.to_layout(), "S.#.\n..#.\n...E");
    }

    #[test]
    fn labels_show_in_layout() {
        let mut g = GridGraph::from_layout("S..\n..E").unwrap();
        g.set_state(Coord::new(0, 1), SearchState::Path).unwrap();
        g.set_state(Coord::new(1, 0), SearchState::Closed).unwrap();
        g.set_state(Coord::new(1, 1), SearchState::Open).unwrap();
        // Endpoints keep their letter whatever their label.
        g.set_state(Coord::new(0, 0), SearchState::Closed).unwrap();
        assert_eq!(g.to_layout(), "S*.\nxoE");
    }

    #[test]
    fn ragged_layout_is_rejected() {
        let err = GridGraph::from_layout("S..\n..\n..E").unwrap_err();
        assert_eq!(err, GridError::InconsistentSize { line: 1 });
    }

    #[test]
    fn unknown_char_is_rejected() {
        let err = GridGraph::from_layout("S.?\n..E").unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidChar {
                ch: '?',
                coord: Coord::new(0, 2)
            }
        );
    }

    #[test]
    fn two_starts_are_rejected() {
        let err = GridGraph::from_layout("S.S\n..E").unwrap_err();
        assert!(matches!(err, GridError::InvalidTransition { .. }));
    }
}
