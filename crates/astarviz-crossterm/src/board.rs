//! The grid as the terminal sees it.

use astarviz_core::{Coord, GridGraph};
use astarviz_search::{CellChange, Direction, Outcome, VisualizationSink};

/// A [`GridGraph`] plus the bit of search history the grid itself does not
/// keep: which side of a bidirectional run opened each cell.
#[derive(Debug)]
pub struct Board {
    grid: GridGraph,
    backward: Vec<bool>,
}

impl Board {
    pub fn new(grid: GridGraph) -> Self {
        let backward = vec![false; grid.bounds().len()];
        Self { grid, backward }
    }

    #[inline]
    pub fn grid(&self) -> &GridGraph {
        &self.grid
    }

    /// Mutable access for edits and for starting runs.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut GridGraph {
        &mut self.grid
    }

    /// Whether the last label at `c` came from the backward search.
    pub fn is_backward(&self, c: Coord) -> bool {
        self.grid
            .bounds()
            .index(c)
            .is_some_and(|i| self.backward[i])
    }
}

impl VisualizationSink for Board {
    fn on_cell_state_changed(&mut self, change: CellChange) {
        if let Some(i) = self.grid.bounds().index(change.coord) {
            self.backward[i] = change.direction == Direction::Backward;
        }
        self.grid.on_cell_state_changed(change);
    }

    fn on_run_complete(&mut self, outcome: &Outcome) {
        self.grid.on_run_complete(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astarviz_core::SearchState;

    #[test]
    fn remembers_the_opening_side() {
        let mut board = Board::new(GridGraph::new(3, 1));
        board.on_cell_state_changed(CellChange {
            coord: Coord::new(0, 1),
            state: SearchState::Open,
            direction: Direction::Backward,
        });
        assert!(board.is_backward(Coord::new(0, 1)));
        assert_eq!(board.grid().state(Coord::new(0, 1)), SearchState::Open);

        board.on_cell_state_changed(CellChange {
            coord: Coord::new(0, 1),
            state: SearchState::Closed,
            direction: Direction::Forward,
        });
        assert!(!board.is_backward(Coord::new(0, 1)));
        assert!(!board.is_backward(Coord::new(4, 4)));
    }
}
