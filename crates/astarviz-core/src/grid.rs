//! The [`GridGraph`] type: a fixed-size grid of [`Cell`]s that doubles as
//! a 4-connected unit-cost graph.
//!
//! Roles (Start, End, Obstacle) change only through the editing methods, and
//! only while no run holds the grid. A run takes the grid's lock through
//! [`GridGraph::begin_run`], which hands back a [`RunGuard`] and an
//! immutable [`RoleSnapshot`] for the engine to search over.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;

use crate::cell::{Cell, Role, SearchState};
use crate::error::{GridError, Missing};
use crate::geom::{Bounds, Coord};

// ---------------------------------------------------------------------------
// Run lock
// ---------------------------------------------------------------------------

/// Held for the duration of a run. Dropping it releases the grid for
/// editing again.
#[derive(Debug)]
pub struct RunGuard {
    held: Arc<AtomicBool>,
}

impl RunGuard {
    /// Whether this guard still holds the lock (always true until dropped).
    #[inline]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        log::debug!("run lock released");
    }
}

// ---------------------------------------------------------------------------
// RoleSnapshot
// ---------------------------------------------------------------------------

/// Immutable copy of a grid's roles taken when a run starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleSnapshot {
    bounds: Bounds,
    roles: Vec<Role>,
    start: Coord,
    end: Coord,
}

impl RoleSnapshot {
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn start(&self) -> Coord {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Coord {
        self.end
    }

    /// Role at `c`, or `None` outside the grid.
    #[inline]
    pub fn role(&self, c: Coord) -> Option<Role> {
        self.bounds.index(c).map(|i| self.roles[i])
    }

    /// Whether `c` is inside the grid and not an obstacle.
    #[inline]
    pub fn is_passable(&self, c: Coord) -> bool {
        matches!(self.role(c), Some(r) if r != Role::Obstacle)
    }

    /// Passable cardinal neighbours of `c`. Obstacles have none.
    pub fn neighbors(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        let from_open = self.is_passable(c);
        c.neighbors_4()
            .into_iter()
            .filter(move |&n| from_open && self.is_passable(n))
    }
}

// ---------------------------------------------------------------------------
// GridGraph
// ---------------------------------------------------------------------------

/// A `width` × `height` grid exclusively owning its cells.
#[derive(Debug)]
pub struct GridGraph {
    bounds: Bounds,
    cells: Vec<Cell>,
    start: Option<Coord>,
    end: Option<Coord>,
    lock: Arc<AtomicBool>,
}

impl GridGraph {
    /// Create an empty grid of the given dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Bounds::new(width, height);
        Self {
            bounds,
            cells: vec![Cell::default(); bounds.len()],
            start: None,
            end: None,
            lock: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.bounds.contains(c)
    }

    /// The cell at `c`, or `None` outside the grid.
    #[inline]
    pub fn cell(&self, c: Coord) -> Option<Cell> {
        self.bounds.index(c).map(|i| self.cells[i])
    }

    /// Role at `c`; cells outside the grid read as Empty.
    #[inline]
    pub fn role(&self, c: Coord) -> Role {
        self.cell(c).map(|cell| cell.role).unwrap_or_default()
    }

    /// Search label at `c`; cells outside the grid read as Unvisited.
    #[inline]
    pub fn state(&self, c: Coord) -> SearchState {
        self.cell(c).map(|cell| cell.state).unwrap_or_default()
    }

    #[inline]
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    /// Whether a run currently holds the grid.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.lock.load(Ordering::Acquire)
    }

    /// Row-major iterator over `(Coord, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }

    /// Whether `c` is inside the grid and not an obstacle.
    #[inline]
    pub fn is_passable(&self, c: Coord) -> bool {
        matches!(self.cell(c), Some(cell) if !cell.is_obstacle())
    }

    /// Passable cardinal neighbours of `c` (down, up, right, left).
    /// Obstacles have none.
    pub fn neighbors(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        let from_open = self.is_passable(c);
        c.neighbors_4()
            .into_iter()
            .filter(move |&n| from_open && self.is_passable(n))
    }

    // -----------------------------------------------------------------------
    // Search labels
    // -----------------------------------------------------------------------

    /// Clear every search label to Unvisited. Roles are preserved.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }

    /// Set the search label at `c`. Labels are not roles, so this is
    /// allowed while a run holds the grid.
    pub fn set_state(&mut self, c: Coord, state: SearchState) -> Result<(), GridError> {
        let i = self.bounds.index(c).ok_or(GridError::OutOfBounds(c))?;
        self.cells[i].state = state;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Assign `role` to the cell at `c`.
    ///
    /// Fails with [`GridError::InvalidTransition`] when the change would
    /// create a second Start or End, or would overwrite a Start/End cell with
    /// anything but Empty. Fails with [`GridError::GridBusy`] while a run
    /// holds the grid.
    pub fn set_role(&mut self, c: Coord, role: Role) -> Result<(), GridError> {
        let i = self.bounds.index(c).ok_or(GridError::OutOfBounds(c))?;
        if self.is_busy() {
            log::warn!("rejected edit at {c} to {role:?}: grid is busy");
            return Err(GridError::GridBusy);
        }

        let current = self.cells[i].role;
        if current == role {
            return Ok(());
        }
        if current.is_endpoint() && role != Role::Empty {
            return Err(GridError::InvalidTransition {
                coord: c,
                role,
                reason: "cell holds an endpoint; clear it first",
            });
        }
        match role {
            Role::Start if self.start.is_some() => {
                return Err(GridError::InvalidTransition {
                    coord: c,
                    role,
                    reason: "a start cell already exists",
                });
            }
            Role::End if self.end.is_some() => {
                return Err(GridError::InvalidTransition {
                    coord: c,
                    role,
                    reason: "an end cell already exists",
                });
            }
            _ => {}
        }

        match current {
            Role::Start => self.start = None,
            Role::End => self.end = None,
            _ => {}
        }
        match role {
            Role::Start => self.start = Some(c),
            Role::End => self.end = Some(c),
            _ => {}
        }
        self.cells[i] = Cell::default().with_role(role);
        Ok(())
    }

    #[inline]
    pub fn set_obstacle(&mut self, c: Coord) -> Result<(), GridError> {
        self.set_role(c, Role::Obstacle)
    }

    /// Return the cell to Empty, whatever its role.
    #[inline]
    pub fn clear_cell(&mut self, c: Coord) -> Result<(), GridError> {
        self.set_role(c, Role::Empty)
    }

    #[inline]
    pub fn set_start(&mut self, c: Coord) -> Result<(), GridError> {
        self.set_role(c, Role::Start)
    }

    #[inline]
    pub fn set_end(&mut self, c: Coord) -> Result<(), GridError> {
        self.set_role(c, Role::End)
    }

    /// Drop every role and label.
    pub fn clear(&mut self) -> Result<(), GridError> {
        if self.is_busy() {
            return Err(GridError::GridBusy);
        }
        self.cells.fill(Cell::default());
        self.start = None;
        self.end = None;
        Ok(())
    }

    /// Turn roughly `density` (0.0–1.0) of the Empty cells into obstacles.
    /// Densities outside that range are clamped; NaN places nothing.
    ///
    /// Returns the number of obstacles placed.
    pub fn scatter_obstacles(
        &mut self,
        density: f64,
        rng: &mut impl Rng,
    ) -> Result<usize, GridError> {
        if self.is_busy() {
            return Err(GridError::GridBusy);
        }
        let p = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        let mut placed = 0;
        for cell in &mut self.cells {
            if cell.role == Role::Empty && rng.random_bool(p) {
                *cell = Cell::default().with_role(Role::Obstacle);
                placed += 1;
            }
        }
        Ok(placed)
    }

    // -----------------------------------------------------------------------
    // Runs
    // -----------------------------------------------------------------------

    /// Lock the grid for a run and snapshot its roles.
    ///
    /// Search labels are reset first. Fails with
    /// [`GridError::NotConfigured`] if Start or End is missing, and with
    /// [`GridError::GridBusy`] if another run already holds the grid.
    pub fn begin_run(&mut self) -> Result<(RunGuard, RoleSnapshot), GridError> {
        let (start, end) = match (self.start, self.end) {
            (Some(s), Some(e)) => (s, e),
            (None, Some(_)) => {
                return Err(GridError::NotConfigured {
                    missing: Missing::Start,
                });
            }
            (Some(_), None) => {
                return Err(GridError::NotConfigured {
                    missing: Missing::End,
                });
            }
            (None, None) => {
                return Err(GridError::NotConfigured {
                    missing: Missing::Both,
                });
            }
        };
        self.lock
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GridError::GridBusy)?;

        self.reset();
        let guard = RunGuard {
            held: Arc::clone(&self.lock),
        };
        let snapshot = RoleSnapshot {
            bounds: self.bounds,
            roles: self.cells.iter().map(|c| c.role).collect(),
            start,
            end,
        };
        log::debug!("run lock taken on {} grid, {start} -> {end}", self.bounds);
        Ok((guard, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn configured(w: i32, h: i32) -> GridGraph {
        let mut g = GridGraph::new(w, h);
        g.set_start(Coord::new(0, 0)).unwrap();
        g.set_end(Coord::new(h - 1, w - 1)).unwrap();
        g
    }

    #[test]
    fn new_grid_is_empty() {
        let g = GridGraph::new(4, 3);
        assert_eq!(g.bounds(), Bounds::new(4, 3));
        assert!(g.iter().all(|(_, c)| c == Cell::default()));
        assert_eq!(g.start(), None);
        assert_eq!(g.cell(Coord::new(3, 0)), None);
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let mut g = GridGraph::new(3, 3);
        g.set_obstacle(Coord::new(0, 1)).unwrap();
        let n: Vec<_> = g.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(n, vec![Coord::new(1, 0)]);

        let n: Vec<_> = g.neighbors(Coord::new(1, 1)).collect();
        assert_eq!(
            n,
            vec![Coord::new(2, 1), Coord::new(1, 2), Coord::new(1, 0)]
        );
    }

    #[test]
    fn obstacles_have_no_neighbors() {
        let mut g = GridGraph::new(3, 3);
        g.set_obstacle(Coord::new(1, 1)).unwrap();
        assert_eq!(g.neighbors(Coord::new(1, 1)).count(), 0);
    }

    #[test]
    fn second_start_is_rejected() {
        let mut g = GridGraph::new(3, 3);
        g.set_start(Coord::new(0, 0)).unwrap();
        let err = g.set_start(Coord::new(1, 1)).unwrap_err();
        assert!(matches!(err, GridError::InvalidTransition { .. }));
        assert_eq!(g.role(Coord::new(1, 1)), Role::Empty);
    }

    #[test]
    fn endpoint_must_be_cleared_before_overwrite() {
        let mut g = GridGraph::new(3, 3);
        g.set_end(Coord::new(2, 2)).unwrap();
        assert!(matches!(
            g.set_obstacle(Coord::new(2, 2)),
            Err(GridError::InvalidTransition { .. })
        ));
        assert!(matches!(
            g.set_start(Coord::new(2, 2)),
            Err(GridError::InvalidTransition { .. })
        ));

        g.clear_cell(Coord::new(2, 2)).unwrap();
        assert_eq!(g.end(), None);
        g.set_obstacle(Coord::new(2, 2)).unwrap();
        assert_eq!(g.role(Coord::new(2, 2)), Role::Obstacle);
    }

    #[test]
    fn obstacle_can_become_endpoint() {
        let mut g = GridGraph::new(3, 3);
        g.set_obstacle(Coord::new(1, 1)).unwrap();
        g.set_start(Coord::new(1, 1)).unwrap();
        assert_eq!(g.start(), Some(Coord::new(1, 1)));
    }

    #[test]
    fn out_of_bounds_edit() {
        let mut g = GridGraph::new(2, 2);
        assert_eq!(
            g.set_obstacle(Coord::new(2, 0)),
            Err(GridError::OutOfBounds(Coord::new(2, 0)))
        );
    }

    #[test]
    fn reset_preserves_roles() {
        let mut g = configured(3, 3);
        g.set_obstacle(Coord::new(1, 1)).unwrap();
        g.set_state(Coord::new(0, 1), SearchState::Closed).unwrap();
        g.set_state(Coord::new(1, 0), SearchState::Path).unwrap();
        g.reset();
        assert!(g.iter().all(|(_, c)| c.state == SearchState::Unvisited));
        assert_eq!(g.role(Coord::new(1, 1)), Role::Obstacle);
        assert_eq!(g.start(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn begin_run_requires_endpoints() {
        let mut g = GridGraph::new(3, 3);
        assert_eq!(
            g.begin_run().unwrap_err(),
            GridError::NotConfigured {
                missing: Missing::Both
            }
        );
        g.set_start(Coord::new(0, 0)).unwrap();
        assert_eq!(
            g.begin_run().unwrap_err(),
            GridError::NotConfigured {
                missing: Missing::End
            }
        );
        assert!(!g.is_busy());
    }

    #[test]
    fn edits_while_running_are_busy() {
        let mut g = configured(3, 3);
        let (guard, snap) = g.begin_run().unwrap();
        assert!(guard.is_held());
        assert_eq!(snap.start(), Coord::new(0, 0));
        assert_eq!(snap.end(), Coord::new(2, 2));

        assert_eq!(g.set_obstacle(Coord::new(1, 1)), Err(GridError::GridBusy));
        assert_eq!(g.clear_cell(Coord::new(0, 0)), Err(GridError::GridBusy));
        assert_eq!(g.clear(), Err(GridError::GridBusy));
        assert!(matches!(g.begin_run(), Err(GridError::GridBusy)));
        // Labels may still be mirrored while running.
        g.set_state(Coord::new(1, 1), SearchState::Open).unwrap();

        drop(guard);
        assert!(!g.is_busy());
        g.set_obstacle(Coord::new(1, 1)).unwrap();
    }

    #[test]
    fn snapshot_is_unaffected_by_later_edits() {
        let mut g = configured(3, 3);
        let (guard, snap) = g.begin_run().unwrap();
        drop(guard);
        g.set_obstacle(Coord::new(1, 1)).unwrap();
        assert_eq!(snap.role(Coord::new(1, 1)), Some(Role::Empty));
        assert!(snap.is_passable(Coord::new(1, 1)));
    }

    #[test]
    fn scatter_leaves_endpoints_alone() {
        let mut g = configured(10, 10);
        let mut rng = StdRng::seed_from_u64(7);
        let placed = g.scatter_obstacles(1.0, &mut rng).unwrap();
        assert_eq!(placed, 98);
        assert_eq!(g.role(Coord::new(0, 0)), Role::Start);
        assert_eq!(g.role(Coord::new(9, 9)), Role::End);

        let mut g = configured(10, 10);
        assert_eq!(g.scatter_obstacles(0.0, &mut rng).unwrap(), 0);
    }

    #[test]
    fn scatter_tolerates_odd_densities() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut g = configured(6, 6);
        assert_eq!(g.scatter_obstacles(f64::NAN, &mut rng).unwrap(), 0);
        assert_eq!(g.scatter_obstacles(-2.5, &mut rng).unwrap(), 0);
        assert_eq!(g.scatter_obstacles(f64::INFINITY, &mut rng).unwrap(), 34);
    }
}
