use astarviz_core::{Bounds, Coord, RoleSnapshot};

use crate::distance::manhattan;

/// Minimal search interface: provides the grid extent and neighbor
/// enumeration. Every move costs 1.
pub trait Pather {
    /// Extent of the searchable area.
    fn bounds(&self) -> Bounds;

    /// Append neighbors of `c` into `buf`. The caller clears `buf` before
    /// calling.
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>);
}

/// Pather with an admissible, consistent heuristic.
pub trait AstarPather: Pather {
    /// Heuristic estimate of distance from `from` to `to`.
    /// Must never overestimate the true cost.
    fn estimate(&self, from: Coord, to: Coord) -> i32 {
        manhattan(from, to)
    }
}

impl Pather for RoleSnapshot {
    #[inline]
    fn bounds(&self) -> Bounds {
        RoleSnapshot::bounds(self)
    }

    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
        buf.extend(RoleSnapshot::neighbors(self, c));
    }
}

impl AstarPather for RoleSnapshot {}
