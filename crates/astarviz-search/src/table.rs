use astarviz_core::SearchState;

/// Sentinel cost meaning "not reached yet".
pub const UNREACHABLE: i32 = i32::MAX;

/// Which origin a search direction grows from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// From Start towards End.
    Forward,
    /// From End towards Start.
    Backward,
}

impl Direction {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
        }
    }
}

/// Per-node, per-direction search bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub g: i32,
    pub h: i32,
    pub f: i32,
    /// Flat index of the cell the best known route arrived from.
    pub parent: Option<usize>,
    pub open: bool,
    pub closed: bool,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            h: UNREACHABLE,
            f: UNREACHABLE,
            parent: None,
            open: false,
            closed: false,
        }
    }
}

impl NodeRecord {
    /// The label this record would show on the grid.
    pub fn state(&self) -> SearchState {
        if self.closed {
            SearchState::Closed
        } else if self.open {
            SearchState::Open
        } else {
            SearchState::Unvisited
        }
    }

    #[inline]
    pub fn is_reached(&self) -> bool {
        self.g != UNREACHABLE
    }
}

/// Transient search state for every cell, one record per direction.
///
/// Indexed by the row-major flat index of the cell. Reset before every run.
#[derive(Clone, Debug)]
pub struct SearchTable {
    records: [Vec<NodeRecord>; 2],
}

impl SearchTable {
    /// Create a table for `len` cells, all unreached.
    pub fn new(len: usize) -> Self {
        Self {
            records: [vec![NodeRecord::default(); len], vec![NodeRecord::default(); len]],
        }
    }

    /// Number of cells covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.records[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return every record to its unreached default.
    pub fn reset(&mut self) {
        for side in &mut self.records {
            side.fill(NodeRecord::default());
        }
    }

    #[inline]
    pub fn get(&self, idx: usize, dir: Direction) -> &NodeRecord {
        &self.records[dir.slot()][idx]
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize, dir: Direction) -> &mut NodeRecord {
        &mut self.records[dir.slot()][idx]
    }
}
