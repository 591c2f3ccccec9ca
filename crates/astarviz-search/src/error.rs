use std::fmt;

use astarviz_core::{Coord, GridError};

/// Errors that can occur when starting or driving a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The grid refused the run (busy, missing endpoints, wrong size).
    Grid(GridError),
    /// A predecessor chain looped back on itself. This is an internal
    /// consistency fault and never happens when costs only decrease.
    Reconstruction { at: Coord },
    /// The background worker could not be started.
    Spawn(String),
    /// The background worker panicked before reporting an outcome.
    WorkerPanicked,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "{e}"),
            Self::Reconstruction { at } => {
                write!(f, "predecessor cycle detected at {at} while rebuilding the path")
            }
            Self::Spawn(msg) => write!(f, "cannot start search worker: {msg}"),
            Self::WorkerPanicked => f.write_str("search worker panicked"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for SearchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
