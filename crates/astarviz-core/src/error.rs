//! Errors raised by grid editing and run setup.

use std::fmt;

use crate::cell::Role;
use crate::geom::{Bounds, Coord};

/// Which endpoint is missing when a run is requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Missing {
    Start,
    End,
    Both,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
            Self::Both => f.write_str("start and end"),
        }
    }
}

/// Errors that can occur when editing a grid or starting a run on it.
///
/// All variants are recoverable: the caller re-edits the grid and tries
/// again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The role assignment would break the single Start / single End rule,
    /// or overwrite an endpoint without clearing it first.
    InvalidTransition {
        coord: Coord,
        role: Role,
        reason: &'static str,
    },
    /// A run currently holds the grid.
    GridBusy,
    /// A run was requested without a Start or an End.
    NotConfigured { missing: Missing },
    /// The coordinate lies outside the grid.
    OutOfBounds(Coord),
    /// The grid does not have the dimensions the run was configured for.
    DimensionMismatch { expected: Bounds, found: Bounds },
    /// Layout lines have inconsistent widths.
    InconsistentSize { line: usize },
    /// A layout character is not one of `.`, `#`, `S`, `E`.
    InvalidChar { ch: char, coord: Coord },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { coord, role, reason } => {
                write!(f, "cannot set {coord} to {role:?}: {reason}")
            }
            Self::GridBusy => f.write_str("grid is busy: a search is running"),
            Self::NotConfigured { missing } => write!(f, "grid has no {missing}"),
            Self::OutOfBounds(c) => write!(f, "coordinate {c} is outside the grid"),
            Self::DimensionMismatch { expected, found } => {
                write!(f, "grid is {found}, run configured for {expected}")
            }
            Self::InconsistentSize { line } => {
                write!(f, "layout: line {line} has a different width")
            }
            Self::InvalidChar { ch, coord } => {
                write!(f, "layout: invalid character {ch:?} at {coord}")
            }
        }
    }
}

impl std::error::Error for GridError {}
