//! **astarviz-core**: the grid side of the A* visualizer.
//!
//! This crate provides the foundational types shared by the search engine
//! and the front ends: coordinates, cells with their roles and search
//! labels, the editable [`GridGraph`], the run lock that keeps edits away
//! from an active search, and text layouts for building grids quickly.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;

pub use cell::{Cell, Role, SearchState};
pub use error::{GridError, Missing};
pub use geom::{Bounds, Coord};
pub use grid::{GridGraph, RoleSnapshot, RunGuard};
