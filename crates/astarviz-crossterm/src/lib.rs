//! Crossterm front end for the A* visualizer.
//!
//! [`TermView`] owns the terminal (raw mode, alternate screen, mouse
//! capture), draws a [`Board`] and turns terminal events into
//! [`Command`]s. Editing rules for those commands live in [`input`].

pub mod board;
pub mod input;
mod view;

pub use board::Board;
pub use input::{Command, map_event};
pub use view::{CELL_WIDTH, TermView};
