//! Step events and the sinks that consume them.

use std::sync::mpsc::Sender;

use astarviz_core::{Coord, GridGraph, SearchState};

use crate::table::Direction;

/// An ordered route from Start to End, both included.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub cells: Vec<Coord>,
    /// Where the forward and backward halves were spliced, for
    /// bidirectional runs.
    pub meeting: Option<Coord>,
}

impl Route {
    /// Number of moves along the route (one less than the cell count).
    #[inline]
    pub fn cost(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    /// Whether each consecutive pair of cells is one orthogonal step apart.
    pub fn is_connected(&self) -> bool {
        self.cells.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    PathFound(Route),
    /// Start and End are not connected. A valid result, not an error.
    NoPathExists,
    Cancelled,
}

impl Outcome {
    /// The route, if one was found.
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::PathFound(r) => Some(r),
            _ => None,
        }
    }
}

/// A single label change on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellChange {
    pub coord: Coord,
    pub state: SearchState,
    /// The search direction that produced the change.
    pub direction: Direction,
}

/// Everything a run reports, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepEvent {
    CellChanged(CellChange),
    RunComplete(Outcome),
}

/// Receives the event stream of a run.
///
/// Implemented by the caller. Events arrive in exactly the order the search
/// produced them, followed by exactly one completion.
pub trait VisualizationSink {
    /// A cell became Open, Closed or part of the Path.
    fn on_cell_state_changed(&mut self, change: CellChange);

    /// The run ended.
    fn on_run_complete(&mut self, outcome: &Outcome);

    /// Dispatch a recorded event to the matching callback.
    fn deliver(&mut self, event: &StepEvent) {
        match event {
            StepEvent::CellChanged(change) => self.on_cell_state_changed(*change),
            StepEvent::RunComplete(outcome) => self.on_run_complete(outcome),
        }
    }
}

impl<S: VisualizationSink + ?Sized> VisualizationSink for &mut S {
    fn on_cell_state_changed(&mut self, change: CellChange) {
        (**self).on_cell_state_changed(change);
    }

    fn on_run_complete(&mut self, outcome: &Outcome) {
        (**self).on_run_complete(outcome);
    }
}

/// Records every event.
impl VisualizationSink for Vec<StepEvent> {
    fn on_cell_state_changed(&mut self, change: CellChange) {
        self.push(StepEvent::CellChanged(change));
    }

    fn on_run_complete(&mut self, outcome: &Outcome) {
        self.push(StepEvent::RunComplete(outcome.clone()));
    }
}

/// Forwards events to another thread. A hung-up receiver is ignored: the
/// run carries on and its outcome is still returned to whoever joins it.
impl VisualizationSink for Sender<StepEvent> {
    fn on_cell_state_changed(&mut self, change: CellChange) {
        self.send(StepEvent::CellChanged(change)).ok();
    }

    fn on_run_complete(&mut self, outcome: &Outcome) {
        self.send(StepEvent::RunComplete(outcome.clone())).ok();
    }
}

/// Mirrors labels onto the grid so it can be drawn.
impl VisualizationSink for GridGraph {
    fn on_cell_state_changed(&mut self, change: CellChange) {
        if let Err(e) = self.set_state(change.coord, change.state) {
            log::warn!("dropping label change: {e}");
        }
    }

    fn on_run_complete(&mut self, _outcome: &Outcome) {}
}
