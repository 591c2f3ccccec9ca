use std::time::Duration;

use astarviz_core::{Bounds, GridError, GridGraph};

use crate::engine::{Strategy, Termination};

/// Settings for a search run.
///
/// The defaults reproduce the classic 50×50 window with a 25 ms pause
/// between steps.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Pause between steps. Zero disables pacing.
    pub step_delay: Duration,
    pub mode: Strategy,
    /// Stopping rule for bidirectional runs.
    pub termination: Termination,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_width: 50,
            grid_height: 50,
            step_delay: Duration::from_millis(25),
            mode: Strategy::Unidirectional,
            termination: Termination::Optimal,
        }
    }
}

impl EngineConfig {
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn with_mode(mut self, mode: Strategy) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Configured grid extent.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.grid_width, self.grid_height)
    }

    /// Create an empty grid of the configured size.
    pub fn new_grid(&self) -> GridGraph {
        GridGraph::new(self.grid_width, self.grid_height)
    }

    /// Check that `grid` has the configured size.
    pub fn check_grid(&self, grid: &GridGraph) -> Result<(), GridError> {
        if grid.bounds() != self.bounds() {
            return Err(GridError::DimensionMismatch {
                expected: self.bounds(),
                found: grid.bounds(),
            });
        }
        Ok(())
    }
}
