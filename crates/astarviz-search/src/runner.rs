//! Driving a run to completion, in the foreground or on a worker thread.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use astarviz_core::GridGraph;

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::engine::SearchEngine;
use crate::error::SearchError;
use crate::event::{Outcome, VisualizationSink};
use crate::traits::AstarPather;

/// Step `engine` until it ends, pausing `step_delay` between steps.
///
/// The pause waits on the engine's cancellation token, so a cancel request
/// cuts it short and is observed at the top of the next step. A zero delay
/// disables pacing entirely.
pub fn drive<P, S>(
    engine: &mut SearchEngine<P>,
    sink: &mut S,
    step_delay: Duration,
) -> Result<Outcome, SearchError>
where
    P: AstarPather,
    S: VisualizationSink + ?Sized,
{
    loop {
        let events = engine.step()?;
        let produced = !events.is_empty();
        for event in events {
            sink.deliver(event);
        }
        if let Some(outcome) = engine.outcome() {
            return Ok(outcome.clone());
        }
        if produced && !step_delay.is_zero() {
            engine.cancel_token().wait(step_delay);
        }
    }
}

/// A search running on a background thread.
///
/// The grid stays locked until the worker has returned, so join the handle
/// (after seeing the completion event, or to wait for it) before editing
/// the grid again.
#[derive(Debug)]
pub struct RunHandle {
    cancel: CancelToken,
    handle: JoinHandle<Result<Outcome, SearchError>>,
}

impl RunHandle {
    /// Ask the run to stop. It ends with [`Outcome::Cancelled`] at the next
    /// step boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the worker has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its outcome.
    pub fn join(self) -> Result<Outcome, SearchError> {
        self.handle.join().map_err(|_| SearchError::WorkerPanicked)?
    }
}

/// Start a run of `config.mode` on `grid` in a background thread.
///
/// Takes the grid's run lock (failing with `GridBusy` if a run already
/// holds it, or `NotConfigured` without Start and End), snapshots its roles
/// and hands every event to `sink` from the worker, in order.
pub fn spawn_run<S>(
    grid: &mut GridGraph,
    config: &EngineConfig,
    sink: S,
) -> Result<RunHandle, SearchError>
where
    S: VisualizationSink + Send + 'static,
{
    config.check_grid(grid)?;
    let (guard, snapshot) = grid.begin_run()?;

    let cancel = CancelToken::new();
    let mut engine = SearchEngine::from_snapshot(snapshot, config)?.with_cancel(cancel.clone());
    let step_delay = config.step_delay;

    let handle = thread::Builder::new()
        .name("astarviz-search".into())
        .spawn(move || {
            let _guard = guard;
            let mut sink = sink;
            drive(&mut engine, &mut sink, step_delay)
        })
        .map_err(|e| SearchError::Spawn(e.to_string()))?;

    log::debug!("spawned {:?} run", config.mode);
    Ok(RunHandle { cancel, handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Strategy, Termination};
    use crate::event::StepEvent;
    use astarviz_core::{Coord, GridError, SearchState};
    use std::sync::mpsc;

    fn grid(config: &EngineConfig) -> GridGraph {
        let mut g = config.new_grid();
        g.set_start(Coord::new(0, 0)).unwrap();
        g.set_end(Coord::new(config.grid_height - 1, config.grid_width - 1))
            .unwrap();
        g
    }

    #[test]
    fn drive_without_pacing() {
        let config = EngineConfig::default()
            .with_size(5, 5)
            .with_step_delay(Duration::ZERO);
        let mut g = grid(&config);
        let (_guard, snap) = g.begin_run().unwrap();
        let mut engine = SearchEngine::from_snapshot(snap, &config).unwrap();
        let mut events: Vec<StepEvent> = Vec::new();
        let outcome = drive(&mut engine, &mut events, config.step_delay).unwrap();
        assert_eq!(outcome.route().map(|r| r.cost()), Some(8));
        assert_eq!(events.last(), Some(&StepEvent::RunComplete(outcome)));
    }

    #[test]
    fn background_run_reports_through_channel() {
        let config = EngineConfig::default()
            .with_size(6, 4)
            .with_step_delay(Duration::ZERO)
            .with_mode(Strategy::Bidirectional)
            .with_termination(Termination::Optimal);
        let mut g = grid(&config);
        let (tx, rx) = mpsc::channel();
        let handle = spawn_run(&mut g, &config, tx).unwrap();

        let outcome = handle.join().unwrap();
        assert_eq!(outcome.route().map(|r| r.cost()), Some(8));
        assert!(!g.is_busy());

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.last(), Some(&StepEvent::RunComplete(outcome)));
        for e in &events {
            g.deliver(e);
        }
        let on_path = g.iter().filter(|(_, c)| c.state == SearchState::Path).count();
        assert_eq!(on_path, 7);
    }

    #[test]
    fn edits_are_rejected_while_running() {
        let config = EngineConfig::default()
            .with_size(20, 20)
            .with_step_delay(Duration::from_secs(60));
        let mut g = grid(&config);
        let handle = spawn_run(&mut g, &config, Vec::<StepEvent>::new()).unwrap();

        assert_eq!(g.set_obstacle(Coord::new(5, 5)), Err(GridError::GridBusy));
        assert!(matches!(
            spawn_run(&mut g, &config, Vec::<StepEvent>::new()),
            Err(SearchError::Grid(GridError::GridBusy))
        ));

        handle.cancel();
        assert_eq!(handle.join().unwrap(), Outcome::Cancelled);
        assert!(!g.is_busy());
        g.set_obstacle(Coord::new(5, 5)).unwrap();
    }

    #[test]
    fn cancelled_run_marks_no_path() {
        let config = EngineConfig::default()
            .with_size(20, 20)
            .with_step_delay(Duration::from_secs(60));
        let mut g = grid(&config);
        let (tx, rx) = mpsc::channel();
        let handle = spawn_run(&mut g, &config, tx).unwrap();
        handle.cancel();
        assert_eq!(handle.join().unwrap(), Outcome::Cancelled);

        let events: Vec<_> = rx.iter().collect();
        assert!(!events.iter().any(|e| matches!(
            e,
            StepEvent::CellChanged(c) if c.state == SearchState::Path
        )));
        assert_eq!(events.last(), Some(&StepEvent::RunComplete(Outcome::Cancelled)));
    }

    #[test]
    fn unconfigured_grid_never_starts() {
        let config = EngineConfig::default().with_size(4, 4);
        let mut g = config.new_grid();
        let err = spawn_run(&mut g, &config, Vec::<StepEvent>::new()).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Grid(GridError::NotConfigured { .. })
        ));
        assert!(!g.is_busy());
    }

    #[test]
    fn wrong_size_never_starts() {
        let config = EngineConfig::default().with_size(4, 4);
        let mut g = GridGraph::new(3, 3);
        g.set_start(Coord::new(0, 0)).unwrap();
        g.set_end(Coord::new(2, 2)).unwrap();
        assert!(matches!(
            spawn_run(&mut g, &config, Vec::<StepEvent>::new()),
            Err(SearchError::Grid(GridError::DimensionMismatch { .. }))
        ));
    }
}
