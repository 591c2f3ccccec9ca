//! The step-wise A* engine.
//!
//! [`SearchEngine`] runs either a classic unidirectional A* or a
//! bidirectional A* over any [`AstarPather`]. Both share the frontier,
//! the relaxation rule and path reconstruction; they differ only in how the
//! frontiers are seeded and when the search stops.
//!
//! The engine is pull-based: every [`step`](SearchEngine::step) performs at
//! most one expansion and returns the events that expansion produced. Pacing
//! and cancellation belong to whoever calls `step` (see
//! [`drive`](crate::drive)).
//!
//! Start and End receive Open and Closed events like any other cell, but
//! are left out of the Path marking. A front end draws them by role.

use astarviz_core::{Bounds, Coord, GridError, Role, RoleSnapshot, SearchState};

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::SearchError;
use crate::event::{CellChange, Outcome, StepEvent, VisualizationSink};
use crate::frontier::PriorityFrontier;
use crate::reconstruct;
use crate::table::{Direction, SearchTable, UNREACHABLE};
use crate::traits::AstarPather;

/// Which search to run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// One frontier growing from Start until End is popped.
    #[default]
    Unidirectional,
    /// Frontiers growing from both Start and End, alternating one expansion
    /// each.
    Bidirectional,
}

/// Stopping rule for bidirectional search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Stop at the first cell closed by both sides. Cheap, but the spliced
    /// route can be longer than the shortest one.
    FirstMeeting,
    /// Track the best spliced route seen during relaxation and stop once no
    /// unexpanded cell can beat it. Always returns a shortest route.
    #[default]
    Optimal,
}

/// Where an engine is in its run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    Ready,
    Running,
    PathFound,
    NoPathExists,
    Cancelled,
}

impl EngineStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::PathFound | Self::NoPathExists | Self::Cancelled)
    }
}

/// A single A* run over `P`, advanced one expansion at a time.
pub struct SearchEngine<P: AstarPather = RoleSnapshot> {
    pather: P,
    bounds: Bounds,
    start: usize,
    end: usize,
    strategy: Strategy,
    termination: Termination,
    table: SearchTable,
    frontiers: [PriorityFrontier; 2],
    status: EngineStatus,
    outcome: Option<Outcome>,
    turn: Direction,
    // Best spliced route so far: (forward g + backward g, meeting index).
    best: Option<(i32, usize)>,
    expansions: usize,
    cancel: CancelToken,
    events: Vec<StepEvent>,
    nbuf: Vec<Coord>,
}

impl SearchEngine<RoleSnapshot> {
    /// Build an engine over a run snapshot with the configured strategy.
    pub fn from_snapshot(
        snapshot: RoleSnapshot,
        config: &EngineConfig,
    ) -> Result<Self, SearchError> {
        let (start, end) = (snapshot.start(), snapshot.end());
        Ok(Self::new(snapshot, start, end, config.mode)?.with_termination(config.termination))
    }
}

impl<P: AstarPather> SearchEngine<P> {
    /// Create an engine searching from `start` to `end`.
    ///
    /// Fails with [`GridError::OutOfBounds`] if either endpoint lies outside
    /// `pather.bounds()`, and with [`GridError::InvalidTransition`] if they
    /// are the same cell.
    pub fn new(
        pather: P,
        start: Coord,
        end: Coord,
        strategy: Strategy,
    ) -> Result<Self, SearchError> {
        let bounds = pather.bounds();
        let start_idx = bounds.index(start).ok_or(GridError::OutOfBounds(start))?;
        let end_idx = bounds.index(end).ok_or(GridError::OutOfBounds(end))?;
        if start_idx == end_idx {
            return Err(GridError::InvalidTransition {
                coord: end,
                role: Role::End,
                reason: "end coincides with start",
            }
            .into());
        }
        Ok(Self {
            start: start_idx,
            end: end_idx,
            table: SearchTable::new(bounds.len()),
            bounds,
            pather,
            strategy,
            termination: Termination::default(),
            frontiers: [PriorityFrontier::new(), PriorityFrontier::new()],
            status: EngineStatus::Ready,
            outcome: None,
            turn: Direction::Forward,
            best: None,
            expansions: 0,
            cancel: CancelToken::new(),
            events: Vec::new(),
            nbuf: Vec::with_capacity(4),
        })
    }

    /// Set the bidirectional stopping rule (builder).
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Share a cancellation token with the engine (builder).
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[inline]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// The terminal outcome, once the run has ended.
    #[inline]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Number of cells expanded so far. Stale frontier entries do not count.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Per-node bookkeeping of the current run.
    #[inline]
    pub fn table(&self) -> &SearchTable {
        &self.table
    }

    /// Throw away all search state so the next [`step`](Self::step) starts a
    /// fresh run. The cancellation token is kept.
    pub fn reset(&mut self) {
        self.table.reset();
        for f in &mut self.frontiers {
            f.clear();
        }
        self.status = EngineStatus::Ready;
        self.outcome = None;
        self.turn = Direction::Forward;
        self.best = None;
        self.expansions = 0;
        self.events.clear();
    }

    /// Advance the run by one step and return the events it produced.
    ///
    /// The first call seeds the frontiers and opens the origins. Each later
    /// call expands at most one cell, or ends the run. Once the run has ended this returns an
    /// empty slice.
    pub fn step(&mut self) -> Result<&[StepEvent], SearchError> {
        self.events.clear();
        if self.status.is_terminal() {
            return Ok(self.events.as_slice());
        }
        if self.cancel.is_cancelled() {
            self.finish(Outcome::Cancelled);
            return Ok(self.events.as_slice());
        }

        match self.status {
            EngineStatus::Ready => self.seed(),
            _ => match self.strategy {
                Strategy::Unidirectional => self.step_unidirectional()?,
                Strategy::Bidirectional => match self.termination {
                    Termination::FirstMeeting => self.step_first_meeting()?,
                    Termination::Optimal => self.step_optimal()?,
                },
            },
        }
        Ok(self.events.as_slice())
    }

    /// Step until the run ends, feeding every event to `sink`. No pacing.
    pub fn run(&mut self, sink: &mut impl VisualizationSink) -> Result<Outcome, SearchError> {
        loop {
            for event in self.step()? {
                sink.deliver(event);
            }
            if let Some(outcome) = &self.outcome {
                return Ok(outcome.clone());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Strategies
    // -----------------------------------------------------------------------

    fn seed(&mut self) {
        self.status = EngineStatus::Running;
        let (start, end) = (self.bounds.coord(self.start), self.bounds.coord(self.end));
        log::debug!("{:?} search {start} -> {end} on {}", self.strategy, self.bounds);

        self.open_origin(self.start, end, Direction::Forward);
        if self.strategy == Strategy::Bidirectional {
            self.open_origin(self.end, start, Direction::Backward);
        }
    }

    fn open_origin(&mut self, idx: usize, target: Coord, dir: Direction) {
        let h = self.pather.estimate(self.bounds.coord(idx), target);
        let rec = self.table.get_mut(idx, dir);
        rec.g = 0;
        rec.h = h;
        rec.f = h;
        rec.open = true;
        self.frontiers[dir.slot()].push(idx, h);
        self.emit(idx, SearchState::Open, dir);
    }

    fn step_unidirectional(&mut self) -> Result<(), SearchError> {
        let Some(ci) = self.pop_valid(Direction::Forward) else {
            self.finish(Outcome::NoPathExists);
            return Ok(());
        };
        if ci == self.end {
            return self.finish_path(ci);
        }
        self.close(ci, Direction::Forward);
        self.relax_neighbors(ci, Direction::Forward);
        Ok(())
    }

    fn step_first_meeting(&mut self) -> Result<(), SearchError> {
        loop {
            let dir = self.turn;
            if dir == Direction::Forward
                && (self.frontiers[0].is_empty() || self.frontiers[1].is_empty())
            {
                self.finish(Outcome::NoPathExists);
                return Ok(());
            }
            self.turn = dir.opposite();

            // A side holding only stale entries passes its turn.
            let Some(ci) = self.pop_valid(dir) else {
                continue;
            };
            self.close(ci, dir);
            if self.table.get(ci, dir.opposite()).closed {
                return self.finish_path(ci);
            }
            self.relax_neighbors(ci, dir);
            return Ok(());
        }
    }

    fn step_optimal(&mut self) -> Result<(), SearchError> {
        let top_fwd = self.min_valid_priority(Direction::Forward);
        let top_bwd = self.min_valid_priority(Direction::Backward);

        let (top_fwd, top_bwd) = match (top_fwd, top_bwd) {
            (Some(f), Some(b)) => (f, b),
            _ => {
                return match self.best {
                    Some((_, meet)) => self.finish_path(meet),
                    None => {
                        self.finish(Outcome::NoPathExists);
                        Ok(())
                    }
                };
            }
        };
        if let Some((cost, meet)) = self.best {
            if cost <= top_fwd.max(top_bwd) {
                return self.finish_path(meet);
            }
        }

        let dir = self.turn;
        self.turn = dir.opposite();
        // min_valid_priority left a valid entry on top of both frontiers.
        if let Some(ci) = self.pop_valid(dir) {
            self.close(ci, dir);
            self.relax_neighbors(ci, dir);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Shared machinery
    // -----------------------------------------------------------------------

    /// Pop entries until one whose node is not yet closed on `dir`.
    fn pop_valid(&mut self, dir: Direction) -> Option<usize> {
        let d = dir.slot();
        while let Some(entry) = self.frontiers[d].pop_min() {
            if !self.table.get(entry.node, dir).closed {
                return Some(entry.node);
            }
        }
        None
    }

    /// Discard stale entries from the top of the frontier and report the
    /// lowest live priority.
    fn min_valid_priority(&mut self, dir: Direction) -> Option<i32> {
        let d = dir.slot();
        while let Some(entry) = self.frontiers[d].peek() {
            if !self.table.get(entry.node, dir).closed {
                return Some(entry.priority);
            }
            self.frontiers[d].pop_min();
        }
        None
    }

    fn close(&mut self, ci: usize, dir: Direction) {
        let rec = self.table.get_mut(ci, dir);
        rec.closed = true;
        rec.open = false;
        self.expansions += 1;
        log::trace!("{dir:?} closed {} (g={})", self.bounds.coord(ci), rec.g);
        self.emit(ci, SearchState::Closed, dir);
    }

    fn relax_neighbors(&mut self, ci: usize, dir: Direction) {
        let target = match dir {
            Direction::Forward => self.bounds.coord(self.end),
            Direction::Backward => self.bounds.coord(self.start),
        };
        let current = self.bounds.coord(ci);
        let tentative_g = self.table.get(ci, dir).g + 1;
        let track_best = self.strategy == Strategy::Bidirectional
            && self.termination == Termination::Optimal;

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        self.pather.neighbors(current, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = self.bounds.index(np) else {
                continue;
            };
            let h = self.pather.estimate(np, target);
            let n = self.table.get_mut(ni, dir);
            if n.closed || tentative_g >= n.g {
                continue;
            }
            let first_visit = !n.is_reached();
            n.g = tentative_g;
            n.h = h;
            n.f = tentative_g + h;
            n.parent = Some(ci);
            n.open = true;
            let f = n.f;
            self.frontiers[dir.slot()].push(ni, f);

            if first_visit {
                self.emit(ni, SearchState::Open, dir);
            }
            if track_best {
                let other = self.table.get(ni, dir.opposite()).g;
                if other != UNREACHABLE {
                    let cost = tentative_g + other;
                    if self.best.is_none_or(|(best, _)| cost < best) {
                        self.best = Some((cost, ni));
                    }
                }
            }
        }

        self.nbuf = nbuf;
    }

    fn emit(&mut self, idx: usize, state: SearchState, direction: Direction) {
        self.events.push(StepEvent::CellChanged(CellChange {
            coord: self.bounds.coord(idx),
            state,
            direction,
        }));
    }

    fn finish_path(&mut self, at: usize) -> Result<(), SearchError> {
        let built = match self.strategy {
            Strategy::Unidirectional => reconstruct::unidirectional(&self.table, self.bounds, at),
            Strategy::Bidirectional => reconstruct::bidirectional(&self.table, self.bounds, at),
        };
        let (route, order) = match built {
            Ok(r) => r,
            Err(e) => {
                // Leave the engine terminal so callers cannot spin on it.
                self.status = EngineStatus::NoPathExists;
                return Err(e);
            }
        };
        for idx in order {
            if idx != self.start && idx != self.end {
                self.emit(idx, SearchState::Path, Direction::Forward);
            }
        }
        self.finish(Outcome::PathFound(route));
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) {
        self.status = match &outcome {
            Outcome::PathFound(_) => EngineStatus::PathFound,
            Outcome::NoPathExists => EngineStatus::NoPathExists,
            Outcome::Cancelled => EngineStatus::Cancelled,
        };
        match &outcome {
            Outcome::PathFound(route) => log::debug!(
                "path found: {} moves after {} expansions",
                route.cost(),
                self.expansions
            ),
            other => log::debug!("run ended: {other:?} after {} expansions", self.expansions),
        }
        self.events.push(StepEvent::RunComplete(outcome.clone()));
        self.outcome = Some(outcome);
    }
}
