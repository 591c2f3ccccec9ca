//! Interactive A* visualizer state, shared by the terminal binary and its
//! tests.
//!
//! [`Visualizer`] turns [`Command`]s into grid edits and background runs,
//! and mirrors each run's events onto its [`Board`] as they arrive.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use astarviz_core::{Bounds, GridError, GridGraph};
use astarviz_crossterm::{Board, Command, input};
use astarviz_search::{
    EngineConfig, Outcome, RunHandle, SearchError, StepEvent, Strategy, Termination,
    VisualizationSink, spawn_run,
};
use rand::rngs::StdRng;

pub const USAGE: &str = "usage: astarviz [LAYOUT] [--bidirectional] [--first-meeting] [--delay MS]";

const IDLE: &str =
    "click: start, end, walls | right click: erase | space: run | c: clear | r: scatter | q: quit";

/// Share of Empty cells turned into obstacles by a scatter.
const SCATTER_DENSITY: f64 = 0.3;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum DemoError {
    /// Bad command line.
    Args(String),
    Io(io::Error),
    Grid(GridError),
    Search(SearchError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Args(msg) => write!(f, "{msg}\n{USAGE}"),
            Self::Io(e) => write!(f, "{e}"),
            Self::Grid(e) => write!(f, "{e}"),
            Self::Search(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Args(_) => None,
            Self::Io(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Search(e) => Some(e),
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<GridError> for DemoError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<SearchError> for DemoError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Command-line settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    pub config: EngineConfig,
    /// Text layout to load instead of an empty grid.
    pub layout: Option<PathBuf>,
}

impl Options {
    /// Parse arguments, program name excluded.
    pub fn parse<I>(args: I) -> Result<Self, DemoError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bidirectional" => opts.config.mode = Strategy::Bidirectional,
                "--first-meeting" => opts.config.termination = Termination::FirstMeeting,
                "--delay" => {
                    let value = args
                        .next()
                        .ok_or_else(|| DemoError::Args("--delay needs a value".into()))?;
                    let ms: u64 = value.parse().map_err(|_| {
                        DemoError::Args(format!("--delay: {value:?} is not a number of milliseconds"))
                    })?;
                    opts.config.step_delay = Duration::from_millis(ms);
                }
                flag if flag.starts_with('-') => {
                    return Err(DemoError::Args(format!("unknown option {flag}")));
                }
                path if opts.layout.is_none() => opts.layout = Some(PathBuf::from(path)),
                extra => return Err(DemoError::Args(format!("unexpected argument {extra}"))),
            }
        }
        Ok(opts)
    }

    /// Shrink the configured grid so it fits within `available`.
    pub fn fit_to(&mut self, available: Bounds) {
        let width = self.config.grid_width.min(available.width);
        let height = self.config.grid_height.min(available.height);
        self.config = self.config.clone().with_size(width, height);
    }
}

// ---------------------------------------------------------------------------
// Visualizer
// ---------------------------------------------------------------------------

struct ActiveRun {
    handle: RunHandle,
    events: Receiver<StepEvent>,
}

/// Editor and run controller behind the terminal view.
pub struct Visualizer {
    board: Board,
    config: EngineConfig,
    rng: StdRng,
    run: Option<ActiveRun>,
    status: String,
    quit: bool,
}

impl Visualizer {
    /// Build the grid from the layout file, if any, or empty at the
    /// configured size.
    pub fn new(options: Options, rng: StdRng) -> Result<Self, DemoError> {
        let mut config = options.config;
        let grid = match &options.layout {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let grid = GridGraph::from_layout(&text)?;
                log::info!("loaded {} layout from {}", grid.bounds(), path.display());
                config = config.with_size(grid.width(), grid.height());
                grid
            }
            None => config.new_grid(),
        };
        Ok(Self {
            board: Board::new(grid),
            config,
            rng,
            run: None,
            status: IDLE.into(),
            quit: false,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    #[inline]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// React to one user command.
    ///
    /// While a run is active only Clear (which cancels it) and Quit are
    /// honored.
    pub fn handle(&mut self, cmd: Command) -> Result<(), DemoError> {
        if let Some(run) = &self.run {
            match cmd {
                Command::Clear => {
                    run.handle.cancel();
                    self.status = "cancelling...".into();
                }
                Command::Quit => {
                    run.handle.cancel();
                    self.quit = true;
                }
                _ => {}
            }
            return Ok(());
        }

        match cmd {
            Command::Place(c) => self.edit(|g| input::place(g, c)),
            Command::Paint(c) => self.edit(|g| input::paint(g, c)),
            Command::Erase(c) => self.edit(|g| g.clear_cell(c)),
            Command::Run => self.start()?,
            Command::Clear => {
                self.board.grid_mut().clear()?;
                self.status = IDLE.into();
            }
            Command::Scatter => {
                let placed = self
                    .board
                    .grid_mut()
                    .scatter_obstacles(SCATTER_DENSITY, &mut self.rng)?;
                self.status = format!("placed {placed} obstacles");
            }
            Command::Quit => self.quit = true,
        }
        Ok(())
    }

    fn edit(&mut self, f: impl FnOnce(&mut GridGraph) -> Result<(), GridError>) {
        if let Err(e) = f(self.board.grid_mut()) {
            log::debug!("edit refused: {e}");
            self.status = e.to_string();
        }
    }

    fn start(&mut self) -> Result<(), DemoError> {
        let (tx, rx) = mpsc::channel();
        match spawn_run(self.board.grid_mut(), &self.config, tx) {
            Ok(handle) => {
                self.run = Some(ActiveRun { handle, events: rx });
                self.status = format!("searching ({:?})... c: cancel", self.config.mode);
                Ok(())
            }
            Err(SearchError::Grid(e @ GridError::NotConfigured { .. })) => {
                self.status = format!("{e}: place it first");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply every event the active run has produced so far. Once the run
    /// reports completion its worker is joined and the grid is editable
    /// again.
    pub fn pump(&mut self) -> Result<(), DemoError> {
        let Some(run) = &self.run else {
            return Ok(());
        };
        let mut finished = false;
        loop {
            match run.events.try_recv() {
                Ok(ev) => {
                    finished |= matches!(ev, StepEvent::RunComplete(_));
                    self.board.deliver(&ev);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }
        if !finished {
            return Ok(());
        }
        if let Some(run) = self.run.take() {
            let outcome = run.handle.join()?;
            self.status = describe(&outcome);
        }
        Ok(())
    }

    /// Cancel and join any active run.
    pub fn shutdown(&mut self) -> Result<(), DemoError> {
        if let Some(run) = self.run.take() {
            run.handle.cancel();
            run.handle.join()?;
        }
        Ok(())
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::PathFound(route) => format!("path found: {} moves", route.cost()),
        Outcome::NoPathExists => "no path exists".into(),
        Outcome::Cancelled => "search cancelled".into(),
    }
}
