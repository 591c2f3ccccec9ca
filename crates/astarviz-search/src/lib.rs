//! Step-wise A* search over an [`astarviz_core::GridGraph`].
//!
//! The engine advances one expansion at a time and reports every label
//! change as a [`StepEvent`], so a front end can animate the search:
//!
//! - **A\*** from Start to End ([`Strategy::Unidirectional`])
//! - **Bidirectional A\*** from both ends at once ([`Strategy::Bidirectional`]),
//!   stopping either at the first meeting or once the best meeting is
//!   provably shortest ([`Termination`])
//!
//! [`SearchEngine::step`] drives a run by hand. [`drive`] runs it to the end
//! with pacing, and [`spawn_run`] does the same on a worker thread while the
//! grid stays locked against edits.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`AstarPather`] : [`Pather`] | [`SearchEngine`] |
//! | [`VisualizationSink`] | receiving events from [`SearchEngine::run`] and [`drive`] |

mod cancel;
mod config;
mod distance;
mod engine;
mod error;
mod event;
mod frontier;
mod reconstruct;
mod runner;
mod table;
mod traits;

pub use cancel::CancelToken;
pub use config::EngineConfig;
pub use distance::manhattan;
pub use engine::{EngineStatus, SearchEngine, Strategy, Termination};
pub use error::SearchError;
pub use event::{CellChange, Outcome, Route, StepEvent, VisualizationSink};
pub use frontier::{FrontierEntry, PriorityFrontier};
pub use runner::{RunHandle, drive, spawn_run};
pub use table::{Direction, NodeRecord, SearchTable, UNREACHABLE};
pub use traits::{AstarPather, Pather};
