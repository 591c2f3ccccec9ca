//! Terminal A* visualizer.
//!
//! Run: cargo run --bin astarviz -- [LAYOUT] [--bidirectional] [--first-meeting] [--delay MS]

use std::time::Duration;

use astarviz_crossterm::TermView;
use astarviz_demo::{DemoError, Options, Visualizer};
use rand::SeedableRng;
use rand::rngs::StdRng;

const FRAME: Duration = Duration::from_millis(16);

fn run() -> Result<(), DemoError> {
    let mut options = Options::parse(std::env::args().skip(1))?;
    let mut view = TermView::new();
    if options.layout.is_none() {
        options.fit_to(view.fitting_bounds()?);
    }
    let mut app = Visualizer::new(options, StdRng::from_os_rng())?;

    view.init()?;
    while !app.should_quit() {
        app.pump()?;
        view.draw(app.board(), app.status())?;
        if let Some(cmd) = view.poll(FRAME, app.board().grid().bounds())? {
            app.handle(cmd)?;
        }
    }
    view.close();
    app.shutdown()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
