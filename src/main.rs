mod view;

use std::error::Error;
use std::ops::ControlFlow;
use std::time::Duration;

use slider_graph::simulation::DEFAULT_SEED;
use slider_graph::{preset, ExploreLimits, LayoutConfig, Simulation};
use tracing_subscriber::EnvFilter;
use view::TerminalView;

const FRAME_BUDGET: Duration = Duration::from_millis(16);

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let puzzle = preset::starter()?;
    println!("Initial Puzzle:\n{}", puzzle);

    let (mut simulation, exploration) = Simulation::from_puzzle(
        &puzzle,
        LayoutConfig::default(),
        ExploreLimits::default(),
        DEFAULT_SEED,
    )?;
    println!(
        "Found {} states connected by {} moves",
        exploration.visited.len(),
        exploration.edges
    );

    let mut view = TerminalView::open()?;
    let mut failure = None;
    simulation.run(|graph, frame| {
        match view
            .draw(graph, frame)
            .and_then(|()| view.quit_requested(FRAME_BUDGET))
        {
            Ok(false) => ControlFlow::Continue(()),
            Ok(true) => ControlFlow::Break(()),
            Err(err) => {
                failure = Some(err);
                ControlFlow::Break(())
            }
        }
    });
    drop(view);

    if let Some(err) = failure {
        return Err(err.into());
    }
    println!("Stopped after {} frames", simulation.frame());
    Ok(())
}
