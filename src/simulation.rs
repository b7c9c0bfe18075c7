use std::ops::ControlFlow;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SimulationError;
use crate::explore::{explore, Exploration, ExploreLimits};
use crate::graph::{GraphBuilder, LayoutGraph};
use crate::layout::{ForceLayout, LayoutConfig};
use crate::puzzle::Puzzle;

pub const DEFAULT_SEED: u64 = 0x5EED;

pub struct Simulation<R> {
    graph: LayoutGraph,
    layout: ForceLayout<R>,
    frame: u64,
    reported_non_finite: bool,
}

impl Simulation<ChaCha8Rng> {
    /// Explore `initial` and set up a layout over the resulting graph.
    ///
    /// A single ChaCha8 stream seeded from `seed` scatters the initial
    /// positions and then drives the coincident-node kicks.
    pub fn from_puzzle(
        initial: &Puzzle,
        config: LayoutConfig,
        limits: ExploreLimits,
        seed: u64,
    ) -> Result<(Self, Exploration), SimulationError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut builder = GraphBuilder::new(&mut rng, config.initial_spread);
        let exploration = explore(initial, &mut builder, limits)?;
        let graph = builder.finish();
        let layout = ForceLayout::new(config, rng)?;
        Ok((Self::new(graph, layout), exploration))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn new(graph: LayoutGraph, layout: ForceLayout<R>) -> Self {
        Self {
            graph,
            layout,
            frame: 0,
            reported_non_finite: false,
        }
    }

    pub fn graph(&self) -> &LayoutGraph {
        &self.graph
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn step(&mut self) {
        self.layout.step(&mut self.graph);
        self.frame += 1;

        tracing::trace!(
            frame = self.frame,
            energy = self.graph.kinetic_energy(),
            "frame"
        );
        if !self.reported_non_finite && !self.graph.is_finite() {
            self.reported_non_finite = true;
            tracing::warn!(frame = self.frame, "layout produced a non-finite value");
        }
    }

    pub fn run_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Step, then hand the graph to `on_frame`, until it breaks.
    pub fn run<F>(&mut self, mut on_frame: F)
    where
        F: FnMut(&LayoutGraph, u64) -> ControlFlow<()>,
    {
        loop {
            self.step();
            if on_frame(&self.graph, self.frame).is_break() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ExploreError};
    use crate::puzzle::Block;

    fn scenario() -> Puzzle {
        Puzzle::new(5, vec![Block::horizontal(0, 0, 2), Block::vertical(3, 3, 1)]).unwrap()
    }

    #[test]
    fn builds_graph_from_puzzle() {
        let (sim, exploration) = Simulation::from_puzzle(
            &scenario(),
            LayoutConfig::default(),
            ExploreLimits::default(),
            DEFAULT_SEED,
        )
        .unwrap();
        assert_eq!(sim.graph().node_count(), exploration.visited.len());
        assert_eq!(sim.graph().edge_count(), exploration.edges);
        assert_eq!(&sim.graph().root().unwrap().id, scenario().id());
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn invalid_config_is_rejected_before_exploring() {
        let config = LayoutConfig {
            damping: 1.0,
            ..LayoutConfig::default()
        };
        let err = Simulation::from_puzzle(&scenario(), config, ExploreLimits::default(), 1)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimulationError::Config(ConfigError::DampingOutOfRange { .. })
        ));
    }

    #[test]
    fn state_limit_surfaces() {
        let limits = ExploreLimits {
            max_states: Some(3),
        };
        let err = Simulation::from_puzzle(&scenario(), LayoutConfig::default(), limits, 1)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SimulationError::Explore(ExploreError::StateLimit { limit: 3 })
        ));
    }

    #[test]
    fn run_stops_when_host_breaks() {
        let (mut sim, _) = Simulation::from_puzzle(
            &scenario(),
            LayoutConfig::default(),
            ExploreLimits::default(),
            3,
        )
        .unwrap();

        let mut seen = Vec::new();
        sim.run(|graph, frame| {
            assert!(graph.is_finite());
            seen.push(frame);
            if frame == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(sim.frame(), 4);
    }

    #[test]
    fn same_seed_same_layout() {
        let run = || {
            let (mut sim, _) = Simulation::from_puzzle(
                &scenario(),
                LayoutConfig::default(),
                ExploreLimits::default(),
                42,
            )
            .unwrap();
            sim.run_frames(50);
            sim.graph()
                .nodes()
                .map(|node| node.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
