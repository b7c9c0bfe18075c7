use indexmap::IndexSet;

use crate::codec::StateId;
use crate::error::{ExploreError, GraphError};
use crate::puzzle::Puzzle;

/// Receives the graph as it is discovered.
pub trait ExploreSink {
    /// Called once per distinct configuration, before any edge into it.
    fn node_discovered(&mut self, id: &StateId) -> Result<(), GraphError>;

    /// Called once per move application, including moves that lead back to
    /// an already discovered configuration.
    fn edge_discovered(&mut self, from: &StateId, to: &StateId) -> Result<(), GraphError>;
}

impl ExploreSink for () {
    fn node_discovered(&mut self, _id: &StateId) -> Result<(), GraphError> {
        Ok(())
    }

    fn edge_discovered(&mut self, _from: &StateId, _to: &StateId) -> Result<(), GraphError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExploreLimits {
    /// Abort once more than this many distinct states have been found.
    pub max_states: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Exploration {
    /// Every discovered configuration, in discovery order.
    pub visited: IndexSet<StateId>,
    pub edges: usize,
    /// Deepest the work stack grew.
    pub max_stack: usize,
}

pub fn explore<S: ExploreSink>(
    initial: &Puzzle,
    sink: &mut S,
    limits: ExploreLimits,
) -> Result<Exploration, ExploreError> {
    let mut visited = IndexSet::new();
    let mut edges = 0;
    let mut max_stack = 1;
    let mut stack: Vec<(Puzzle, Option<StateId>)> = vec![(initial.clone(), None)];

    while let Some((puzzle, parent)) = stack.pop() {
        let id = puzzle.id();

        if visited.contains(id) {
            if let Some(parent) = &parent {
                tracing::debug!(from = %parent, to = %id, "edge to known state");
                sink.edge_discovered(parent, id)?;
                edges += 1;
            }
            continue;
        }

        if let Some(limit) = limits.max_states {
            if visited.len() >= limit {
                return Err(ExploreError::StateLimit { limit });
            }
        }

        tracing::trace!(%id, "visiting");
        visited.insert(id.clone());
        sink.node_discovered(id)?;
        if let Some(parent) = &parent {
            sink.edge_discovered(parent, id)?;
            edges += 1;
        }

        let children = puzzle.successors();
        // Reversed so children pop in move order, as a recursive walk visits them.
        stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, Some(id.clone()))),
        );
        max_stack = max_stack.max(stack.len());
    }

    tracing::info!(
        states = visited.len(),
        edges,
        max_stack,
        "exploration complete"
    );
    Ok(Exploration {
        visited,
        edges,
        max_stack,
    })
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::puzzle::Block;

    #[derive(Debug, PartialEq)]
    enum Event {
        Node(String),
        Edge(String, String),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl ExploreSink for Recorder {
        fn node_discovered(&mut self, id: &StateId) -> Result<(), GraphError> {
            self.0.push(Event::Node(id.to_string()));
            Ok(())
        }

        fn edge_discovered(&mut self, from: &StateId, to: &StateId) -> Result<(), GraphError> {
            self.0.push(Event::Edge(from.to_string(), to.to_string()));
            Ok(())
        }
    }

    /// Reference walk written recursively.
    fn recursive(
        puzzle: &Puzzle,
        parent: Option<&StateId>,
        seen: &mut IndexSet<StateId>,
        out: &mut Recorder,
    ) {
        let id = puzzle.id();
        if seen.contains(id) {
            if let Some(parent) = parent {
                out.edge_discovered(parent, id).unwrap();
            }
            return;
        }
        seen.insert(id.clone());
        out.node_discovered(id).unwrap();
        if let Some(parent) = parent {
            out.edge_discovered(parent, id).unwrap();
        }
        for child in puzzle.successors() {
            recursive(&child, Some(id), seen, out);
        }
    }

    #[test]
    fn single_cell_slider() {
        // One 1×1 block on a 1×3 strip of a 3×3 board: three positions in a row.
        let puzzle = Puzzle::new(3, vec![Block::horizontal(0, 1, 1)]).unwrap();
        let mut recorder = Recorder::default();
        let result = explore(&puzzle, &mut recorder, ExploreLimits::default()).unwrap();

        let a = "...A.....".to_string();
        let b = "....A....".to_string();
        let c = ".....A...".to_string();
        assert_eq!(
            recorder.0,
            vec![
                Event::Node(a.clone()),
                Event::Node(b.clone()),
                Event::Edge(a.clone(), b.clone()),
                Event::Edge(b.clone(), a.clone()),
                Event::Node(c.clone()),
                Event::Edge(b.clone(), c.clone()),
                Event::Edge(c, b),
            ]
        );
        assert_eq!(result.visited.len(), 3);
        assert_eq!(result.edges, 4);
    }

    #[test]
    fn matches_recursive_order() {
        let puzzle = Puzzle::new(
            4,
            vec![
                Block::horizontal(0, 0, 2),
                Block::vertical(3, 0, 2),
                Block::vertical(1, 2, 2),
            ],
        )
        .unwrap();

        let mut iterative = Recorder::default();
        let result = explore(&puzzle, &mut iterative, ExploreLimits::default()).unwrap();

        let mut reference = Recorder::default();
        let mut seen = IndexSet::new();
        recursive(&puzzle, None, &mut seen, &mut reference);

        assert_eq!(iterative.0, reference.0);
        assert_eq!(result.visited, seen);
    }

    #[test]
    fn immovable_puzzle_has_one_state() {
        let puzzle =
            Puzzle::new(2, vec![Block::horizontal(0, 0, 2), Block::horizontal(0, 1, 2)]).unwrap();
        let result = explore(&puzzle, &mut (), ExploreLimits::default()).unwrap();
        assert_eq!(result.visited.len(), 1);
        assert_eq!(result.edges, 0);
    }

    #[test]
    fn state_limit_is_an_error() {
        let puzzle =
            Puzzle::new(5, vec![Block::horizontal(0, 0, 2), Block::vertical(3, 3, 1)]).unwrap();
        let limits = ExploreLimits {
            max_states: Some(5),
        };
        let err = explore(&puzzle, &mut (), limits).unwrap_err();
        assert_eq!(err, ExploreError::StateLimit { limit: 5 });
    }

    #[test]
    fn sink_errors_abort_exploration() {
        struct Refuse;
        impl ExploreSink for Refuse {
            fn node_discovered(&mut self, id: &StateId) -> Result<(), GraphError> {
                Err(GraphError::DuplicateNode(id.clone()))
            }
            fn edge_discovered(&mut self, _: &StateId, _: &StateId) -> Result<(), GraphError> {
                Ok(())
            }
        }

        let puzzle = Puzzle::new(3, vec![Block::horizontal(0, 1, 1)]).unwrap();
        let err = explore(&puzzle, &mut Refuse, ExploreLimits::default()).unwrap_err();
        assert!(matches!(err, ExploreError::Graph(GraphError::DuplicateNode(_))));
    }

    #[test]
    #[traced_test]
    fn logs_summary() {
        let puzzle = Puzzle::new(3, vec![Block::vertical(1, 0, 2)]).unwrap();
        explore(&puzzle, &mut (), ExploreLimits::default()).unwrap();
        assert!(logs_contain("exploration complete"));
    }
}
