use thiserror::Error;

use crate::codec::StateId;

/// Rejections from [`Puzzle::new`](crate::puzzle::Puzzle::new).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("board size must be at least 1")]
    EmptyBoard,

    #[error("board size {size} has more cells than can be addressed")]
    BoardTooLarge { size: usize },

    #[error("too many blocks: {count} (at most {max} can be labelled)")]
    TooManyBlocks { count: usize, max: usize },

    #[error("block {block} has zero length")]
    ZeroLength { block: usize },

    #[error("block {block} does not fit on the board")]
    OutOfBounds { block: usize },

    #[error("block {block} overlaps block {other} at ({x}, {y})")]
    Overlap {
        block: usize,
        other: usize,
        x: usize,
        y: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} already exists")]
    DuplicateNode(StateId),

    #[error("unknown node {0}")]
    UnknownNode(StateId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExploreError {
    #[error("state space exceeds the limit of {limit} states")]
    StateLimit { limit: usize },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Rejections from [`LayoutConfig::validate`](crate::layout::LayoutConfig::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    #[error("{name} must be positive")]
    NonPositive { name: &'static str },

    #[error("{name} must not be negative")]
    Negative { name: &'static str },

    #[error("damping must lie strictly between 0 and 1, got {value}")]
    DampingOutOfRange { value: f64 },
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Explore(#[from] ExploreError),
}
