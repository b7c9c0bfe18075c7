//! State-space graphs of sliding-block puzzles, laid out in 3D.

pub mod codec;
pub mod error;
pub mod explore;
pub mod graph;
pub mod layout;
pub mod preset;
pub mod puzzle;
pub mod simulation;
pub mod vector;

pub use codec::StateId;
pub use error::SimulationError;
pub use explore::{explore, Exploration, ExploreLimits, ExploreSink};
pub use graph::{GraphBuilder, GraphEdge, GraphNode, LayoutGraph};
pub use layout::{ForceLayout, LayoutConfig};
pub use puzzle::{Block, Direction, Move, Puzzle};
pub use simulation::Simulation;
pub use vector::Vec3;
