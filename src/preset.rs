use crate::error::PuzzleError;
use crate::puzzle::{Block, Puzzle};

pub const STARTER_SIZE: usize = 5;

/// The seven-block 5×5 board the demo explores.
pub fn starter_blocks() -> Vec<Block> {
    vec![
        Block::horizontal(0, 0, 2),
        Block::vertical(3, 3, 1),
        Block::horizontal(0, 1, 2),
        Block::vertical(2, 0, 3),
        Block::vertical(0, 2, 2),
        Block::vertical(3, 1, 2),
        Block::horizontal(1, 4, 2),
    ]
}

pub fn starter() -> Result<Puzzle, PuzzleError> {
    Puzzle::new(STARTER_SIZE, starter_blocks())
}
