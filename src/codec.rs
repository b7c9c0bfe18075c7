use std::fmt;

use crate::puzzle::Block;

/// Label of an unoccupied cell.
pub const EMPTY_CELL: u8 = b'.';

/// Block labels, indexed by block position in the sequence.
pub const LABELS: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Canonical identifier of a configuration: one label per cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(String);

impl StateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cell labels in row-major order.
    pub fn cells(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.cells().get(index) == Some(&EMPTY_CELL)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn label(index: usize) -> Option<u8> {
    LABELS.get(index).copied()
}

/// Encode `blocks` on a `size × size` board.
///
/// Callers guarantee the blocks are in bounds, non-overlapping and no more
/// than [`LABELS`] in number; [`Puzzle::new`](crate::puzzle::Puzzle::new)
/// checks exactly that. Cells past the board are skipped and unlabelled
/// blocks are drawn as `?`.
pub fn encode(blocks: &[Block], size: usize) -> StateId {
    let mut cells = vec![EMPTY_CELL; size * size];
    for (index, block) in blocks.iter().enumerate() {
        let symbol = label(index).unwrap_or(b'?');
        for (x, y) in block.cells().filter(|&(x, y)| x < size && y < size) {
            cells[y * size + x] = symbol;
        }
    }
    // Every byte is ASCII.
    StateId(cells.into_iter().map(char::from).collect())
}
