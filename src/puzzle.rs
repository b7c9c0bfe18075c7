use std::fmt;
use std::hash::{Hash, Hasher};

use crate::codec::{self, StateId, LABELS};
use crate::error::PuzzleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// `(dx, dy)` with `y` growing downwards.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        write!(f, "{}", s)
    }
}

/// A straight block covering `length` cells from `(x, y)`, rightwards if
/// horizontal and downwards otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub x: usize,
    pub y: usize,
    pub is_horizontal: bool,
    pub length: usize,
}

impl Block {
    pub fn horizontal(x: usize, y: usize, length: usize) -> Self {
        Self {
            x,
            y,
            is_horizontal: true,
            length,
        }
    }

    pub fn vertical(x: usize, y: usize, length: usize) -> Self {
        Self {
            x,
            y,
            is_horizontal: false,
            length,
        }
    }

    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.length).map(move |i| {
            if self.is_horizontal {
                (self.x + i, self.y)
            } else {
                (self.x, self.y + i)
            }
        })
    }

    /// The two directions along the block's own axis, decrement first.
    pub fn directions(&self) -> [Direction; 2] {
        if self.is_horizontal {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        }
    }

    fn fits(&self, size: usize) -> bool {
        let (far_x, far_y) = if self.is_horizontal {
            (self.x.checked_add(self.length), self.y.checked_add(1))
        } else {
            (self.x.checked_add(1), self.y.checked_add(self.length))
        };
        matches!((far_x, far_y), (Some(x), Some(y)) if x <= size && y <= size)
    }

    /// The cell this block would newly cover when slid one step in
    /// `direction`, or `None` for an off-axis direction or the board edge.
    fn leading_cell(&self, direction: Direction, size: usize) -> Option<(usize, usize)> {
        if direction.is_horizontal() != self.is_horizontal {
            return None;
        }
        match direction {
            Direction::Left => self.x.checked_sub(1).map(|x| (x, self.y)),
            Direction::Up => self.y.checked_sub(1).map(|y| (self.x, y)),
            Direction::Right => self
                .x
                .checked_add(self.length)
                .filter(|&x| x < size)
                .map(|x| (x, self.y)),
            Direction::Down => self
                .y
                .checked_add(self.length)
                .filter(|&y| y < size)
                .map(|y| (self.x, y)),
        }
    }
}

/// One block slid one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub block: usize,
    pub direction: Direction,
}

impl Move {
    pub fn new(block: usize, direction: Direction) -> Self {
        Self { block, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = LABELS.get(self.block).copied().map_or('?', char::from);
        write!(f, "{} {}", label, self.direction)
    }
}

/// A board configuration: the blocks in order plus their canonical id.
///
/// Two puzzles compare equal exactly when their ids do.
#[derive(Debug, Clone)]
pub struct Puzzle {
    size: usize,
    blocks: Vec<Block>,
    id: StateId,
}

impl Puzzle {
    /// Validate a layout and encode it.
    ///
    /// Rejects empty or unaddressable boards, blocks with zero length,
    /// blocks reaching past the board and overlapping blocks.
    pub fn new(size: usize, blocks: Vec<Block>) -> Result<Self, PuzzleError> {
        if size == 0 {
            return Err(PuzzleError::EmptyBoard);
        }
        let Some(cell_count) = size.checked_mul(size) else {
            return Err(PuzzleError::BoardTooLarge { size });
        };
        if blocks.len() > LABELS.len() {
            return Err(PuzzleError::TooManyBlocks {
                count: blocks.len(),
                max: LABELS.len(),
            });
        }

        let mut owners: Vec<Option<usize>> = vec![None; cell_count];
        for (index, block) in blocks.iter().enumerate() {
            if block.length == 0 {
                return Err(PuzzleError::ZeroLength { block: index });
            }
            if !block.fits(size) {
                return Err(PuzzleError::OutOfBounds { block: index });
            }
            for (x, y) in block.cells() {
                let owner = &mut owners[y * size + x];
                if let Some(other) = *owner {
                    return Err(PuzzleError::Overlap {
                        block: index,
                        other,
                        x,
                        y,
                    });
                }
                *owner = Some(index);
            }
        }

        let id = codec::encode(&blocks, size);
        Ok(Self { size, blocks, id })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// Legal single-cell slides, by block index then decrement before
    /// increment.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.blocks
            .iter()
            .enumerate()
            .flat_map(|(index, block)| {
                block
                    .directions()
                    .into_iter()
                    .map(move |direction| Move::new(index, direction))
            })
            .filter(|&mv| self.is_legal(mv))
            .collect()
    }

    pub fn is_legal(&self, movement: Move) -> bool {
        let Some(block) = self.blocks.get(movement.block) else {
            return false;
        };
        match block.leading_cell(movement.direction, self.size) {
            Some((x, y)) => self.id.is_empty_at(y * self.size + x),
            None => false,
        }
    }

    /// Slide one block in place; returns `false` and leaves the puzzle
    /// untouched when the move is illegal.
    pub fn apply_move(&mut self, movement: Move) -> bool {
        if !self.is_legal(movement) {
            return false;
        }

        let (dx, dy) = movement.direction.as_offset();
        let block = &mut self.blocks[movement.block];
        block.x = block.x.wrapping_add_signed(dx);
        block.y = block.y.wrapping_add_signed(dy);
        self.id = codec::encode(&self.blocks, self.size);
        true
    }

    pub fn try_move(&self, movement: Move) -> Option<Self> {
        let mut next = self.clone();
        if next.apply_move(movement) {
            Some(next)
        } else {
            None
        }
    }

    /// Every configuration one move away, in [`legal_moves`](Self::legal_moves) order.
    pub fn successors(&self) -> Vec<Self> {
        self.legal_moves()
            .into_iter()
            .filter_map(|movement| self.try_move(movement))
            .collect()
    }
}

impl PartialEq for Puzzle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Puzzle {}

impl Hash for Puzzle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.id.cells().chunks(self.size) {
            for &cell in row {
                write!(f, "{} ", char::from(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
