use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Cell;
use super::state::Position;

/// Why the losing snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Snake left the board
    Wall,
    /// Snake hit its own body
    SelfCollision,
    /// Snake hit the body of another snake
    SnakeCollision { other: usize },
}

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Index of the snake whose move ended the game
    pub loser: usize,
    /// The surviving snake, only defined for two-snake games
    pub winner: Option<usize>,
    /// Length of the winner when the game ended
    pub winner_length: Option<usize>,
    pub cause: DeathCause,
    /// Length of every snake when the game ended, by index
    pub final_lengths: Vec<usize>,
    /// Tick on which the game ended
    pub ticks: u64,
}

/// Read-only copy of the board after a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub width: usize,
    pub height: usize,
    /// Row-major cell states
    pub cells: Vec<Cell>,
    /// Set once the game has ended
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    pub fn terminated(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn loser(&self) -> Option<usize> {
        self.outcome.as_ref().map(|o| o.loser)
    }

    pub fn winner_length(&self) -> Option<usize> {
        self.outcome.as_ref().and_then(|o| o.winner_length)
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    pub fn food_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Food).count()
    }

    /// Number of cells held by snake `index`
    pub fn snake_cells(&self, index: usize) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Snake(index))
            .count()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }
}

/// Plain-text board: `-` empty, `O` food, `1`.. for each snake
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, "-")?,
                    Cell::Food => write!(f, "O")?,
                    Cell::Snake(index) => write!(f, "{}", index + 1)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
