use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::state::Position;

/// Random probes tried before falling back to a scan of the free cells
pub const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Contents of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Food,
    /// Occupied by the body of the snake with this index
    Snake(usize),
}

/// Occupancy grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an all-empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `pos`; returns false when out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn food_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Food).count()
    }

    /// Positions of every empty cell, row-major
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(move |(i, _)| Position::new((i % width) as i32, (i / width) as i32))
    }

    /// Pick a uniformly random empty cell
    ///
    /// Samples random coordinates first; after [`FOOD_SAMPLE_ATTEMPTS`]
    /// misses it chooses among the remaining empty cells directly, so a
    /// nearly full board still terminates. Returns `None` on a full board.
    pub fn random_empty_cell<R: Rng>(&self, rng: &mut R) -> Option<Position> {
        if self.cells.is_empty() {
            return None;
        }

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            if self.cells[y * self.width + x] == Cell::Empty {
                return Some(Position::new(x as i32, y as i32));
            }
        }

        self.empty_positions().choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bounds_checking() {
        let board = Board::new(20, 10);

        assert!(board.in_bounds(Position::new(0, 0)));
        assert!(board.in_bounds(Position::new(19, 9)));
        assert!(!board.in_bounds(Position::new(-1, 0)));
        assert!(!board.in_bounds(Position::new(20, 0)));
        assert!(!board.in_bounds(Position::new(0, 10)));
        assert_eq!(board.get(Position::new(0, -1)), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new(4, 4);
        assert!(board.set(Position::new(1, 2), Cell::Snake(1)));
        assert!(board.set(Position::new(3, 3), Cell::Food));
        assert!(!board.set(Position::new(4, 0), Cell::Food));

        assert_eq!(board.get(Position::new(1, 2)), Some(Cell::Snake(1)));
        assert_eq!(board.get(Position::new(0, 0)), Some(Cell::Empty));
        assert_eq!(board.cells()[2 * 4 + 1], Cell::Snake(1));
        assert_eq!(board.food_count(), 1);
    }

    #[test]
    fn test_random_empty_cell_avoids_occupied() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(3, 3);
        for pos in [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)] {
            board.set(Position::new(pos.0, pos.1), Cell::Snake(0));
        }

        for _ in 0..50 {
            let pos = board.random_empty_cell(&mut rng);
            assert!(matches!(pos, Some(p) if p.y == 2));
        }
    }

    #[test]
    fn test_random_empty_cell_on_nearly_full_board() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut board = Board::new(30, 30);
        for y in 0..30 {
            for x in 0..30 {
                board.set(Position::new(x, y), Cell::Snake(0));
            }
        }
        board.set(Position::new(17, 23), Cell::Empty);

        assert_eq!(board.random_empty_cell(&mut rng), Some(Position::new(17, 23)));
    }

    #[test]
    fn test_random_empty_cell_on_full_board() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = Board::new(2, 1);
        board.set(Position::new(0, 0), Cell::Food);
        board.set(Position::new(1, 0), Cell::Snake(0));

        assert_eq!(board.random_empty_cell(&mut rng), None);
        assert_eq!(Board::new(0, 0).random_empty_cell(&mut rng), None);
    }
}
