use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// One snake on the board
///
/// The snake only does positional bookkeeping. It knows nothing about the
/// board, food or other snakes; the engine decides what a move means.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front and tail at the back
    body: VecDeque<Position>,
    /// Direction used by the last move
    direction: Direction,
    /// Latest accepted turn, committed on the next move
    pending_direction: Direction,
    /// The next move keeps the tail
    growing: bool,
    /// Last known body length, kept after the body is gone
    length: usize,
}

impl Snake {
    /// Minimum number of segments a live snake has
    pub const MIN_LENGTH: usize = 2;

    /// Create a new snake with given starting position and direction
    ///
    /// Segments are laid out behind the head, opposite to `direction`.
    /// Lengths below [`Snake::MIN_LENGTH`] are raised to it.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let length = length.max(Self::MIN_LENGTH);
        let back = direction.opposite();

        let mut body = VecDeque::with_capacity(length);
        body.push_back(head);
        for _ in 1..length {
            let prev = body[body.len() - 1];
            body.push_back(prev.moved_in_direction(back));
        }

        Self {
            body,
            direction,
            pending_direction: direction,
            growing: false,
            length,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Body segments, head first
    pub fn body(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.length
    }

    /// Always false for a constructed snake
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    /// Record a turn to apply on the next move
    ///
    /// Ignored when `candidate` is the current direction or its reverse.
    /// A later valid request replaces an earlier one.
    pub fn request_direction_change(&mut self, candidate: Direction) {
        if candidate == self.direction || candidate.is_opposite(self.direction) {
            return;
        }
        self.pending_direction = candidate;
    }

    /// Where the head will be after the next [`Snake::advance`]
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.pending_direction)
    }

    /// Make the next move keep the tail
    pub fn mark_growth(&mut self) {
        self.growing = true;
    }

    /// Move one cell in the pending direction
    ///
    /// Returns the new head and the cell the tail left, or `None` for the
    /// vacated cell when the snake grew on this move.
    pub fn advance(&mut self) -> (Position, Option<Position>) {
        self.direction = self.pending_direction;

        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_front(new_head);

        let vacated = if self.growing {
            self.growing = false;
            None
        } else {
            self.body.pop_back()
        };

        self.length = self.body.len();
        (new_head, vacated)
    }
}
