use anyhow::{Result, bail, ensure};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use super::{
    board::{Board, Cell},
    config::{GameConfig, MAX_BOARD_SIDE},
    direction::Direction,
    inbox::{Inbox, InboxSender},
    snapshot::{DeathCause, Outcome, Snapshot},
    state::{Position, Snake},
};

/// Owns the board and the snakes and advances them in lockstep
///
/// One engine plays one game. Once a snake dies the engine is terminated
/// for good; start a new game with a new engine.
#[derive(Debug)]
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    board: Board,
    snakes: Vec<Snake>,
    inbox: Inbox,
    rng: R,
    tick: u64,
    outcome: Option<Outcome>,
}

impl GameEngine<StdRng> {
    /// Create a new game with the symmetric start layout
    ///
    /// Food placement is seeded from `config.seed` when set.
    pub fn new(config: GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create a new game with the symmetric start layout and a given RNG
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let snakes = initial_snakes(&config);
        Self::from_layout(config, snakes, &[], rng)
    }

    /// Create a game from explicit snakes and food positions
    ///
    /// Snakes must lie inside the board without overlapping. Food beyond
    /// the given positions is placed at random up to `config.food_count`.
    /// The player count is taken from `snakes`.
    pub fn from_layout(
        mut config: GameConfig,
        snakes: Vec<Snake>,
        food: &[Position],
        rng: R,
    ) -> Result<Self> {
        ensure!(!snakes.is_empty(), "a game needs at least one snake");
        ensure!(
            config.board_width > 0 && config.board_height > 0,
            "board {}x{} has no cells",
            config.board_width,
            config.board_height
        );
        ensure!(
            config.board_width <= MAX_BOARD_SIDE && config.board_height <= MAX_BOARD_SIDE,
            "board {}x{} exceeds the {} cell limit",
            config.board_width,
            config.board_height,
            MAX_BOARD_SIDE
        );
        config.players = snakes.len();

        let mut board = Board::new(config.board_width, config.board_height);
        for (index, snake) in snakes.iter().enumerate() {
            for segment in snake.body() {
                match board.get(segment) {
                    None => bail!("snake {} has segment {:?} off the board", index, segment),
                    Some(Cell::Snake(other)) => {
                        bail!("snake {} overlaps snake {} at {:?}", index, other, segment)
                    }
                    Some(_) => {
                        board.set(segment, Cell::Snake(index));
                    }
                }
            }
        }
        for &pos in food {
            ensure!(
                board.get(pos) == Some(Cell::Empty),
                "food at {:?} is not on an empty cell",
                pos
            );
            board.set(pos, Cell::Food);
        }

        let mut engine = Self {
            inbox: Inbox::new(snakes.len()),
            config,
            board,
            snakes,
            rng,
            tick: 0,
            outcome: None,
        };
        while engine.board.food_count() < engine.config.food_count {
            if !engine.place_food() {
                break;
            }
        }

        info!(
            width = engine.config.board_width,
            height = engine.config.board_height,
            players = engine.snakes.len(),
            food = engine.board.food_count(),
            "game started"
        );
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, index: usize) -> Option<&Snake> {
        self.snakes.get(index)
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn is_terminated(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Write handle for input listeners on other threads or tasks
    ///
    /// Requests posted here are applied at the start of the posting snake's
    /// move in the next tick.
    pub fn inbox(&self) -> InboxSender {
        self.inbox.sender()
    }

    /// Forward a turn request to one snake
    ///
    /// Does nothing for an unknown snake or a finished game.
    pub fn request_direction_change(&mut self, snake_index: usize, direction: Direction) {
        if self.outcome.is_some() {
            return;
        }
        match self.snakes.get_mut(snake_index) {
            Some(snake) => snake.request_direction_change(direction),
            None => debug!(snake_index, "ignoring turn for unknown snake"),
        }
    }

    /// Current board state, without advancing
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            width: self.board.width(),
            height: self.board.height(),
            cells: self.board.cells().to_vec(),
            outcome: self.outcome.clone(),
        }
    }

    /// Advance every snake by one cell
    ///
    /// Snakes move in index order and each move is written to the board
    /// before the next snake moves, so a later snake sees an earlier
    /// snake's new head and a not-yet-vacated tail. The first death ends
    /// the game and skips the remaining snakes.
    ///
    /// # Panics
    ///
    /// Panics if the game has already terminated.
    pub fn tick(&mut self) -> Snapshot {
        assert!(
            self.outcome.is_none(),
            "tick() called on a terminated game"
        );
        self.tick += 1;

        for index in 0..self.snakes.len() {
            if let Some(direction) = self.inbox.take(index) {
                self.snakes[index].request_direction_change(direction);
            }
            if self.step_snake(index).is_err() {
                break;
            }
        }

        trace!(tick = self.tick, "tick complete");
        self.snapshot()
    }

    /// Move one snake and apply the result to the board
    ///
    /// `Err` carries the cause when the move killed the snake.
    fn step_snake(&mut self, index: usize) -> Result<(), DeathCause> {
        let snake = &mut self.snakes[index];
        if self.board.get(snake.next_head()) == Some(Cell::Food) {
            snake.mark_growth();
        }
        let (head, vacated) = snake.advance();

        match self.board.get(head) {
            None => {
                self.terminate(index, DeathCause::Wall);
                return Err(DeathCause::Wall);
            }
            Some(Cell::Snake(other)) => {
                let cause = if other == index {
                    DeathCause::SelfCollision
                } else {
                    DeathCause::SnakeCollision { other }
                };
                self.terminate(index, cause);
                return Err(cause);
            }
            Some(Cell::Food) => {
                debug!(
                    snake = index,
                    x = head.x,
                    y = head.y,
                    length = self.snakes[index].len(),
                    "food eaten"
                );
                // The head cell still reads Food here, so the replacement
                // cannot land under the head.
                self.place_food();
            }
            Some(Cell::Empty) => {}
        }

        if let Some(tail) = vacated {
            self.board.set(tail, Cell::Empty);
        }
        self.board.set(head, Cell::Snake(index));
        Ok(())
    }

    /// Put one food item on a random empty cell
    fn place_food(&mut self) -> bool {
        match self.board.random_empty_cell(&mut self.rng) {
            Some(pos) => {
                self.board.set(pos, Cell::Food);
                true
            }
            None => {
                warn!("board is full, no room for food");
                false
            }
        }
    }

    fn terminate(&mut self, loser: usize, cause: DeathCause) {
        let final_lengths: Vec<usize> = self.snakes.iter().map(Snake::len).collect();
        let winner = (self.snakes.len() == 2).then(|| 1 - loser);
        let winner_length = winner.map(|w| final_lengths[w]);

        info!(
            tick = self.tick,
            loser,
            ?winner,
            ?cause,
            ?final_lengths,
            "game over"
        );

        self.inbox.close();
        self.outcome = Some(Outcome {
            loser,
            winner,
            winner_length,
            cause,
            final_lengths,
            ticks: self.tick,
        });
    }
}

/// Two-cell snakes spread evenly across the middle row
///
/// Even-indexed snakes face up with the tail below, odd-indexed snakes face
/// down with the tail above. With two players the heads sit at W/4 and 3W/4.
fn initial_snakes(config: &GameConfig) -> Vec<Snake> {
    let players = config.players;
    let y = (config.board_height / 2) as i32;

    (0..players)
        .map(|i| {
            let x = ((2 * i + 1) * config.board_width / (2 * players)) as i32;
            let direction = if i % 2 == 0 {
                Direction::Up
            } else {
                Direction::Down
            };
            Snake::new(Position::new(x, y), direction, Snake::MIN_LENGTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::with_rng(config, StdRng::seed_from_u64(42)).unwrap()
    }

    fn layout(width: usize, height: usize, snakes: Vec<Snake>, food: &[Position]) -> GameEngine {
        let config = GameConfig {
            food_count: food.len(),
            ..GameConfig::new(width, height)
        };
        GameEngine::from_layout(config, snakes, food, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_two_player_setup() {
        let engine = seeded(GameConfig::new(32, 32));

        let snakes = engine.snakes();
        assert_eq!(snakes.len(), 2);
        assert_eq!(snakes[0].head(), Position::new(8, 16));
        assert_eq!(snakes[0].tail(), Position::new(8, 17));
        assert_eq!(snakes[0].direction(), Direction::Up);
        assert_eq!(snakes[1].head(), Position::new(24, 16));
        assert_eq!(snakes[1].tail(), Position::new(24, 15));
        assert_eq!(snakes[1].direction(), Direction::Down);

        assert_eq!(engine.board().food_count(), 2);
        assert_eq!(engine.snapshot().snake_cells(0), 2);
        assert_eq!(engine.snapshot().snake_cells(1), 2);
        assert!(!engine.is_terminated());
    }

    #[test]
    fn test_layout_for_more_players() {
        for players in 1..=crate::game::config::MAX_PLAYERS {
            let config = GameConfig {
                players,
                ..GameConfig::new(2 * players.max(2), 3)
            };
            let engine = seeded(config);
            for (i, snake) in engine.snakes().iter().enumerate() {
                assert_eq!(engine.snapshot().snake_cells(i), 2);
                assert!(engine.board().in_bounds(snake.head()));
                assert!(engine.board().in_bounds(snake.tail()));
            }
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            players: 0,
            ..GameConfig::default()
        };
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_layout_rejects_overlap_and_bad_food() {
        let config = GameConfig::new(10, 10);
        let a = Snake::new(Position::new(3, 3), Direction::Up, 2);
        let b = Snake::new(Position::new(3, 4), Direction::Right, 2);
        let rng = StdRng::seed_from_u64(0);
        assert!(GameEngine::from_layout(config.clone(), vec![a.clone(), b], &[], rng).is_err());

        let off_board = Snake::new(Position::new(0, 0), Direction::Down, 2);
        let rng = StdRng::seed_from_u64(0);
        assert!(GameEngine::from_layout(config.clone(), vec![off_board], &[], rng).is_err());

        let rng = StdRng::seed_from_u64(0);
        let on_snake = [Position::new(3, 4)];
        assert!(GameEngine::from_layout(config, vec![a], &on_snake, rng).is_err());
    }

    #[test]
    fn test_layout_rejects_oversized_board() {
        let snake = Snake::new(Position::new(3, 3), Direction::Up, 2);
        let config = GameConfig::new(MAX_BOARD_SIDE + 1, 10);
        let rng = StdRng::seed_from_u64(0);
        let err = GameEngine::from_layout(config, vec![snake.clone()], &[], rng).unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let config = GameConfig::new(10, usize::MAX);
        let rng = StdRng::seed_from_u64(0);
        assert!(GameEngine::from_layout(config, vec![snake], &[], rng).is_err());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded(GameConfig {
            food_count: 0,
            ..GameConfig::new(20, 20)
        });
        let initial_head = engine.snakes()[0].head();

        let snapshot = engine.tick();

        assert!(!snapshot.terminated());
        assert_eq!(snapshot.tick, 1);
        assert_eq!(engine.snakes()[0].head(), initial_head.moved_by(0, -1));
        assert_eq!(snapshot.snake_cells(0), 2);
        assert_eq!(snapshot.cell(initial_head.moved_by(0, 1)), Some(Cell::Empty));
    }

    #[test]
    fn test_food_consumption() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 2);
        let mut engine = layout(10, 10, vec![snake], &[Position::new(6, 5)]);

        let snapshot = engine.tick();

        assert!(!snapshot.terminated());
        assert_eq!(engine.snakes()[0].len(), 3);
        assert_eq!(snapshot.cell(Position::new(6, 5)), Some(Cell::Snake(0)));
        assert_eq!(snapshot.cell(Position::new(4, 5)), Some(Cell::Snake(0)));
        assert_eq!(snapshot.food_count(), 1);
        assert_eq!(snapshot.snake_cells(0), 3);
    }

    #[test]
    fn test_wall_collision() {
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        let mut engine = layout(10, 10, vec![snake], &[]);

        let snapshot = engine.tick();

        assert!(snapshot.terminated());
        let outcome = engine.outcome().unwrap();
        assert_eq!(outcome.loser, 0);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.cause, DeathCause::Wall);
        assert_eq!(outcome.final_lengths, vec![3]);
    }

    #[test]
    fn test_self_collision() {
        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut engine = layout(10, 10, vec![snake], &[]);

        engine.request_direction_change(0, Direction::Down);
        engine.tick();
        engine.request_direction_change(0, Direction::Left);
        engine.tick();
        engine.request_direction_change(0, Direction::Up);
        let snapshot = engine.tick();

        assert!(snapshot.terminated());
        assert_eq!(
            engine.outcome().map(|o| o.cause),
            Some(DeathCause::SelfCollision)
        );
    }

    #[test]
    fn test_moving_into_own_tail_is_fatal() {
        // Square loop of length 4: head returns to where the tail is leaving
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        let mut engine = layout(10, 10, vec![snake], &[]);

        engine.request_direction_change(0, Direction::Down);
        engine.tick();
        engine.request_direction_change(0, Direction::Left);
        engine.tick();
        engine.request_direction_change(0, Direction::Up);
        let snapshot = engine.tick();

        assert_eq!(snapshot.loser(), Some(0));
    }

    #[test]
    fn test_two_player_winner() {
        let a = Snake::new(Position::new(1, 0), Direction::Up, 2);
        let b = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let mut engine = layout(10, 10, vec![a, b], &[]);

        let snapshot = engine.tick();

        let outcome = snapshot.outcome.unwrap();
        assert_eq!(outcome.loser, 0);
        assert_eq!(outcome.winner, Some(1));
        assert_eq!(outcome.winner_length, Some(3));
        assert_eq!(outcome.ticks, 1);
        // Snake 1 never moved on the fatal tick
        assert_eq!(engine.snakes()[1].head(), Position::new(5, 5));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = seeded(GameConfig::new(20, 20));
        engine.request_direction_change(0, Direction::Down);
        engine.tick();

        assert_eq!(engine.snakes()[0].direction(), Direction::Up);
    }

    #[test]
    fn test_inbox_is_drained_before_move() {
        let mut engine = seeded(GameConfig::new(20, 20));
        let sender = engine.inbox();
        let head = engine.snakes()[1].head();

        assert!(sender.post(1, Direction::Left));
        engine.tick();

        assert_eq!(engine.snakes()[1].head(), head.moved_by(-1, 0));
        assert_eq!(engine.snakes()[1].direction(), Direction::Left);
    }

    #[test]
    fn test_requests_after_termination_are_ignored() {
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 2);
        let mut engine = layout(10, 10, vec![snake], &[]);
        let sender = engine.inbox();
        engine.tick();

        engine.request_direction_change(0, Direction::Up);
        assert_eq!(engine.snakes()[0].pending_direction(), Direction::Left);
        assert!(!sender.post(0, Direction::Up));
    }

    #[test]
    fn test_unknown_snake_is_ignored() {
        let mut engine = seeded(GameConfig::new(20, 20));
        engine.request_direction_change(7, Direction::Left);
        assert!(!engine.inbox().post(7, Direction::Left));
        assert!(!engine.tick().terminated());
    }

    #[test]
    #[should_panic(expected = "terminated game")]
    fn test_tick_after_termination_panics() {
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 2);
        let mut engine = layout(10, 10, vec![snake], &[]);
        engine.tick();
        engine.tick();
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let config = GameConfig {
            seed: Some(1234),
            ..GameConfig::default()
        };
        let a = GameEngine::new(config.clone()).unwrap();
        let b = GameEngine::new(config).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
