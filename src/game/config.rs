use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

/// Most snakes the symmetric start layout and the controls support
pub const MAX_PLAYERS: usize = 4;

/// Largest accepted board side, in cells
pub const MAX_BOARD_SIDE: usize = 4096;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid, in cells
    pub board_width: usize,
    /// Height of the game grid, in cells
    pub board_height: usize,
    /// Number of snakes
    pub players: usize,
    /// Food items kept on the board
    pub food_count: usize,
    /// Time between ticks
    pub tick_interval_ms: u64,
    /// Pause before the first tick
    pub start_delay_ms: u64,
    /// Seed for food placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 32,
            board_height: 32,
            players: 2,
            food_count: 2,
            tick_interval_ms: 50,
            start_delay_ms: 1000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            board_width: width,
            board_height: height,
            ..Default::default()
        }
    }

    /// One snake on the default board
    pub fn single_player() -> Self {
        Self {
            players: 1,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Check that the symmetric start layout and the food fit on the board
    pub fn validate(&self) -> Result<()> {
        if self.players == 0 || self.players > MAX_PLAYERS {
            bail!(
                "players must be between 1 and {}, got {}",
                MAX_PLAYERS,
                self.players
            );
        }
        ensure!(
            self.board_width <= MAX_BOARD_SIDE && self.board_height <= MAX_BOARD_SIDE,
            "board {}x{} exceeds the {} cell limit",
            self.board_width,
            self.board_height,
            MAX_BOARD_SIDE
        );
        ensure!(
            self.board_width >= 2 * self.players.max(2),
            "board width {} is too narrow for {} players",
            self.board_width,
            self.players
        );
        ensure!(
            self.board_height >= 3,
            "board height {} is too short, need at least 3",
            self.board_height
        );
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");

        let free = self.board_width * self.board_height - 2 * self.players;
        ensure!(
            self.food_count <= free,
            "{} food items do not fit in {} free cells",
            self.food_count,
            free
        );
        Ok(())
    }
}
