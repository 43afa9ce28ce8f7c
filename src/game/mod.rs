//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It can be driven by the terminal modes or directly from tests.

pub mod board;
pub mod config;
pub mod direction;
pub mod engine;
pub mod inbox;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use board::{Board, Cell};
pub use config::{GameConfig, MAX_PLAYERS};
pub use direction::Direction;
pub use engine::GameEngine;
pub use inbox::{Inbox, InboxSender};
pub use snapshot::{DeathCause, Outcome, Snapshot};
pub use state::{Position, Snake};
