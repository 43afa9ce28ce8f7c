//! Snake Duel - a tick-driven grid snake game for one or more players
//!
//! This library provides:
//! - Core simulation (game module): snakes, board, per-tick resolution, snapshots
//! - Key translation (input module)
//! - TUI rendering of snapshots (render module)
//! - Session statistics (metrics module)
//! - Execution modes (human, headless)
//!
//! The `game` module has no I/O and can be driven directly:
//!
//! ```rust
//! use snake_duel::game::{Direction, GameConfig, GameEngine};
//!
//! let mut engine = GameEngine::new(GameConfig::default())?;
//! engine.request_direction_change(0, Direction::Left);
//! let snapshot = engine.tick();
//! assert_eq!(snapshot.tick, 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
