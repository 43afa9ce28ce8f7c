//! Fixed-interval game loop without a terminal
//!
//! Useful for smoke tests and scripted play: input can still be fed through
//! [`HeadlessMode::inbox`] from another task. Each tick's board is logged at
//! trace level instead of drawn.

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::time::{Instant, interval_at};
use tracing::{info, trace};

use crate::game::{GameConfig, GameEngine, InboxSender, Outcome};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    GameOver,
    TickLimit,
    Interrupted,
}

/// Summary printed when a headless run ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlessReport {
    pub stop_reason: StopReason,
    pub ticks: u64,
    pub outcome: Option<Outcome>,
}

pub struct HeadlessMode {
    config: GameConfig,
    engine: GameEngine,
    max_ticks: Option<u64>,
}

impl HeadlessMode {
    pub fn new(config: GameConfig, max_ticks: Option<u64>) -> Result<Self> {
        let engine = GameEngine::new(config.clone()).context("Failed to start game")?;
        Ok(Self {
            config,
            engine,
            max_ticks,
        })
    }

    pub fn inbox(&self) -> InboxSender {
        self.engine.inbox()
    }

    /// Tick until the game ends, the tick limit is hit, or Ctrl+C
    pub async fn run(&mut self) -> Result<HeadlessReport> {
        let mut tick_timer = interval_at(
            Instant::now() + self.config.start_delay(),
            self.config.tick_interval(),
        );

        let stop_reason = loop {
            if self.max_ticks.is_some_and(|max| self.engine.tick_count() >= max) {
                break StopReason::TickLimit;
            }

            tokio::select! {
                _ = tick_timer.tick() => {
                    let snapshot = self.engine.tick();
                    trace!("tick {}\n{}", snapshot.tick, snapshot);
                    if snapshot.terminated() {
                        break StopReason::GameOver;
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    break StopReason::Interrupted;
                }
            }
        };

        let report = HeadlessReport {
            stop_reason,
            ticks: self.engine.tick_count(),
            outcome: self.engine.outcome().cloned(),
        };
        info!(stop_reason = ?report.stop_reason, ticks = report.ticks, "headless run finished");
        Ok(report)
    }
}
