use std::time::{Duration, Instant};

use crate::game::Outcome;

/// Session statistics shown alongside the board
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    /// Games won, by player index
    pub wins: Vec<u32>,
    /// Longest final snake across all games
    pub best_length: usize,
}

impl GameMetrics {
    pub fn new(players: usize) -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            wins: vec![0; players],
            best_length: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, outcome: &Outcome) {
        self.games_played += 1;
        if let Some(count) = outcome.winner.and_then(|w| self.wins.get_mut(w)) {
            *count += 1;
        }
        let longest = outcome.final_lengths.iter().copied().max().unwrap_or(0);
        self.best_length = self.best_length.max(longest);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new(1)
    }
}
