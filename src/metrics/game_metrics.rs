use std::time::Duration;
use tokio::time::Instant;

use crate::game::GameSnapshot;

/// Outcome of one finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub epoch: u64,
    pub score: u32,
    pub length: usize,
    pub moves: u32,
    pub duration: Duration,
}

/// In-process statistics for the current run; nothing is persisted
#[derive(Debug, Clone)]
pub struct GameMetrics {
    started_at: Instant,
    results: Vec<GameResult>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            results: Vec::new(),
        }
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Instant::now();
    }

    /// Record a finished game once; a repeated epoch is ignored
    pub fn on_game_over(&mut self, snapshot: &GameSnapshot) -> Option<&GameResult> {
        if self.is_recorded(snapshot.epoch) {
            return None;
        }
        self.results.push(GameResult {
            epoch: snapshot.epoch,
            score: snapshot.score,
            length: snapshot.snake.len(),
            moves: snapshot.moves,
            duration: self.started_at.elapsed(),
        });
        self.results.last()
    }

    pub fn is_recorded(&self, epoch: u64) -> bool {
        self.results.iter().any(|result| result.epoch == epoch)
    }

    pub fn games_played(&self) -> usize {
        self.results.len()
    }

    pub fn best_score(&self) -> u32 {
        self.results.iter().map(|result| result.score).max().unwrap_or(0)
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.results.last()
    }

    /// Time spent in the game currently being played
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as `MM:SS`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
