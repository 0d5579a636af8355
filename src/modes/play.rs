use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::game::{GameConfig, GameSnapshot};
use crate::input::{Command, InputHandler};
use crate::metrics::{GameMetrics, format_duration};
use crate::runtime::GameSession;

/// Plays one session from line-based input, logging every state change
pub struct PlayMode {
    session: GameSession,
    metrics: GameMetrics,
    input_handler: InputHandler,
    max_games: u32,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, max_games: u32) -> Result<Self> {
        let session = GameSession::new(config).context("Failed to create game session")?;
        Ok(Self::with_session(session, max_games))
    }

    pub fn with_session(session: GameSession, max_games: u32) -> Self {
        Self {
            session,
            metrics: GameMetrics::new(),
            input_handler: InputHandler::new(),
            max_games,
            should_quit: false,
        }
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    /// Play with commands read from stdin
    pub async fn run(&mut self) -> Result<()> {
        self.run_with_input(BufReader::new(tokio::io::stdin())).await
    }

    pub async fn run_with_input<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut updates = self.session.subscribe();

        self.session.start().await;
        self.metrics.on_game_start();
        info!(
            grid = updates.borrow().grid_size,
            "game started; steer with w/a/s/d or 'swipe <dx> <dy>', 'r' restarts, 'q' quits"
        );

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line.context("Failed to read input")? {
                        Some(line) => self.handle_line(&line).await,
                        None => {
                            debug!("input closed");
                            self.should_quit = true;
                        }
                    }
                }

                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = updates.borrow_and_update().clone();
                    self.on_snapshot(&snapshot);
                }

                _ = &mut ctrl_c => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.session.shutdown();
        info!(
            games = self.metrics.games_played(),
            best = self.metrics.best_score(),
            "session finished"
        );
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) {
        match self.input_handler.handle_line(line) {
            Command::Turn(direction) => {
                if !self.session.request_direction(direction).await {
                    debug!(?direction, "turn rejected");
                }
            }
            Command::Restart => {
                let snapshot = self.session.snapshot();
                if snapshot.is_game_over() {
                    // The game-over update may still be queued behind this line
                    self.record_game_over(&snapshot);
                    self.session.restart().await;
                    self.metrics.on_game_start();
                } else {
                    debug!("restart ignored while the game is running");
                }
            }
            Command::Quit => {
                self.should_quit = true;
            }
            Command::None => {
                if !line.trim().is_empty() {
                    warn!(input = line.trim(), "unrecognized input");
                }
            }
        }
    }

    fn on_snapshot(&mut self, snapshot: &GameSnapshot) {
        debug!(
            epoch = snapshot.epoch,
            head = ?snapshot.snake[0],
            length = snapshot.snake.len(),
            food = ?snapshot.food,
            heading = ?snapshot.heading,
            "state changed"
        );

        if snapshot.is_game_over() {
            self.record_game_over(snapshot);
        }
    }

    fn record_game_over(&mut self, snapshot: &GameSnapshot) {
        let Some(result) = self.metrics.on_game_over(snapshot).cloned() else {
            return;
        };
        info!(
            epoch = result.epoch,
            score = result.score,
            length = result.length,
            time = %format_duration(result.duration),
            best = self.metrics.best_score(),
            "game over; send 'r' to restart"
        );

        if self.max_games > 0 && self.metrics.games_played() >= self.max_games as usize {
            self.should_quit = true;
        }
    }
}
