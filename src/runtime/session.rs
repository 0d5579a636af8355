use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::game_loop::{LoopExit, SharedEngine, run_game_loop};
use crate::error::Result;
use crate::game::{Direction, GameConfig, GameEngine, GameSnapshot};

/// One player's game: the shared engine plus the single loop driving it
pub struct GameSession {
    engine: SharedEngine,
    updates: watch::Receiver<GameSnapshot>,
    poll_interval: Duration,
    loop_handle: Option<JoinHandle<LoopExit>>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(Self::with_engine(GameEngine::new(config)?))
    }

    pub fn with_engine(engine: GameEngine) -> Self {
        let updates = engine.subscribe();
        let poll_interval = engine.config().poll_interval();

        Self {
            engine: Arc::new(Mutex::new(engine)),
            updates,
            poll_interval,
            loop_handle: None,
        }
    }

    /// Spawn the game loop for the current epoch, replacing any running one
    pub async fn start(&mut self) {
        let epoch = self.engine.lock().await.epoch();
        self.spawn_loop(epoch);
    }

    /// Reset the game under a new epoch and hand it a fresh loop
    pub async fn restart(&mut self) -> u64 {
        let epoch = self.engine.lock().await.restart();
        info!(epoch, "game restarted");
        self.spawn_loop(epoch);
        epoch
    }

    pub async fn request_direction(&self, direction: Direction) -> bool {
        let accepted = self.engine.lock().await.request_direction(direction);
        debug!(?direction, accepted, "direction requested");
        accepted
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.updates.clone()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.updates.borrow().clone()
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.loop_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            handle.abort();
        }
    }

    fn spawn_loop(&mut self, epoch: u64) {
        self.shutdown();
        debug!(epoch, poll_ms = self.poll_interval.as_millis() as u64, "starting game loop");
        self.loop_handle = Some(tokio::spawn(run_game_loop(
            self.engine.clone(),
            epoch,
            self.poll_interval,
        )));
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
