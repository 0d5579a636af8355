use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::game::{GameEngine, TickOutcome};

pub type SharedEngine = Arc<Mutex<GameEngine>>;

/// Why a game loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    GameOver,
    /// The engine moved on to a newer epoch
    Superseded,
}

/// Poll the engine every `poll_interval` until its game ends or a restart
/// moves it past `epoch`.
///
/// The engine decides when a poll turns into a move, so a fast poll only
/// affects input latency, never snake speed.
pub async fn run_game_loop(engine: SharedEngine, epoch: u64, poll_interval: Duration) -> LoopExit {
    let mut poll_timer = interval(poll_interval);
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        poll_timer.tick().await;

        let mut engine = engine.lock().await;
        if engine.epoch() != epoch {
            debug!(epoch, current = engine.epoch(), "game loop superseded");
            return LoopExit::Superseded;
        }

        match engine.tick(Instant::now().into_std()) {
            TickOutcome::Idle => {}
            TickOutcome::Moved => {
                trace!(epoch, head = ?engine.state().snake.head(), "snake moved");
            }
            TickOutcome::Ate => {
                let state = engine.state();
                debug!(epoch, score = state.score, food = ?state.food, "snake ate");
            }
            TickOutcome::GameOver => {
                let state = engine.state();
                info!(epoch, score = state.score, moves = state.moves, "game over");
                return LoopExit::GameOver;
            }
        }

        if engine.is_game_over() {
            return LoopExit::GameOver;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction, GameConfig, GameState, Snake};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn shared(engine: GameEngine) -> SharedEngine {
        Arc::new(Mutex::new(engine))
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_moves_once_per_move_interval() {
        let config = GameConfig::default();
        let mut state = GameState::new(Cell::new(9, 9), config.grid_size, 0);
        state.snake = Snake::new(Cell::new(0, 4));
        let engine = shared(GameEngine::from_state(config, state, StdRng::seed_from_u64(3)));

        let handle = tokio::spawn(run_game_loop(engine.clone(), 0, Duration::from_millis(50)));
        tokio::time::sleep(Duration::from_millis(620)).await;

        {
            let engine = engine.lock().await;
            assert_eq!(engine.state().moves, 3);
            assert_eq!(engine.state().snake.head(), Cell::new(3, 4));
        }
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_on_game_over() {
        let config = GameConfig::default();
        let mut state = GameState::new(Cell::new(9, 9), config.grid_size, 0);
        state.snake = Snake::from_cells(vec![
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(6, 6),
            Cell::new(6, 5),
            Cell::new(6, 4),
        ]);
        state.heading = Direction::Up;
        state.pending_heading = Some(Direction::Right);
        let engine = shared(GameEngine::from_state(config, state, StdRng::seed_from_u64(3)));

        let exit = run_game_loop(engine.clone(), 0, Duration::from_millis(50)).await;

        assert_eq!(exit, LoopExit::GameOver);
        assert!(engine.lock().await.is_game_over());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_loop_stops_after_restart() {
        let engine = shared(GameEngine::with_rng(
            GameConfig::default(),
            StdRng::seed_from_u64(3),
        ));

        let handle = tokio::spawn(run_game_loop(engine.clone(), 0, Duration::from_millis(50)));
        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.lock().await.restart();

        assert_eq!(handle.await.unwrap(), LoopExit::Superseded);
        let engine = engine.lock().await;
        assert_eq!(engine.epoch(), 1);
        assert_eq!(engine.state().moves, 0);
    }
}
