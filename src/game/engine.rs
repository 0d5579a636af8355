use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tokio::sync::watch;

use crate::error::Result;

use super::{
    action::Direction,
    config::GameConfig,
    state::{Cell, GameSnapshot, GameState, Snake},
};

/// Step the head one cell and drop the tail; length is preserved
pub fn move_snake(snake: &Snake, direction: Direction, grid_size: usize) -> Snake {
    let new_head = snake.head().stepped(direction, grid_size);
    debug_assert!(new_head.is_within(grid_size));
    let mut body = Vec::with_capacity(snake.len());
    body.push(new_head);
    body.extend_from_slice(&snake.body[..snake.len() - 1]);
    Snake { body }
}

/// Prepend the cell beyond the head without dropping the tail
pub fn grow_snake(snake: &Snake, direction: Direction, grid_size: usize) -> Snake {
    let growth = snake.head().stepped(direction, grid_size);
    debug_assert!(growth.is_within(grid_size));
    let mut body = Vec::with_capacity(snake.len() + 1);
    body.push(growth);
    body.extend_from_slice(&snake.body);
    Snake { body }
}

/// Pick a cell not covered by the snake, uniformly at random.
///
/// Panics if the snake covers the whole grid; callers end the game before
/// that can happen.
pub fn generate_food<R: Rng>(snake: &Snake, grid_size: usize, rng: &mut R) -> Cell {
    let n = grid_size as i32;
    let empty_cells: Vec<Cell> = (0..n)
        .flat_map(|x| (0..n).map(move |y| Cell::new(x, y)))
        .filter(|cell| !snake.contains(*cell))
        .collect();

    assert!(
        !empty_cells.is_empty(),
        "no free cell left for food on a {grid_size}x{grid_size} grid"
    );
    empty_cells[rng.gen_range(0..empty_cells.len())]
}

/// True when the head runs into the rest of the body
pub fn check_game_over(snake: &Snake) -> bool {
    snake.tail_segments().contains(&snake.head())
}

fn assert_playable_grid(grid_size: usize) {
    assert!(
        grid_size >= 2 && i32::try_from(grid_size).is_ok(),
        "grid size {grid_size} is not playable"
    );
}

/// What a single poll of the engine did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not enough time has passed since the last move, or the game is over
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the food and grew
    Ate,
    /// The move ended the game
    GameOver,
}

/// The game engine that owns the state and applies every transition
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
    updates: watch::Sender<GameSnapshot>,
}

impl GameEngine {
    /// Create a new game engine at epoch 0, rejecting an invalid config
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_rng(config, StdRng::from_entropy()))
    }

    /// Create an engine with a fixed random source, for reproducible food.
    ///
    /// # Panics
    ///
    /// Panics if the grid is smaller than 2x2; see [`GameConfig::validate`].
    pub fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        assert_playable_grid(config.grid_size);
        let grid_size = config.grid_size;
        let food = generate_food(&Snake::new(Cell::ORIGIN), grid_size, &mut rng);
        Self::from_state(config, GameState::new(food, grid_size, 0), rng)
    }

    /// Resume from an existing state.
    ///
    /// # Panics
    ///
    /// Panics if the state's grid is smaller than 2x2.
    pub fn from_state(config: GameConfig, state: GameState, rng: StdRng) -> Self {
        assert_playable_grid(state.grid_size);
        let (updates, _) = watch::channel(state.snapshot());

        Self {
            config,
            state,
            rng,
            updates,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.state.epoch
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.updates.subscribe()
    }

    /// Queue a heading change for the next move.
    ///
    /// Rejected when it reverses the heading of the last move or the game
    /// is over. A later accepted request replaces an earlier pending one.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.state.is_game_over || self.state.heading.is_opposite(direction) {
            return false;
        }
        let changed = self.state.effective_heading() != direction;
        self.state.pending_heading = Some(direction);
        if changed {
            self.publish();
        }
        true
    }

    /// Poll the engine at `now`; moves at most once per move interval
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.state.is_game_over {
            return TickOutcome::Idle;
        }

        let due = match self.state.last_move {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.config.move_interval(),
        };
        if !due {
            return TickOutcome::Idle;
        }

        let grid_size = self.state.grid_size;
        let heading = self.state.effective_heading();
        self.state.pending_heading = None;
        self.state.heading = heading;
        self.state.snake = move_snake(&self.state.snake, heading, grid_size);
        self.state.last_move = Some(now);
        self.state.moves += 1;

        let ate = self.state.snake.head() == self.state.food;
        if ate {
            self.state.snake = grow_snake(&self.state.snake, heading, grid_size);
            self.state.score += 1;
        }

        let board_full = self.state.snake.len() >= grid_size * grid_size;
        let outcome = if check_game_over(&self.state.snake) || board_full {
            self.state.is_game_over = true;
            TickOutcome::GameOver
        } else if ate {
            self.state.food = generate_food(&self.state.snake, grid_size, &mut self.rng);
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        };

        self.publish();
        outcome
    }

    /// Reinitialize the game and advance the epoch, returning the new epoch
    pub fn restart(&mut self) -> u64 {
        let epoch = self.state.epoch + 1;
        let grid_size = self.config.grid_size;
        let food = generate_food(&Snake::new(Cell::ORIGIN), grid_size, &mut self.rng);
        self.state = GameState::new(food, grid_size, epoch);
        self.publish();
        epoch
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.snapshot());
    }
}
