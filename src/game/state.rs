use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Step one cell in a direction, wrapping around the edges of a square grid
    pub fn stepped(&self, direction: Direction, grid_size: usize) -> Self {
        let n = grid_size as i32;
        let (dx, dy) = direction.delta();
        Self {
            x: (self.x + dx + n).rem_euclid(n),
            y: (self.y + dy + n).rem_euclid(n),
        }
    }

    pub fn is_within(&self, grid_size: usize) -> bool {
        let n = grid_size as i32;
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }
}

/// The snake body, head at index 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub body: Vec<Cell>,
}

impl Snake {
    /// A one-cell snake
    pub fn new(head: Cell) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from its cells, head first
    pub fn from_cells(body: Vec<Cell>) -> Self {
        assert!(!body.is_empty(), "a snake has at least one cell");
        Self { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Body segments excluding the head
    pub fn tail_segments(&self) -> &[Cell] {
        &self.body[1..]
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a snake built through the constructors
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Phase of a single play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    GameOver,
}

/// Complete mutable game state owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Cell,
    pub grid_size: usize,
    /// Heading used by the most recent move
    pub heading: Direction,
    /// Latest accepted direction request, applied on the next move
    pub pending_heading: Option<Direction>,
    pub is_game_over: bool,
    pub last_move: Option<Instant>,
    pub epoch: u64,
    pub score: u32,
    pub moves: u32,
}

impl GameState {
    /// Fresh state for the given epoch: one-cell snake at the origin heading right
    pub fn new(food: Cell, grid_size: usize, epoch: u64) -> Self {
        Self {
            snake: Snake::new(Cell::ORIGIN),
            food,
            grid_size,
            heading: Direction::Right,
            pending_heading: None,
            is_game_over: false,
            last_move: None,
            epoch,
            score: 0,
            moves: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_game_over {
            Phase::GameOver
        } else {
            Phase::Running
        }
    }

    /// The heading the next move will use
    pub fn effective_heading(&self) -> Direction {
        self.pending_heading.unwrap_or(self.heading)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.body.clone(),
            food: self.food,
            grid_size: self.grid_size,
            heading: self.effective_heading(),
            phase: self.phase(),
            epoch: self.epoch,
            score: self.score,
            moves: self.moves,
        }
    }
}

/// Read-only view published to renderers after every state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub grid_size: usize,
    pub heading: Direction,
    pub phase: Phase,
    pub epoch: u64,
    pub score: u32,
    pub moves: u32,
}

impl GameSnapshot {
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_stepping() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.stepped(Direction::Right, 16), Cell::new(6, 5));
        assert_eq!(cell.stepped(Direction::Left, 16), Cell::new(4, 5));
        assert_eq!(cell.stepped(Direction::Down, 16), Cell::new(5, 6));
        assert_eq!(cell.stepped(Direction::Up, 16), Cell::new(5, 4));
    }

    #[test]
    fn test_cell_wraps_at_edges() {
        assert_eq!(Cell::new(15, 3).stepped(Direction::Right, 16), Cell::new(0, 3));
        assert_eq!(Cell::new(0, 3).stepped(Direction::Left, 16), Cell::new(15, 3));
        assert_eq!(Cell::new(3, 0).stepped(Direction::Up, 16), Cell::new(3, 15));
        assert_eq!(Cell::new(3, 15).stepped(Direction::Down, 16), Cell::new(3, 0));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(Cell::new(0, 0).is_within(16));
        assert!(Cell::new(15, 15).is_within(16));
        assert!(!Cell::new(-1, 0).is_within(16));
        assert!(!Cell::new(16, 0).is_within(16));
        assert!(!Cell::new(0, 16).is_within(16));
    }

    #[test]
    fn test_snake_accessors() {
        let snake = Snake::from_cells(vec![Cell::new(2, 2), Cell::new(1, 2), Cell::new(0, 2)]);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(2, 2));
        assert_eq!(snake.tail_segments(), &[Cell::new(1, 2), Cell::new(0, 2)]);
        assert!(snake.contains(Cell::new(0, 2)));
        assert!(!snake.contains(Cell::new(3, 2)));
    }

    #[test]
    #[should_panic]
    fn test_empty_snake_rejected() {
        Snake::from_cells(Vec::new());
    }

    #[test]
    fn test_new_state_and_snapshot() {
        let mut state = GameState::new(Cell::new(4, 4), 16, 3);
        assert_eq!(state.snake.body, vec![Cell::ORIGIN]);
        assert_eq!(state.phase(), Phase::Running);

        state.pending_heading = Some(Direction::Down);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.heading, Direction::Down);
        assert_eq!(snapshot.epoch, 3);
        assert_eq!(snapshot.food, Cell::new(4, 4));
        assert!(!snapshot.is_game_over());
    }
}
