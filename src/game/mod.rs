//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The runtime drives it with a clock; the input layer feeds it directions.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome, check_game_over, generate_food, grow_snake, move_snake};
pub use state::{Cell, GameSnapshot, GameState, Phase, Snake};
