//! Timer loop and session plumbing around the game engine

pub mod game_loop;
pub mod session;

pub use game_loop::{LoopExit, SharedEngine, run_game_loop};
pub use session::GameSession;
