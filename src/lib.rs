//! Watch Snake - single-player Snake for small square displays
//!
//! This library provides:
//! - Core game logic (game module)
//! - Epoch-keyed timer loop and session (runtime module)
//! - Swipe classification and line input (input module)
//! - In-memory session statistics (metrics module)
//! - A line-driven play mode (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod runtime;
