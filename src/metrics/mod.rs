pub mod game_metrics;

pub use game_metrics::{GameMetrics, GameResult, format_duration};
