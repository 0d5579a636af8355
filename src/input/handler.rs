use crate::game::Direction;

use super::gesture::DragTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Restart,
    Quit,
    None,
}

/// Turns driver input lines into game commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_line(&self, line: &str) -> Command {
        let lowered = line.trim().to_ascii_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        match words.as_slice() {
            // Movement - names and WASD
            ["up"] | ["w"] => Command::Turn(Direction::Up),
            ["down"] | ["s"] => Command::Turn(Direction::Down),
            ["left"] | ["a"] => Command::Turn(Direction::Left),
            ["right"] | ["d"] => Command::Turn(Direction::Right),

            // Movement - drag deltas, one or more `dx dy` pairs
            ["swipe", deltas @ ..] => Self::swipe(deltas),
            [_, _] => Self::swipe(&words),

            // Controls
            ["q"] | ["quit"] | ["exit"] => Command::Quit,
            ["r"] | ["restart"] => Command::Restart,

            _ => Command::None,
        }
    }

    fn swipe(deltas: &[&str]) -> Command {
        if deltas.is_empty() || deltas.len() % 2 != 0 {
            return Command::None;
        }
        let values: Option<Vec<f32>> = deltas
            .iter()
            .map(|word| word.parse::<f32>().ok().filter(|value| value.is_finite()))
            .collect();
        let Some(values) = values else {
            return Command::None;
        };

        let mut tracker = DragTracker::new();
        for pair in values.chunks_exact(2) {
            tracker.on_drag(pair[0], pair[1]);
        }
        tracker.finish().map_or(Command::None, Command::Turn)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
