//! Swipe gesture classification.
//!
//! Drag vectors use display coordinates: x grows to the right, y grows
//! downward.

use crate::game::Direction;

/// Classify a drag vector by its dominant axis and sign.
///
/// Returns `None` for a zero vector. Ties between the axes count as vertical.
pub fn classify_drag(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Some(Direction::Right)
        } else if dx < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else if dy < 0.0 {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Follows one drag gesture from its deltas to a final direction
#[derive(Debug, Default)]
pub struct DragTracker {
    last: Option<Direction>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one drag delta; the latest classifiable delta wins
    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        if let Some(direction) = classify_drag(dx, dy) {
            self.last = Some(direction);
        }
    }

    /// End the gesture, yielding its direction and resetting the tracker
    pub fn finish(&mut self) -> Option<Direction> {
        self.last.take()
    }
}
