pub mod gesture;
pub mod handler;

pub use gesture::{DragTracker, classify_drag};
pub use handler::{Command, InputHandler};
