pub mod handler;

pub use handler::{CONTROL_LABELS, InputHandler, KeyAction};
