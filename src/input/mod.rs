pub mod handler;

pub use handler::{ControllerButton, InputHandler, InputSource, KeyAction};
