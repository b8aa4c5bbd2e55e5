//! Local input: line scanning, multi-key gestures, long presses and the
//! Wired Mode combo.

pub mod gesture;
pub mod scanner;
pub mod wired_mode;

pub use gesture::{Gesture, GestureDetector, LongPress};
pub use scanner::{KeyEvent, KeyScanner};
pub use wired_mode::WiredModeDetector;
