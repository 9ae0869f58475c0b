//! Input handling around the chrome: UI actions, keyboard shortcuts,
//! touch gestures and scroll tracking.
//!
//! Each handler is plain Rust over the State Manager; the browser glue only
//! converts DOM events into calls on them.

mod actions;
mod gestures;
mod keyboard;
mod scroll;

pub use actions::UiAction;
pub use gestures::{Swipe, SwipeDetector, TouchGestures};
pub use keyboard::{KeyPress, KeyboardShortcuts};
pub use scroll::ScrollObserver;
