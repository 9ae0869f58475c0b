//! Horizontal swipes on touch devices.

use std::cell::Cell;

use gestor_core::{StateManager, debug_log};

/// Direction of a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
	/// Finger moved right.
	Right,
	/// Finger moved left.
	Left,
}

/// Turns touch start/end positions into swipes.
#[derive(Debug)]
pub struct SwipeDetector {
	min_distance: f64,
	start_x: Cell<Option<f64>>,
}

impl SwipeDetector {
	/// Creates a detector ignoring moves shorter than `min_distance` pixels.
	pub fn new(min_distance: f64) -> Self {
		Self {
			min_distance,
			start_x: Cell::new(None),
		}
	}

	/// Records where a touch started.
	pub fn touch_start(&self, x: f64) {
		self.start_x.set(Some(x));
	}

	/// Finishes a touch. Returns the swipe, if the move was long enough.
	pub fn touch_end(&self, x: f64) -> Option<Swipe> {
		let distance = x - self.start_x.take()?;
		if distance.abs() < self.min_distance {
			return None;
		}
		Some(if distance > 0.0 { Swipe::Right } else { Swipe::Left })
	}
}

/// Opens the sidebar on a right swipe and closes it on a left swipe.
#[derive(Debug)]
pub struct TouchGestures {
	state: StateManager,
	detector: SwipeDetector,
}

impl TouchGestures {
	/// Creates the handler with the configured swipe distance.
	pub fn new(state: StateManager) -> Self {
		let min_distance = state.settings().gestures.min_swipe_distance;
		Self {
			state,
			detector: SwipeDetector::new(min_distance),
		}
	}

	/// `touchstart` at `x`.
	pub fn touch_start(&self, x: f64) {
		self.detector.touch_start(x);
	}

	/// `touchend` at `x`. Returns the swipe that was acted on.
	pub fn touch_end(&self, x: f64) -> Option<Swipe> {
		let swipe = self.detector.touch_end(x)?;
		debug_log!("Swipe {:?}", swipe);
		match swipe {
			Swipe::Right => self.state.open_sidebar(),
			Swipe::Left => self.state.close_sidebar(),
		}
		Some(swipe)
	}
}
