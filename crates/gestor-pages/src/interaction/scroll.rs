//! Scroll tracking for the compact topbar.
//!
//! The browser glue throttles `scroll` events to one call per animation
//! frame; [`ScrollObserver::on_scroll`] itself is cheap and only publishes
//! when compactness changes.

use std::rc::Rc;

use gestor_core::{StateManager, Viewport};

/// Reports the viewport scroll offset to the State Manager.
#[derive(Clone)]
pub struct ScrollObserver {
	state: StateManager,
	viewport: Rc<dyn Viewport>,
}

impl std::fmt::Debug for ScrollObserver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ScrollObserver")
			.field("scroll_y", &self.viewport.scroll_y())
			.finish()
	}
}

impl ScrollObserver {
	/// Creates the observer.
	pub fn new(state: StateManager, viewport: Rc<dyn Viewport>) -> Self {
		Self { state, viewport }
	}

	/// Reads the current offset and updates the topbar state.
	pub fn on_scroll(&self) {
		self.state.update_scroll(self.viewport.scroll_y());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MemoryPlatform;
	use rstest::rstest;

	#[rstest]
	fn test_threshold_toggles_compact() {
		let platform = MemoryPlatform::desktop();
		let app = platform.app_context();
		let observer = ScrollObserver::new(app.state().clone(), app.viewport().clone());

		platform.viewport.set_scroll_y(40.0);
		observer.on_scroll();
		assert!(!app.state().snapshot().top_bar.is_compact);

		platform.viewport.set_scroll_y(250.0);
		observer.on_scroll();
		let top_bar = app.state().snapshot().top_bar;
		assert!(top_bar.is_compact);
		assert_eq!(top_bar.scroll_y, 250.0);
	}
}
