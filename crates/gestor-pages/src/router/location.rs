//! The URL fragment.
//!
//! The router reads the fragment and [`navigate_to`](super::Router::navigate_to)
//! writes it; nothing else happens on a write. The host is expected to call
//! [`Router::handle_location_change`](super::Router::handle_location_change)
//! whenever the fragment changes (the browser fires `hashchange`;
//! [`MemoryLocation`] counts pending changes instead).

use std::cell::{Cell, RefCell};

/// Access to the URL fragment.
pub trait Location {
	/// Current fragment without the leading `#`.
	fn fragment(&self) -> String;

	/// Sets the fragment. A leading `#` in `path` is ignored.
	fn set_fragment(&self, path: &str);
}

/// In-memory [`Location`].
///
/// Each write that actually changes the fragment counts as one pending
/// change signal, mirroring the browser, which fires no `hashchange` for
/// an unchanged hash.
#[derive(Debug, Default)]
pub struct MemoryLocation {
	fragment: RefCell<String>,
	pending: Cell<usize>,
	history: RefCell<Vec<String>>,
}

impl MemoryLocation {
	/// Creates a location showing `initial`, with no pending change.
	pub fn new(initial: &str) -> Self {
		let initial = initial.trim_start_matches('#').to_string();
		Self {
			history: RefCell::new(vec![initial.clone()]),
			fragment: RefCell::new(initial),
			pending: Cell::new(0),
		}
	}

	/// Returns and resets the number of unhandled change signals.
	pub fn take_pending(&self) -> usize {
		self.pending.replace(0)
	}

	/// Every fragment shown so far, oldest first.
	pub fn history(&self) -> Vec<String> {
		self.history.borrow().clone()
	}
}

impl Location for MemoryLocation {
	fn fragment(&self) -> String {
		self.fragment.borrow().clone()
	}

	fn set_fragment(&self, path: &str) {
		let path = path.trim_start_matches('#');
		if *self.fragment.borrow() == path {
			return;
		}
		*self.fragment.borrow_mut() = path.to_string();
		self.history.borrow_mut().push(path.to_string());
		self.pending.set(self.pending.get() + 1);
	}
}

/// `window.location.hash`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct HashLocation;

#[cfg(target_arch = "wasm32")]
impl HashLocation {
	/// Creates a handle to the current window location.
	pub fn new() -> Self {
		Self
	}
}

#[cfg(target_arch = "wasm32")]
impl Location for HashLocation {
	fn fragment(&self) -> String {
		web_sys::window()
			.and_then(|w| w.location().hash().ok())
			.map(|hash| hash.trim_start_matches('#').to_string())
			.unwrap_or_default()
	}

	fn set_fragment(&self, path: &str) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let hash = format!("#{}", path.trim_start_matches('#'));
		if let Err(e) = window.location().set_hash(&hash) {
			gestor_core::error_log!("Could not set location hash: {:?}", e);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_set_fragment_counts_changes_only() {
		let location = MemoryLocation::new("#/dashboard");
		assert_eq!(location.fragment(), "/dashboard");

		location.set_fragment("/dashboard");
		assert_eq!(location.take_pending(), 0);

		location.set_fragment("#/clientes");
		location.set_fragment("/trabajos/7");
		assert_eq!(location.fragment(), "/trabajos/7");
		assert_eq!(location.take_pending(), 2);
		assert_eq!(location.take_pending(), 0);
		assert_eq!(
			location.history(),
			vec!["/dashboard", "/clientes", "/trabajos/7"]
		);
	}
}
