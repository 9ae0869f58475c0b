//! Global keyboard shortcuts.
//!
//! | Keys | Effect |
//! |------|--------|
//! | `Escape` | closes the topmost overlay: search, then form panel, then mobile sidebar |
//! | `Ctrl`/`Cmd` + `K` | opens the search modal |
//! | `Ctrl`/`Cmd` + `B` | toggles the sidebar (desktop only) |
//!
//! Pages that show their own modal above the chrome must intercept
//! `Escape` before it reaches the document.

use gestor_core::StateManager;

/// A key press, as far as the shortcuts care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
	/// `KeyboardEvent.key`.
	pub key: String,
	/// Control held.
	pub ctrl: bool,
	/// Meta (Cmd) held.
	pub meta: bool,
}

impl KeyPress {
	/// A key without modifiers.
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			ctrl: false,
			meta: false,
		}
	}

	/// The same key with Control held.
	pub fn with_ctrl(mut self) -> Self {
		self.ctrl = true;
		self
	}

	/// The same key with Meta held.
	pub fn with_meta(mut self) -> Self {
		self.meta = true;
		self
	}

	fn command(&self, letter: &str) -> bool {
		(self.ctrl || self.meta) && self.key.eq_ignore_ascii_case(letter)
	}
}

/// Maps key presses to State Manager calls.
#[derive(Debug, Clone)]
pub struct KeyboardShortcuts {
	state: StateManager,
}

impl KeyboardShortcuts {
	/// Creates the handler.
	pub fn new(state: StateManager) -> Self {
		Self { state }
	}

	/// Handles `key`. Returns true when the browser default must be
	/// prevented.
	pub fn handle(&self, key: &KeyPress) -> bool {
		if key.key == "Escape" {
			return self.escape();
		}
		if key.command("k") {
			self.state.open_search();
			return true;
		}
		if key.command("b") {
			if !self.state.is_mobile() {
				self.state.toggle_sidebar();
			}
			return true;
		}
		false
	}

	fn escape(&self) -> bool {
		let layout = self.state.snapshot();
		if layout.search.is_open {
			self.state.close_search();
			return true;
		}
		if layout.form_sidebar.is_open {
			self.state.close_form_sidebar();
			return true;
		}
		if self.state.is_mobile() && layout.sidebar.is_open {
			self.state.close_sidebar();
			return true;
		}
		false
	}
}
