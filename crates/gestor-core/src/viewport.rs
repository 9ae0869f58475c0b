//! Viewport geometry and device capabilities.

use std::cell::Cell;

/// Read access to the browser viewport.
pub trait Viewport {
	/// Inner width in CSS pixels.
	fn width(&self) -> u32;

	/// Vertical scroll offset in CSS pixels.
	fn scroll_y(&self) -> f64;

	/// Whether the device reports touch support.
	fn supports_touch(&self) -> bool;
}

/// Settable [`Viewport`] for tests and headless hosts.
#[derive(Debug)]
pub struct MemoryViewport {
	width: Cell<u32>,
	scroll_y: Cell<f64>,
	touch: Cell<bool>,
}

impl MemoryViewport {
	/// Creates a viewport of the given width, scrolled to the top, without touch.
	pub fn new(width: u32) -> Self {
		Self {
			width: Cell::new(width),
			scroll_y: Cell::new(0.0),
			touch: Cell::new(false),
		}
	}

	/// Changes the width. Callers still have to notify the State Manager.
	pub fn set_width(&self, width: u32) {
		self.width.set(width);
	}

	/// Changes the scroll offset.
	pub fn set_scroll_y(&self, scroll_y: f64) {
		self.scroll_y.set(scroll_y);
	}

	/// Changes touch support.
	pub fn set_touch(&self, touch: bool) {
		self.touch.set(touch);
	}
}

impl Default for MemoryViewport {
	fn default() -> Self {
		Self::new(1280)
	}
}

impl Viewport for MemoryViewport {
	fn width(&self) -> u32 {
		self.width.get()
	}

	fn scroll_y(&self) -> f64 {
		self.scroll_y.get()
	}

	fn supports_touch(&self) -> bool {
		self.touch.get()
	}
}

/// The `window` of the running page.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct WindowViewport;

#[cfg(target_arch = "wasm32")]
impl WindowViewport {
	/// Creates a handle to the current window.
	pub fn new() -> Self {
		Self
	}
}

#[cfg(target_arch = "wasm32")]
impl Viewport for WindowViewport {
	fn width(&self) -> u32 {
		web_sys::window()
			.and_then(|w| w.inner_width().ok())
			.and_then(|v| v.as_f64())
			.map(|w| w.max(0.0) as u32)
			.unwrap_or(0)
	}

	fn scroll_y(&self) -> f64 {
		web_sys::window()
			.and_then(|w| w.scroll_y().ok())
			.unwrap_or(0.0)
	}

	fn supports_touch(&self) -> bool {
		web_sys::window()
			.map(|w| js_sys::Reflect::has(&w, &"ontouchstart".into()).unwrap_or(false))
			.unwrap_or(false)
	}
}
