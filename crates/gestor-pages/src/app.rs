//! The application context handed to every page.
//!
//! One [`AppContext`] is built at start-up and cloned into the router, the
//! layout and each [`PageContext`](crate::router::PageContext). It replaces
//! ambient singletons: whatever a page needs (state, DOM, authenticator,
//! navigation) comes from here.

use std::fmt;
use std::rc::Rc;

use gestor_auth::Authenticator;
use gestor_core::{Dom, KeyValueStore, Node, ShellSettings, StateManager, Viewport};

use crate::router::Location;

/// Platform services the shell runs on.
#[derive(Clone)]
pub struct Platform {
	/// The document.
	pub dom: Rc<dyn Dom>,
	/// Durable key/value storage.
	pub store: Rc<dyn KeyValueStore>,
	/// Viewport geometry.
	pub viewport: Rc<dyn Viewport>,
	/// The URL fragment.
	pub location: Rc<dyn Location>,
}

impl fmt::Debug for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Platform").finish_non_exhaustive()
	}
}

impl Platform {
	/// The running browser: `document`, `localStorage`, `window` and
	/// `location.hash`.
	#[cfg(target_arch = "wasm32")]
	pub fn browser() -> Self {
		use gestor_core::{LocalStorage, WebDom, WindowViewport};

		Self {
			dom: Rc::new(WebDom::new()),
			store: Rc::new(LocalStorage::new()),
			viewport: Rc::new(WindowViewport::new()),
			location: Rc::new(crate::router::HashLocation::new()),
		}
	}
}

/// Shared services of the running application. Clones are cheap and share
/// everything.
#[derive(Clone)]
pub struct AppContext {
	settings: Rc<ShellSettings>,
	dom: Rc<dyn Dom>,
	state: StateManager,
	auth: Rc<dyn Authenticator>,
	location: Rc<dyn Location>,
	viewport: Rc<dyn Viewport>,
}

impl fmt::Debug for AppContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppContext")
			.field("app_name", &self.settings.app_name)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

impl AppContext {
	/// Builds the context and its State Manager.
	pub fn new(
		settings: Rc<ShellSettings>,
		platform: &Platform,
		auth: Rc<dyn Authenticator>,
	) -> Self {
		let state = StateManager::new(
			Rc::clone(&settings),
			Rc::clone(&platform.store),
			Rc::clone(&platform.viewport),
		);
		Self {
			settings,
			dom: Rc::clone(&platform.dom),
			state,
			auth,
			location: Rc::clone(&platform.location),
			viewport: Rc::clone(&platform.viewport),
		}
	}

	/// Shell settings.
	pub fn settings(&self) -> &Rc<ShellSettings> {
		&self.settings
	}

	/// The document.
	pub fn dom(&self) -> &Rc<dyn Dom> {
		&self.dom
	}

	/// The State Manager.
	pub fn state(&self) -> &StateManager {
		&self.state
	}

	/// The authenticator.
	pub fn auth(&self) -> &Rc<dyn Authenticator> {
		&self.auth
	}

	/// The URL fragment.
	pub fn location(&self) -> &Rc<dyn Location> {
		&self.location
	}

	/// Viewport geometry.
	pub fn viewport(&self) -> &Rc<dyn Viewport> {
		&self.viewport
	}

	/// Sets the URL fragment. Guards and rendering run when the change
	/// signal reaches the router, exactly as for a manual edit.
	pub fn navigate_to(&self, path: &str) {
		self.location.set_fragment(path);
	}

	/// Opens the form panel with `content`.
	pub fn open_form_sidebar(&self, title: impl Into<String>, content: impl Into<Node>) {
		self.state.open_form_sidebar(title, content.into());
	}

	/// Closes the form panel.
	pub fn close_form_sidebar(&self) {
		self.state.close_form_sidebar();
	}
}
