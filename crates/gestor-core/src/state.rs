//! The State Manager.
//!
//! [`StateManager`] is the single owner of [`LayoutState`]. Other components
//! read it through [`StateManager::snapshot`] or through event payloads and
//! change it only through the methods below, each of which publishes the
//! matching [`ShellEvent`] on the shared [`EventBus`].
//!
//! The desktop open flag and the expanded group ids are persisted through
//! a [`KeyValueStore`]; any storage failure is logged and the in-memory
//! value is kept.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::bus::{EventBus, IntoListenerResult, ShellEvent, SubscriptionId, Topic};
use crate::markup::Node;
use crate::settings::ShellSettings;
use crate::storage::{KeyValueStore, read_json, write_json};
use crate::viewport::Viewport;
use crate::{debug_log, warn_log};

/// Sidebar part of the layout state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SidebarState {
	/// Effective open state (always false right after entering mobile).
	pub is_open: bool,
	/// Link target (`#/path`) of the entry marked active.
	pub active_item: Option<String>,
	/// Expanded group ids.
	pub expanded_items: BTreeSet<String>,
}

/// Topbar part of the layout state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopBarState {
	/// Compact mode after scrolling past the threshold.
	pub is_compact: bool,
	/// Last reported scroll offset.
	pub scroll_y: f64,
}

/// Form panel part of the layout state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSidebarState {
	/// Whether the panel is visible.
	pub is_open: bool,
	/// Header of the last content shown.
	pub title: Option<String>,
}

/// Global search part of the layout state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
	/// Whether the search modal is visible.
	pub is_open: bool,
}

/// Layout state of the shell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutState {
	/// Sidebar state.
	pub sidebar: SidebarState,
	/// Topbar state.
	pub top_bar: TopBarState,
	/// Form panel state.
	pub form_sidebar: FormSidebarState,
	/// Search modal state.
	pub search: SearchState,
}

struct Inner {
	settings: Rc<ShellSettings>,
	store: Rc<dyn KeyValueStore>,
	viewport: Rc<dyn Viewport>,
	bus: EventBus,
	state: RefCell<LayoutState>,
	was_mobile: Cell<bool>,
}

/// Owner of the layout state. Clones share the same state and bus.
#[derive(Clone)]
pub struct StateManager {
	inner: Rc<Inner>,
}

impl fmt::Debug for StateManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StateManager")
			.field("state", &self.inner.state.borrow())
			.field("was_mobile", &self.inner.was_mobile.get())
			.finish()
	}
}

impl StateManager {
	/// Creates the manager, loading the persisted part of the state.
	///
	/// On a mobile viewport the sidebar always starts closed.
	pub fn new(
		settings: Rc<ShellSettings>,
		store: Rc<dyn KeyValueStore>,
		viewport: Rc<dyn Viewport>,
	) -> Self {
		let is_mobile = settings.is_mobile_width(viewport.width());
		let manager = Self {
			inner: Rc::new(Inner {
				settings,
				store,
				viewport,
				bus: EventBus::new(),
				state: RefCell::new(LayoutState::default()),
				was_mobile: Cell::new(is_mobile),
			}),
		};

		let is_open = !is_mobile && manager.load_desktop_open();
		let expanded_items = manager.load_expanded_items();
		{
			let mut state = manager.inner.state.borrow_mut();
			state.sidebar.is_open = is_open;
			state.sidebar.expanded_items = expanded_items;
		}
		debug_log!(
			"State manager ready (sidebar open: {}, mobile: {})",
			is_open,
			is_mobile
		);
		manager
	}

	/// Returns a copy of the current state.
	pub fn snapshot(&self) -> LayoutState {
		self.inner.state.borrow().clone()
	}

	/// Returns the settings the manager was built with.
	pub fn settings(&self) -> &Rc<ShellSettings> {
		&self.inner.settings
	}

	/// Returns the shared bus.
	pub fn bus(&self) -> EventBus {
		self.inner.bus.clone()
	}

	/// Returns true when the viewport is currently below the mobile breakpoint.
	pub fn is_mobile(&self) -> bool {
		self.inner
			.settings
			.is_mobile_width(self.inner.viewport.width())
	}

	/// Registers a listener on the shared bus.
	pub fn subscribe<F, R>(&self, topic: Topic, listener: F) -> SubscriptionId
	where
		F: Fn(&ShellEvent) -> R + 'static,
		R: IntoListenerResult,
	{
		self.inner.bus.subscribe(topic, listener)
	}

	/// Removes a listener from the shared bus.
	pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
		self.inner.bus.unsubscribe(topic, id)
	}

	/// Publishes an event on the shared bus.
	pub fn emit(&self, event: &ShellEvent) {
		self.inner.bus.emit(event);
	}

	/// Flips the sidebar open state and publishes [`ShellEvent::SidebarToggle`].
	///
	/// The new value is persisted only on desktop viewports and only when
	/// persistence is enabled.
	pub fn toggle_sidebar(&self) {
		let is_mobile = self.is_mobile();
		let is_open = {
			let mut state = self.inner.state.borrow_mut();
			state.sidebar.is_open = !state.sidebar.is_open;
			state.sidebar.is_open
		};

		if !is_mobile && self.inner.settings.sidebar.persistence {
			let key = self.inner.settings.storage.sidebar_state_key();
			if let Err(e) = write_json(self.inner.store.as_ref(), &key, &is_open) {
				warn_log!("Could not persist sidebar state: {}", e);
			}
		}

		self.emit(&ShellEvent::SidebarToggle { is_open, is_mobile });
	}

	/// Opens the sidebar if it is closed.
	pub fn open_sidebar(&self) {
		if !self.inner.state.borrow().sidebar.is_open {
			self.toggle_sidebar();
		}
	}

	/// Closes the sidebar if it is open.
	pub fn close_sidebar(&self) {
		if self.inner.state.borrow().sidebar.is_open {
			self.toggle_sidebar();
		}
	}

	/// Expands or collapses a sidebar group, persists the expanded set and
	/// publishes [`ShellEvent::SidebarExpandedChanged`].
	pub fn toggle_expanded_item(&self, item_id: &str) {
		let (expanded, expanded_items) = {
			let mut state = self.inner.state.borrow_mut();
			let items = &mut state.sidebar.expanded_items;
			let expanded = if items.remove(item_id) {
				false
			} else {
				items.insert(item_id.to_string());
				true
			};
			(expanded, items.iter().cloned().collect::<Vec<_>>())
		};

		let key = self.inner.settings.storage.sidebar_expanded_key();
		if let Err(e) = write_json(self.inner.store.as_ref(), &key, &expanded_items) {
			warn_log!("Could not persist expanded sidebar items: {}", e);
		}

		self.emit(&ShellEvent::SidebarExpandedChanged {
			item_id: item_id.to_string(),
			expanded,
			expanded_items,
		});
	}

	/// Records the active sidebar entry (its `#/path` link target).
	pub fn set_active_item(&self, href: Option<String>) {
		self.inner.state.borrow_mut().sidebar.active_item = href;
	}

	/// Shows `content` in the form panel and makes it visible.
	///
	/// Publishes [`ShellEvent::FormSidebarContent`] and then
	/// [`ShellEvent::FormSidebarToggle`].
	pub fn open_form_sidebar(&self, title: impl Into<String>, content: Node) {
		let title = title.into();
		{
			let mut state = self.inner.state.borrow_mut();
			state.form_sidebar.is_open = true;
			state.form_sidebar.title = Some(title.clone());
		}
		self.emit(&ShellEvent::FormSidebarContent { title, content });
		self.emit(&ShellEvent::FormSidebarToggle { is_open: true });
	}

	/// Hides the form panel. Does nothing if it is already closed.
	pub fn close_form_sidebar(&self) {
		{
			let mut state = self.inner.state.borrow_mut();
			if !state.form_sidebar.is_open {
				return;
			}
			state.form_sidebar.is_open = false;
		}
		self.emit(&ShellEvent::FormSidebarToggle { is_open: false });
	}

	/// Reacts to a viewport resize.
	///
	/// Only a resize that crosses the mobile breakpoint has an effect:
	/// entering mobile closes the sidebar, leaving it restores the
	/// persisted desktop value. [`ShellEvent::SidebarToggle`] is published
	/// only when the open state actually changes.
	pub fn handle_resize(&self) {
		let is_mobile = self.is_mobile();
		if self.inner.was_mobile.replace(is_mobile) == is_mobile {
			return;
		}

		let target = if is_mobile {
			false
		} else {
			self.load_desktop_open()
		};

		let changed = {
			let mut state = self.inner.state.borrow_mut();
			let changed = state.sidebar.is_open != target;
			state.sidebar.is_open = target;
			changed
		};

		debug_log!("Viewport crossed breakpoint (mobile: {})", is_mobile);
		if changed {
			self.emit(&ShellEvent::SidebarToggle {
				is_open: target,
				is_mobile,
			});
		}
	}

	/// Records a scroll offset and publishes [`ShellEvent::TopBarScroll`]
	/// when the compact state changes.
	pub fn update_scroll(&self, scroll_y: f64) {
		let topbar = &self.inner.settings.topbar;
		let is_compact = topbar.compact_on_scroll && scroll_y > topbar.scroll_threshold;

		let changed = {
			let mut state = self.inner.state.borrow_mut();
			state.top_bar.scroll_y = scroll_y;
			let changed = state.top_bar.is_compact != is_compact;
			state.top_bar.is_compact = is_compact;
			changed
		};

		if changed {
			self.emit(&ShellEvent::TopBarScroll {
				is_compact,
				scroll_y,
			});
		}
	}

	/// Publishes [`ShellEvent::UserLogout`].
	pub fn request_logout(&self) {
		self.emit(&ShellEvent::UserLogout);
	}

	/// Opens the search modal and publishes [`ShellEvent::SearchOpen`].
	/// No-op while it is already open.
	pub fn open_search(&self) {
		if !self.set_search_open(true) {
			return;
		}
		self.emit(&ShellEvent::SearchOpen);
	}

	/// Closes the search modal and publishes [`ShellEvent::SearchClose`].
	/// No-op while it is closed.
	pub fn close_search(&self) {
		if !self.set_search_open(false) {
			return;
		}
		self.emit(&ShellEvent::SearchClose);
	}

	fn set_search_open(&self, is_open: bool) -> bool {
		let mut state = self.inner.state.borrow_mut();
		let changed = state.search.is_open != is_open;
		state.search.is_open = is_open;
		changed
	}

	fn load_desktop_open(&self) -> bool {
		let sidebar = &self.inner.settings.sidebar;
		if !sidebar.persistence {
			return sidebar.default_open;
		}
		let key = self.inner.settings.storage.sidebar_state_key();
		match read_json::<bool>(self.inner.store.as_ref(), &key) {
			Ok(Some(value)) => value,
			Ok(None) => sidebar.default_open,
			Err(e) => {
				warn_log!("Could not load sidebar state: {}", e);
				sidebar.default_open
			}
		}
	}

	fn load_expanded_items(&self) -> BTreeSet<String> {
		let key = self.inner.settings.storage.sidebar_expanded_key();
		match read_json::<Vec<String>>(self.inner.store.as_ref(), &key) {
			Ok(items) => items.unwrap_or_default().into_iter().collect(),
			Err(e) => {
				warn_log!("Could not load expanded sidebar items: {}", e);
				BTreeSet::new()
			}
		}
	}
}
