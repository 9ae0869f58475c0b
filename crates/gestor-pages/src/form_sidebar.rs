//! The shared slide-over form panel.
//!
//! Pages never talk to the panel directly. They call
//! [`StateManager::open_form_sidebar`] / [`StateManager::close_form_sidebar`]
//! (or the same methods on [`AppContext`]); the panel follows the
//! `form-sidebar:content` and `form-sidebar:toggle` topics.
//!
//! Replacing the content discards the previous body.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use gestor_core::markup::html;
use gestor_core::{Dom, DomError, Element, Node, ShellEvent, StateManager, SubscriptionId, Topic};

use crate::app::AppContext;

/// Outer wrapper of the panel.
pub const FORM_SIDEBAR_CONTAINER_ID: &str = "form-sidebar-container";
/// The panel.
pub const FORM_SIDEBAR_ID: &str = "form-sidebar";
/// Backdrop behind the panel.
pub const FORM_SIDEBAR_OVERLAY_ID: &str = "form-sidebar-overlay";
/// Header text.
pub const FORM_SIDEBAR_TITLE_ID: &str = "form-sidebar-title";
/// Body receiving page content.
pub const FORM_SIDEBAR_BODY_ID: &str = "form-sidebar-body";
/// Visible panel.
pub const FORM_SIDEBAR_OPEN_CLASS: &str = "form-sidebar--open";
/// Visible backdrop.
pub const FORM_SIDEBAR_OVERLAY_VISIBLE_CLASS: &str = "form-sidebar-overlay--visible";

struct Inner {
	dom: Rc<dyn Dom>,
	state: StateManager,
	subscriptions: RefCell<Vec<(Topic, SubscriptionId)>>,
}

/// The form panel. Clones share the same panel.
#[derive(Clone)]
pub struct FormSidebar {
	inner: Rc<Inner>,
}

impl fmt::Debug for FormSidebar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormSidebar")
			.field("attached", &!self.inner.subscriptions.borrow().is_empty())
			.finish()
	}
}

impl FormSidebar {
	/// Creates the panel. Nothing is rendered or subscribed yet.
	pub fn new(app: &AppContext) -> Self {
		Self {
			inner: Rc::new(Inner {
				dom: Rc::clone(app.dom()),
				state: app.state().clone(),
				subscriptions: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Markup of the panel, reflecting the current open state.
	pub fn render(&self) -> Element {
		let form_state = self.inner.state.snapshot().form_sidebar;
		let is_open = form_state.is_open;

		html::div()
			.id(FORM_SIDEBAR_CONTAINER_ID)
			.class("form-sidebar-container")
			.child(
				html::div()
					.id(FORM_SIDEBAR_OVERLAY_ID)
					.class("form-sidebar-overlay")
					.class_if(FORM_SIDEBAR_OVERLAY_VISIBLE_CLASS, is_open)
					.attr("data-action", "close-form-sidebar"),
			)
			.child(
				html::aside()
					.id(FORM_SIDEBAR_ID)
					.class("form-sidebar")
					.class_if(FORM_SIDEBAR_OPEN_CLASS, is_open)
					.attr("role", "dialog")
					.attr("aria-modal", "true")
					.attr("aria-labelledby", FORM_SIDEBAR_TITLE_ID)
					.child(
						html::div()
							.class("form-sidebar__header")
							.child(
								html::h2()
									.id(FORM_SIDEBAR_TITLE_ID)
									.class("form-sidebar__title")
									.text(form_state.title.unwrap_or_default()),
							)
							.child(
								html::button()
									.id("form-sidebar-close")
									.class("form-sidebar__close")
									.attr("type", "button")
									.attr("data-action", "close-form-sidebar")
									.attr("aria-label", "Cerrar")
									.text("✕"),
							),
					)
					.child(html::div().id(FORM_SIDEBAR_BODY_ID).class("form-sidebar__body")),
			)
	}

	/// Starts following the panel topics. Calling it twice has no effect.
	pub fn attach(&self) {
		if !self.inner.subscriptions.borrow().is_empty() {
			return;
		}
		let weak = Rc::downgrade(&self.inner);
		let content = self.inner.state.subscribe(Topic::FormSidebarContent, {
			let weak = Weak::clone(&weak);
			move |event| match (weak.upgrade(), event) {
				(Some(inner), ShellEvent::FormSidebarContent { title, content }) => {
					show_content(inner.dom.as_ref(), title, content.clone())
				}
				_ => Ok(()),
			}
		});
		let toggle = self
			.inner
			.state
			.subscribe(Topic::FormSidebarToggle, move |event| match (weak.upgrade(), event) {
				(Some(inner), ShellEvent::FormSidebarToggle { is_open }) => {
					show_open(inner.dom.as_ref(), *is_open)
				}
				_ => Ok(()),
			});
		*self.inner.subscriptions.borrow_mut() = vec![
			(Topic::FormSidebarContent, content),
			(Topic::FormSidebarToggle, toggle),
		];
	}

	/// Stops following the panel topics and releases the scroll lock.
	pub fn detach(&self) {
		let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
		for (topic, id) in subscriptions {
			self.inner.state.unsubscribe(topic, id);
		}
		self.inner.dom.set_body_scroll_locked(false);
	}

	/// Replaces the content and shows the panel.
	pub fn open(&self, title: impl Into<String>, content: impl Into<Node>) {
		self.inner.state.open_form_sidebar(title, content.into());
	}

	/// Hides the panel.
	pub fn close(&self) {
		self.inner.state.close_form_sidebar();
	}

	/// Whether the panel is visible.
	pub fn is_open(&self) -> bool {
		self.inner.state.snapshot().form_sidebar.is_open
	}
}

fn show_content(dom: &dyn Dom, title: &str, content: Node) -> Result<(), DomError> {
	dom.set_text(FORM_SIDEBAR_TITLE_ID, title)?;
	dom.set_children(FORM_SIDEBAR_BODY_ID, vec![content])
}

fn show_open(dom: &dyn Dom, is_open: bool) -> Result<(), DomError> {
	dom.set_body_scroll_locked(is_open);
	dom.set_class(FORM_SIDEBAR_ID, FORM_SIDEBAR_OPEN_CLASS, is_open)?;
	dom.set_class(
		FORM_SIDEBAR_OVERLAY_ID,
		FORM_SIDEBAR_OVERLAY_VISIBLE_CLASS,
		is_open,
	)
}
