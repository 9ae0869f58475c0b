//! The global search modal.
//!
//! Opened with `Ctrl`/`Cmd` + `K` or the topbar trigger through
//! [`StateManager::open_search`]; the modal follows the `search:open` and
//! `search:close` topics. Opening focuses the query input. Closing clears
//! the query and the results.
//!
//! The backdrop and the dialog are siblings, so only a click on the
//! backdrop itself closes the modal.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use gestor_core::markup::html;
use gestor_core::{Dom, DomError, Element, ShellEvent, StateManager, SubscriptionId, Topic};

use crate::app::AppContext;

/// Wrapper of the modal.
pub const SEARCH_MODAL_ID: &str = "search-modal";
/// Backdrop behind the dialog.
pub const SEARCH_MODAL_OVERLAY_ID: &str = "search-modal-overlay";
/// Query input.
pub const SEARCH_MODAL_INPUT_ID: &str = "search-modal-input";
/// Results list.
pub const SEARCH_MODAL_RESULTS_ID: &str = "search-modal-results";
/// Visible modal.
pub const SEARCH_MODAL_ACTIVE_CLASS: &str = "search-modal--active";

const MIN_QUERY_HINT: &str = "Escribe al menos 2 caracteres para buscar";

struct Inner {
	dom: Rc<dyn Dom>,
	state: StateManager,
	subscriptions: RefCell<Vec<(Topic, SubscriptionId)>>,
}

/// The search modal. Clones share the same modal.
#[derive(Clone)]
pub struct SearchModal {
	inner: Rc<Inner>,
}

impl fmt::Debug for SearchModal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchModal")
			.field("attached", &!self.inner.subscriptions.borrow().is_empty())
			.finish()
	}
}

impl SearchModal {
	/// Creates the modal. Nothing is rendered or subscribed yet.
	pub fn new(app: &AppContext) -> Self {
		Self {
			inner: Rc::new(Inner {
				dom: Rc::clone(app.dom()),
				state: app.state().clone(),
				subscriptions: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Markup of the modal, reflecting the current open state.
	pub fn render(&self) -> Element {
		let is_open = self.inner.state.snapshot().search.is_open;

		html::div()
			.id(SEARCH_MODAL_ID)
			.class("search-modal")
			.class_if(SEARCH_MODAL_ACTIVE_CLASS, is_open)
			.attr("role", "dialog")
			.attr("aria-modal", "true")
			.attr("aria-label", "Buscar")
			.child(
				html::div()
					.id(SEARCH_MODAL_OVERLAY_ID)
					.class("search-modal-overlay")
					.attr("data-action", "close-search"),
			)
			.child(
				html::div()
					.class("search-modal-container")
					.child(
						html::div()
							.class("search-modal-input-wrapper")
							.child(html::span().class("search-modal-icon").text("🔍"))
							.child(query_input())
							.child(html::kbd().class("search-modal-kbd").text("Esc")),
					)
					.child(empty_results()),
			)
	}

	/// Starts following the search topics. Calling it twice has no effect.
	pub fn attach(&self) {
		if !self.inner.subscriptions.borrow().is_empty() {
			return;
		}
		let weak = Rc::downgrade(&self.inner);
		let open = self
			.inner
			.state
			.subscribe(Topic::SearchOpen, follow(&weak, true));
		let close = self
			.inner
			.state
			.subscribe(Topic::SearchClose, follow(&weak, false));
		*self.inner.subscriptions.borrow_mut() =
			vec![(Topic::SearchOpen, open), (Topic::SearchClose, close)];
	}

	/// Stops following the search topics.
	pub fn detach(&self) {
		let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
		for (topic, id) in subscriptions {
			self.inner.state.unsubscribe(topic, id);
		}
	}

	/// Shows the modal.
	pub fn open(&self) {
		self.inner.state.open_search();
	}

	/// Hides the modal.
	pub fn close(&self) {
		self.inner.state.close_search();
	}

	/// Whether the modal is visible.
	pub fn is_open(&self) -> bool {
		self.inner.state.snapshot().search.is_open
	}
}

fn follow(
	weak: &Weak<Inner>,
	is_open: bool,
) -> impl Fn(&ShellEvent) -> Result<(), DomError> + 'static {
	let weak = Weak::clone(weak);
	move |_| match weak.upgrade() {
		Some(inner) => show_open(inner.dom.as_ref(), is_open),
		None => Ok(()),
	}
}

fn query_input() -> Element {
	html::input()
		.id(SEARCH_MODAL_INPUT_ID)
		.class("search-modal-input")
		.attr("type", "text")
		.attr("placeholder", "Buscar en todo...")
		.attr("autocomplete", "off")
}

fn empty_results() -> Element {
	html::div()
		.id(SEARCH_MODAL_RESULTS_ID)
		.class("search-modal-results")
		.child(
			html::div()
				.class("search-modal-empty")
				.child(html::p().class("text-gray-500").text(MIN_QUERY_HINT)),
		)
}

fn show_open(dom: &dyn Dom, is_open: bool) -> Result<(), DomError> {
	dom.set_class(SEARCH_MODAL_ID, SEARCH_MODAL_ACTIVE_CLASS, is_open)?;
	if is_open {
		return dom.focus(SEARCH_MODAL_INPUT_ID);
	}
	// A fresh input drops the typed query
	dom.replace(SEARCH_MODAL_INPUT_ID, query_input().into())?;
	dom.replace(SEARCH_MODAL_RESULTS_ID, empty_results().into())
}
