//! Typed publish/subscribe bus.
//!
//! Every cross-component notification of the shell travels as a
//! [`ShellEvent`] under a [`Topic`]. Listeners are called synchronously, in
//! registration order. A listener reports failure by returning
//! `Err(ListenerError)`; the error is logged and the remaining listeners
//! still run. Listeners that cannot fail may simply return `()`.
//!
//! On native targets a panicking listener is also caught and skipped. The
//! browser build aborts on panic, so there a listener must report failures
//! through its `Result`.
//!
//! ## Example
//!
//! ```
//! use gestor_core::{EventBus, ListenerError, ShellEvent, Topic};
//!
//! let bus = EventBus::new();
//! let id = bus.subscribe(Topic::SidebarToggle, |event| {
//! 	if let ShellEvent::SidebarToggle { is_open, .. } = event {
//! 		assert!(*is_open);
//! 	}
//! });
//! bus.subscribe(Topic::SidebarToggle, |_| {
//! 	Err::<(), _>(ListenerError::failed("logged, not propagated"))
//! });
//!
//! bus.emit(&ShellEvent::SidebarToggle { is_open: true, is_mobile: false });
//! assert!(bus.unsubscribe(Topic::SidebarToggle, id));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::ListenerError;
use crate::error_log;
use crate::markup::Node;

/// Names of the events carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
	/// The sidebar opened or closed.
	SidebarToggle,
	/// A sidebar group expanded or collapsed.
	SidebarExpandedChanged,
	/// The topbar entered or left compact mode.
	TopBarScroll,
	/// New title and body for the form panel.
	FormSidebarContent,
	/// The form panel opened or closed.
	FormSidebarToggle,
	/// The user asked to sign out.
	UserLogout,
	/// The global search opened.
	SearchOpen,
	/// The global search closed.
	SearchClose,
}

impl Topic {
	/// Wire name of the topic (`"sidebar:toggle"`, ...).
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::SidebarToggle => "sidebar:toggle",
			Self::SidebarExpandedChanged => "sidebar:expanded-changed",
			Self::TopBarScroll => "topbar:scroll",
			Self::FormSidebarContent => "form-sidebar:content",
			Self::FormSidebarToggle => "form-sidebar:toggle",
			Self::UserLogout => "user:logout",
			Self::SearchOpen => "search:open",
			Self::SearchClose => "search:close",
		}
	}
}

impl fmt::Display for Topic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
	/// Published by [`StateManager`](crate::StateManager) when the effective
	/// open state changes.
	SidebarToggle {
		/// New open state.
		is_open: bool,
		/// Whether the viewport was mobile at the time.
		is_mobile: bool,
	},
	/// A sidebar group was expanded or collapsed.
	SidebarExpandedChanged {
		/// The item that changed.
		item_id: String,
		/// Its new state.
		expanded: bool,
		/// Every expanded item after the change, sorted.
		expanded_items: Vec<String>,
	},
	/// The topbar crossed the compact threshold.
	TopBarScroll {
		/// New compact state.
		is_compact: bool,
		/// Scroll offset that caused the change.
		scroll_y: f64,
	},
	/// New content for the form panel.
	FormSidebarContent {
		/// Header text.
		title: String,
		/// Body content; replaces the previous body.
		content: Node,
	},
	/// The form panel opened or closed.
	FormSidebarToggle {
		/// New open state.
		is_open: bool,
	},
	/// Logout requested from the chrome.
	UserLogout,
	/// Global search opened.
	SearchOpen,
	/// Global search closed.
	SearchClose,
}

impl ShellEvent {
	/// Topic this event is published under.
	pub fn topic(&self) -> Topic {
		match self {
			Self::SidebarToggle { .. } => Topic::SidebarToggle,
			Self::SidebarExpandedChanged { .. } => Topic::SidebarExpandedChanged,
			Self::TopBarScroll { .. } => Topic::TopBarScroll,
			Self::FormSidebarContent { .. } => Topic::FormSidebarContent,
			Self::FormSidebarToggle { .. } => Topic::FormSidebarToggle,
			Self::UserLogout => Topic::UserLogout,
			Self::SearchOpen => Topic::SearchOpen,
			Self::SearchClose => Topic::SearchClose,
		}
	}
}

/// Handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a listener returns.
pub type ListenerResult = Result<(), ListenerError>;

/// Return types accepted from listeners: `()` or `Result<(), E>` for any
/// error convertible into [`ListenerError`].
pub trait IntoListenerResult {
	/// Converts the listener's return value.
	fn into_listener_result(self) -> ListenerResult;
}

impl IntoListenerResult for () {
	fn into_listener_result(self) -> ListenerResult {
		Ok(())
	}
}

impl<E> IntoListenerResult for Result<(), E>
where
	E: Into<ListenerError>,
{
	fn into_listener_result(self) -> ListenerResult {
		self.map_err(Into::into)
	}
}

type Listener = Rc<dyn Fn(&ShellEvent) -> ListenerResult>;

#[derive(Default)]
struct Inner {
	next_id: Cell<u64>,
	listeners: RefCell<HashMap<Topic, Vec<(SubscriptionId, Listener)>>>,
}

/// Single-threaded event bus. Clones share the same registrations.
#[derive(Clone, Default)]
pub struct EventBus {
	inner: Rc<Inner>,
}

impl fmt::Debug for EventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let listeners = self.inner.listeners.borrow();
		let counts: HashMap<&str, usize> = listeners
			.iter()
			.map(|(topic, list)| (topic.as_str(), list.len()))
			.collect();
		f.debug_struct("EventBus").field("listeners", &counts).finish()
	}
}

impl EventBus {
	/// Creates a bus without listeners.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `listener` for `topic`.
	pub fn subscribe<F, R>(&self, topic: Topic, listener: F) -> SubscriptionId
	where
		F: Fn(&ShellEvent) -> R + 'static,
		R: IntoListenerResult,
	{
		let listener: Listener = Rc::new(move |event| listener(event).into_listener_result());
		let id = SubscriptionId(self.inner.next_id.get());
		self.inner.next_id.set(id.0 + 1);
		self.inner
			.listeners
			.borrow_mut()
			.entry(topic)
			.or_default()
			.push((id, listener));
		id
	}

	/// Removes one registration. Returns false if it was not registered.
	pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
		let mut listeners = self.inner.listeners.borrow_mut();
		let Some(list) = listeners.get_mut(&topic) else {
			return false;
		};
		match list.iter().position(|(registered, _)| *registered == id) {
			Some(index) => {
				list.remove(index);
				true
			}
			None => false,
		}
	}

	/// Calls every listener of the event's topic, in registration order.
	///
	/// The listener list is captured before the first call: listeners added
	/// or removed during the emission take effect from the next one. A
	/// listener may emit further events. A listener error is logged and the
	/// emission continues.
	pub fn emit(&self, event: &ShellEvent) {
		let topic = event.topic();
		let snapshot: Vec<Listener> = self
			.inner
			.listeners
			.borrow()
			.get(&topic)
			.map(|list| list.iter().map(|(_, l)| Rc::clone(l)).collect())
			.unwrap_or_default();

		for listener in snapshot {
			if let Err(e) = call(&listener, event) {
				error_log!("Listener for '{}' failed: {}", topic, e);
			}
		}
	}

	/// Number of listeners registered for `topic`.
	pub fn listener_count(&self, topic: Topic) -> usize {
		self.inner
			.listeners
			.borrow()
			.get(&topic)
			.map_or(0, Vec::len)
	}
}

#[cfg(not(target_arch = "wasm32"))]
fn call(listener: &Listener, event: &ShellEvent) -> ListenerResult {
	use std::panic::{AssertUnwindSafe, catch_unwind};

	catch_unwind(AssertUnwindSafe(|| listener(event)))
		.unwrap_or_else(|_| Err(ListenerError::failed("listener panicked")))
}

// Panics abort the module in the browser; only returned errors are recoverable.
#[cfg(target_arch = "wasm32")]
fn call(listener: &Listener, event: &ShellEvent) -> ListenerResult {
	listener(event)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DomError;
	use rstest::{fixture, rstest};

	#[fixture]
	fn bus() -> EventBus {
		EventBus::new()
	}

	fn toggle(is_open: bool) -> ShellEvent {
		ShellEvent::SidebarToggle {
			is_open,
			is_mobile: false,
		}
	}

	#[rstest]
	fn test_listeners_run_in_registration_order(bus: EventBus) {
		let log = Rc::new(RefCell::new(Vec::new()));
		for n in 0..3 {
			let log = Rc::clone(&log);
			bus.subscribe(Topic::SidebarToggle, move |_| log.borrow_mut().push(n));
		}
		bus.emit(&toggle(true));
		assert_eq!(*log.borrow(), vec![0, 1, 2]);
	}

	#[rstest]
	fn test_emit_only_reaches_its_topic(bus: EventBus) {
		let hits = Rc::new(Cell::new(0));
		let counter = Rc::clone(&hits);
		bus.subscribe(Topic::TopBarScroll, move |_| counter.set(counter.get() + 1));
		bus.emit(&toggle(true));
		assert_eq!(hits.get(), 0);
	}

	#[rstest]
	fn test_failing_listener_is_isolated(bus: EventBus) {
		let reached = Rc::new(Cell::new(0));
		bus.subscribe(Topic::SidebarToggle, |_| {
			Err::<(), _>(ListenerError::failed("listener failure"))
		});
		bus.subscribe(Topic::SidebarToggle, |_| -> Result<(), DomError> {
			Err(DomError::NotFound("sidebar".to_string()))
		});
		let counter = Rc::clone(&reached);
		bus.subscribe(Topic::SidebarToggle, move |_| counter.set(counter.get() + 1));

		bus.emit(&toggle(false));
		bus.emit(&toggle(true));
		assert_eq!(reached.get(), 2);
		assert_eq!(bus.listener_count(Topic::SidebarToggle), 3);
	}

	#[cfg(not(target_arch = "wasm32"))]
	#[rstest]
	fn test_panicking_listener_is_isolated_on_native(bus: EventBus) {
		let reached = Rc::new(Cell::new(false));
		bus.subscribe(Topic::SidebarToggle, |_| -> () { panic!("listener failure") });
		let flag = Rc::clone(&reached);
		bus.subscribe(Topic::SidebarToggle, move |_| flag.set(true));

		bus.emit(&toggle(false));
		assert!(reached.get());
	}

	#[rstest]
	fn test_unsubscribe_removes_exactly_one(bus: EventBus) {
		let hits = Rc::new(Cell::new(0));
		let first = {
			let hits = Rc::clone(&hits);
			bus.subscribe(Topic::UserLogout, move |_| hits.set(hits.get() + 1))
		};
		{
			let hits = Rc::clone(&hits);
			bus.subscribe(Topic::UserLogout, move |_| hits.set(hits.get() + 10));
		}

		assert!(bus.unsubscribe(Topic::UserLogout, first));
		assert!(!bus.unsubscribe(Topic::UserLogout, first));
		assert!(!bus.unsubscribe(Topic::SearchOpen, first));

		bus.emit(&ShellEvent::UserLogout);
		assert_eq!(hits.get(), 10);
		assert_eq!(bus.listener_count(Topic::UserLogout), 1);
	}

	#[rstest]
	fn test_listener_may_subscribe_and_emit_reentrantly(bus: EventBus) {
		let hits = Rc::new(Cell::new(0));
		let inner_bus = bus.clone();
		let counter = Rc::clone(&hits);
		bus.subscribe(Topic::SearchOpen, move |_| {
			let counter = Rc::clone(&counter);
			inner_bus.subscribe(Topic::UserLogout, move |_| counter.set(counter.get() + 1));
			inner_bus.emit(&ShellEvent::UserLogout);
		});

		bus.emit(&ShellEvent::SearchOpen);
		assert_eq!(hits.get(), 1);
		assert_eq!(bus.listener_count(Topic::UserLogout), 1);
	}

	#[rstest]
	#[case(Topic::SidebarToggle, "sidebar:toggle")]
	#[case(Topic::SidebarExpandedChanged, "sidebar:expanded-changed")]
	#[case(Topic::TopBarScroll, "topbar:scroll")]
	#[case(Topic::FormSidebarContent, "form-sidebar:content")]
	#[case(Topic::FormSidebarToggle, "form-sidebar:toggle")]
	#[case(Topic::UserLogout, "user:logout")]
	#[case(Topic::SearchOpen, "search:open")]
	#[case(Topic::SearchClose, "search:close")]
	fn test_topic_names(#[case] topic: Topic, #[case] name: &str) {
		assert_eq!(topic.to_string(), name);
	}
}
