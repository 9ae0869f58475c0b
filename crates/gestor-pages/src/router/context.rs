//! What a page component receives.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use gestor_core::{Dom, DomError, Node};

use crate::app::AppContext;

/// Marks one navigation. Superseded as soon as the next one starts.
#[derive(Clone)]
pub struct NavigationToken {
	epoch: u64,
	current: Rc<Cell<u64>>,
}

impl fmt::Debug for NavigationToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationToken")
			.field("epoch", &self.epoch)
			.field("current", &self.current.get())
			.finish()
	}
}

impl NavigationToken {
	pub(crate) fn new(epoch: u64, current: Rc<Cell<u64>>) -> Self {
		Self { epoch, current }
	}

	/// Epoch of the navigation this token belongs to.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Returns false once a later navigation has started.
	pub fn is_current(&self) -> bool {
		self.current.get() == self.epoch
	}
}

/// The main content element, lent to one navigation.
///
/// Every write checks the token first: once a later navigation has started
/// the container belongs to it, and writes fail with [`DomError::Stale`]
/// without touching the document.
#[derive(Clone)]
pub struct PageContainer {
	dom: Rc<dyn Dom>,
	id: String,
	token: NavigationToken,
}

impl fmt::Debug for PageContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageContainer")
			.field("id", &self.id)
			.field("token", &self.token)
			.finish()
	}
}

impl PageContainer {
	pub(crate) fn new(dom: Rc<dyn Dom>, id: impl Into<String>, token: NavigationToken) -> Self {
		Self {
			dom,
			id: id.into(),
			token,
		}
	}

	/// Element id of the container.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The navigation this container was lent to.
	pub fn token(&self) -> &NavigationToken {
		&self.token
	}

	/// Returns false once the container belongs to a later navigation.
	pub fn is_current(&self) -> bool {
		self.token.is_current()
	}

	fn check(&self) -> Result<(), DomError> {
		if self.token.is_current() {
			Ok(())
		} else {
			Err(DomError::Stale)
		}
	}

	/// Replaces the container content with `node`.
	pub fn set_content(&self, node: impl Into<Node>) -> Result<(), DomError> {
		self.set_children(vec![node.into()])
	}

	/// Replaces the container content.
	pub fn set_children(&self, children: Vec<Node>) -> Result<(), DomError> {
		self.check()?;
		self.dom.set_children(&self.id, children)
	}

	/// Appends `node` to the container.
	pub fn append(&self, node: impl Into<Node>) -> Result<(), DomError> {
		self.check()?;
		self.dom.append_child(&self.id, node.into())
	}

	/// Empties the container.
	pub fn clear(&self) -> Result<(), DomError> {
		self.set_children(Vec::new())
	}
}

/// Argument of every page component.
#[derive(Clone)]
pub struct PageContext {
	/// Shared application services.
	pub app: AppContext,
	/// Where the page renders.
	pub container: PageContainer,
	/// Values of the route's `:name` segments.
	pub params: HashMap<String, String>,
	/// Decoded `?key=value` pairs of the fragment.
	pub query: HashMap<String, String>,
	/// The matched path, without query.
	pub path: String,
}

impl fmt::Debug for PageContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageContext")
			.field("path", &self.path)
			.field("params", &self.params)
			.field("query", &self.query)
			.field("container", &self.container)
			.finish()
	}
}

impl PageContext {
	/// A path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// A query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query.get(name).map(String::as_str)
	}
}
