//! DOM abstraction.
//!
//! The shell only ever touches the document through [`Dom`]: mounting
//! [`Node`] trees under an element id, replacing them, and toggling classes
//! and inline styles. Two backends exist:
//!
//! - [`MemoryDom`]: an in-memory tree, available on every target and used
//!   by tests and headless hosts
//! - [`WebDom`] (WASM only): the live `document`

use std::cell::{Cell, RefCell};

use crate::error::DomError;
use crate::markup::{Element, Node};

/// Operations the shell performs on the document.
///
/// Elements are addressed by id. Methods that target a single element
/// return [`DomError::NotFound`] when the id is absent; bulk operations
/// return how many elements they touched.
pub trait Dom {
	/// Returns true if an element with `id` exists.
	fn contains(&self, id: &str) -> bool;

	/// Replaces the children of `id`.
	fn set_children(&self, id: &str, children: Vec<Node>) -> Result<(), DomError>;

	/// Appends a child to `parent_id`.
	fn append_child(&self, parent_id: &str, node: Node) -> Result<(), DomError>;

	/// Replaces the element `id` (including itself) with `node`.
	fn replace(&self, id: &str, node: Node) -> Result<(), DomError>;

	/// Removes the element `id`. Returns false if it did not exist.
	fn remove(&self, id: &str) -> bool;

	/// Replaces the content of `id` with text.
	fn set_text(&self, id: &str, text: &str) -> Result<(), DomError>;

	/// Returns an attribute of `id`.
	fn attribute(&self, id: &str, name: &str) -> Option<String>;

	/// Adds (`enabled`) or removes a class on `id`.
	fn set_class(&self, id: &str, class: &str, enabled: bool) -> Result<(), DomError>;

	/// Returns true if `id` exists and carries `class`.
	fn has_class(&self, id: &str, class: &str) -> bool;

	/// Sets (`Some`) or clears (`None`) an inline style property of `id`.
	fn set_style(&self, id: &str, property: &str, value: Option<&str>) -> Result<(), DomError>;

	/// Removes `class` from every element carrying it.
	fn remove_class_everywhere(&self, class: &str) -> usize;

	/// Adds `class` to every element whose `attr` equals `value`.
	fn add_class_where_attr(&self, attr: &str, value: &str, class: &str) -> usize;

	/// Sets `document.title`.
	fn set_document_title(&self, title: &str);

	/// Returns `document.title`.
	fn document_title(&self) -> String;

	/// Locks or releases scrolling of the document body.
	fn set_body_scroll_locked(&self, locked: bool);

	/// Moves keyboard focus to `id`.
	fn focus(&self, id: &str) -> Result<(), DomError>;
}

/// In-memory document rooted at a single element.
#[derive(Debug)]
pub struct MemoryDom {
	root: RefCell<Element>,
	title: RefCell<String>,
	body_locked: Cell<bool>,
	focused: RefCell<Option<String>>,
}

impl MemoryDom {
	/// Creates a document whose root is an empty `<div id="{root_id}">`.
	pub fn new(root_id: &str) -> Self {
		Self {
			root: RefCell::new(Element::new("div").id(root_id)),
			title: RefCell::new(String::new()),
			body_locked: Cell::new(false),
			focused: RefCell::new(None),
		}
	}

	/// Returns a copy of the element `id`.
	pub fn element(&self, id: &str) -> Option<Element> {
		find(&self.root.borrow(), id).cloned()
	}

	/// Returns the text content of the element `id`.
	pub fn text(&self, id: &str) -> Option<String> {
		find(&self.root.borrow(), id).map(Element::text_content)
	}

	/// Returns an inline style value of the element `id`.
	pub fn style(&self, id: &str, property: &str) -> Option<String> {
		find(&self.root.borrow(), id)
			.and_then(|el| el.get_style(property))
			.map(str::to_string)
	}

	/// Returns copies of every element carrying `class`, in document order.
	pub fn elements_with_class(&self, class: &str) -> Vec<Element> {
		let mut found = Vec::new();
		walk(&self.root.borrow(), &mut |el| {
			if el.has_class(class) {
				found.push(el.clone());
			}
		});
		found
	}

	/// Returns true while the body scroll lock is held.
	pub fn is_body_scroll_locked(&self) -> bool {
		self.body_locked.get()
	}

	/// Id of the element that last received focus, if it still exists.
	pub fn focused(&self) -> Option<String> {
		self.focused
			.borrow()
			.clone()
			.filter(|id| self.contains(id))
	}

	/// Renders the whole document as HTML.
	pub fn render_to_string(&self) -> String {
		self.root.borrow().render_to_string()
	}

	fn with_element<R>(
		&self,
		id: &str,
		f: impl FnOnce(&mut Element) -> R,
	) -> Result<R, DomError> {
		let mut root = self.root.borrow_mut();
		find_mut(&mut root, id)
			.map(f)
			.ok_or_else(|| DomError::NotFound(id.to_string()))
	}
}

impl Dom for MemoryDom {
	fn contains(&self, id: &str) -> bool {
		find(&self.root.borrow(), id).is_some()
	}

	fn set_children(&self, id: &str, children: Vec<Node>) -> Result<(), DomError> {
		self.with_element(id, |el| *el.child_nodes_mut() = children)
	}

	fn append_child(&self, parent_id: &str, node: Node) -> Result<(), DomError> {
		self.with_element(parent_id, |el| el.child_nodes_mut().push(node))
	}

	fn replace(&self, id: &str, node: Node) -> Result<(), DomError> {
		let mut root = self.root.borrow_mut();
		if root.element_id() == Some(id) {
			return match node {
				Node::Element(el) => {
					*root = el;
					Ok(())
				}
				_ => Err(DomError::Operation(
					"the document root must be an element".to_string(),
				)),
			};
		}
		replace_in(&mut root, id, node).map_err(|_| DomError::NotFound(id.to_string()))
	}

	fn remove(&self, id: &str) -> bool {
		remove_in(&mut self.root.borrow_mut(), id)
	}

	fn set_text(&self, id: &str, text: &str) -> Result<(), DomError> {
		self.with_element(id, |el| el.set_text(text))
	}

	fn attribute(&self, id: &str, name: &str) -> Option<String> {
		find(&self.root.borrow(), id).and_then(|el| el.get_attr(name).map(|v| v.into_owned()))
	}

	fn set_class(&self, id: &str, class: &str, enabled: bool) -> Result<(), DomError> {
		self.with_element(id, |el| {
			el.set_class(class, enabled);
		})
	}

	fn has_class(&self, id: &str, class: &str) -> bool {
		find(&self.root.borrow(), id).is_some_and(|el| el.has_class(class))
	}

	fn set_style(&self, id: &str, property: &str, value: Option<&str>) -> Result<(), DomError> {
		self.with_element(id, |el| el.set_style(property, value))
	}

	fn remove_class_everywhere(&self, class: &str) -> usize {
		let mut count = 0;
		walk_mut(&mut self.root.borrow_mut(), &mut |el| {
			if el.set_class(class, false) {
				count += 1;
			}
		});
		count
	}

	fn add_class_where_attr(&self, attr: &str, value: &str, class: &str) -> usize {
		let mut count = 0;
		walk_mut(&mut self.root.borrow_mut(), &mut |el| {
			if el.get_attr(attr).as_deref() == Some(value) {
				el.set_class(class, true);
				count += 1;
			}
		});
		count
	}

	fn set_document_title(&self, title: &str) {
		*self.title.borrow_mut() = title.to_string();
	}

	fn document_title(&self) -> String {
		self.title.borrow().clone()
	}

	fn set_body_scroll_locked(&self, locked: bool) {
		self.body_locked.set(locked);
	}

	fn focus(&self, id: &str) -> Result<(), DomError> {
		if !self.contains(id) {
			return Err(DomError::NotFound(id.to_string()));
		}
		*self.focused.borrow_mut() = Some(id.to_string());
		Ok(())
	}
}

fn find<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
	if el.element_id() == Some(id) {
		return Some(el);
	}
	el.child_nodes()
		.iter()
		.filter_map(Node::as_element)
		.find_map(|child| find(child, id))
}

fn find_mut<'a>(el: &'a mut Element, id: &str) -> Option<&'a mut Element> {
	if el.element_id() == Some(id) {
		return Some(el);
	}
	for child in el.child_nodes_mut().iter_mut() {
		if let Node::Element(child) = child
			&& let Some(found) = find_mut(child, id)
		{
			return Some(found);
		}
	}
	None
}

fn position_of(children: &[Node], id: &str) -> Option<usize> {
	children
		.iter()
		.position(|n| n.as_element().and_then(Element::element_id) == Some(id))
}

// Hands the node back when `id` is not found so the search can continue.
fn replace_in(el: &mut Element, id: &str, node: Node) -> Result<(), Node> {
	let children = el.child_nodes_mut();
	if let Some(index) = position_of(children, id) {
		children[index] = node;
		return Ok(());
	}
	let mut node = node;
	for child in children.iter_mut() {
		if let Node::Element(child) = child {
			match replace_in(child, id, node) {
				Ok(()) => return Ok(()),
				Err(back) => node = back,
			}
		}
	}
	Err(node)
}

fn remove_in(el: &mut Element, id: &str) -> bool {
	let children = el.child_nodes_mut();
	if let Some(index) = position_of(children, id) {
		children.remove(index);
		return true;
	}
	children.iter_mut().any(|child| match child {
		Node::Element(child) => remove_in(child, id),
		_ => false,
	})
}

fn walk(el: &Element, f: &mut dyn FnMut(&Element)) {
	f(el);
	for child in el.child_nodes().iter().filter_map(Node::as_element) {
		walk(child, f);
	}
}

fn walk_mut(el: &mut Element, f: &mut dyn FnMut(&mut Element)) {
	f(el);
	for child in el.child_nodes_mut().iter_mut() {
		if let Node::Element(child) = child {
			walk_mut(child, f);
		}
	}
}

/// The live browser document.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct WebDom;

#[cfg(target_arch = "wasm32")]
mod web {
	use wasm_bindgen::JsCast;
	use web_sys::{Document, HtmlElement};

	use super::*;
	use crate::debug_log;

	fn document() -> Result<Document, DomError> {
		web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| DomError::Operation("no document available".to_string()))
	}

	fn element(id: &str) -> Result<web_sys::Element, DomError> {
		document()?
			.get_element_by_id(id)
			.ok_or_else(|| DomError::NotFound(id.to_string()))
	}

	fn operation(value: wasm_bindgen::JsValue) -> DomError {
		DomError::Operation(
			value
				.as_string()
				.unwrap_or_else(|| format!("{:?}", value)),
		)
	}

	fn html_element(id: &str) -> Result<HtmlElement, DomError> {
		element(id)?
			.dyn_into::<HtmlElement>()
			.map_err(|_| DomError::Operation(format!("#{} is not an HTML element", id)))
	}

	// Plain trees go in as markup. Trees holding live nodes are built
	// element by element so the live nodes are attached, not serialized.
	fn mount(parent: &web_sys::Element, node: &Node) -> Result<(), DomError> {
		match node {
			Node::Live(live) => parent.append_child(live).map(|_| ()).map_err(operation),
			Node::Element(el) if node.contains_live() => parent
				.append_child(&build(el)?)
				.map(|_| ())
				.map_err(operation),
			_ => parent
				.insert_adjacent_html("beforeend", &node.render_to_string())
				.map_err(operation),
		}
	}

	fn build(el: &Element) -> Result<web_sys::Element, DomError> {
		let built = document()?.create_element(el.tag()).map_err(operation)?;
		for (name, value) in el.attributes() {
			built.set_attribute(name, &value).map_err(operation)?;
		}
		for child in el.child_nodes() {
			mount(&built, child)?;
		}
		Ok(built)
	}

	// Attribute selectors need the value quoted; quotes and backslashes are escaped.
	fn attr_selector(attr: &str, value: &str) -> String {
		let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
		format!("[{}=\"{}\"]", attr, escaped)
	}

	fn select_all(selector: &str) -> Vec<web_sys::Element> {
		let Ok(list) = document().and_then(|d| d.query_selector_all(selector).map_err(operation))
		else {
			return Vec::new();
		};
		(0..list.length())
			.filter_map(|i| list.get(i))
			.filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
			.collect()
	}

	impl WebDom {
		/// Creates a handle to the current document.
		pub fn new() -> Self {
			Self
		}
	}

	impl Dom for WebDom {
		fn contains(&self, id: &str) -> bool {
			element(id).is_ok()
		}

		fn set_children(&self, id: &str, children: Vec<Node>) -> Result<(), DomError> {
			let el = element(id)?;
			el.set_inner_html("");
			children.iter().try_for_each(|child| mount(&el, child))
		}

		fn append_child(&self, parent_id: &str, node: Node) -> Result<(), DomError> {
			mount(&element(parent_id)?, &node)
		}

		fn replace(&self, id: &str, node: Node) -> Result<(), DomError> {
			let target = element(id)?;
			match &node {
				Node::Live(live) => target.replace_with_with_node_1(live).map_err(operation),
				Node::Element(el) if node.contains_live() => target
					.replace_with_with_node_1(&build(el)?)
					.map_err(operation),
				_ => {
					target.set_outer_html(&node.render_to_string());
					Ok(())
				}
			}
		}

		fn remove(&self, id: &str) -> bool {
			match element(id) {
				Ok(el) => {
					el.remove();
					true
				}
				Err(_) => false,
			}
		}

		fn set_text(&self, id: &str, text: &str) -> Result<(), DomError> {
			element(id)?.set_text_content(Some(text));
			Ok(())
		}

		fn attribute(&self, id: &str, name: &str) -> Option<String> {
			element(id).ok().and_then(|el| el.get_attribute(name))
		}

		fn set_class(&self, id: &str, class: &str, enabled: bool) -> Result<(), DomError> {
			element(id)?
				.class_list()
				.toggle_with_force(class, enabled)
				.map(|_| ())
				.map_err(operation)
		}

		fn has_class(&self, id: &str, class: &str) -> bool {
			element(id).is_ok_and(|el| el.class_list().contains(class))
		}

		fn set_style(
			&self,
			id: &str,
			property: &str,
			value: Option<&str>,
		) -> Result<(), DomError> {
			let style = html_element(id)?.style();
			match value {
				Some(value) => style.set_property(property, value).map_err(operation),
				None => style.remove_property(property).map(|_| ()).map_err(operation),
			}
		}

		fn remove_class_everywhere(&self, class: &str) -> usize {
			let found = select_all(&format!(".{}", class));
			for el in &found {
				if let Err(e) = el.class_list().remove_1(class) {
					debug_log!("Could not remove class '{}': {:?}", class, e);
				}
			}
			found.len()
		}

		fn add_class_where_attr(&self, attr: &str, value: &str, class: &str) -> usize {
			let found = select_all(&attr_selector(attr, value));
			for el in &found {
				if let Err(e) = el.class_list().add_1(class) {
					debug_log!("Could not add class '{}': {:?}", class, e);
				}
			}
			found.len()
		}

		fn set_document_title(&self, title: &str) {
			if let Ok(doc) = document() {
				doc.set_title(title);
			}
		}

		fn document_title(&self) -> String {
			document().map(|d| d.title()).unwrap_or_default()
		}

		fn set_body_scroll_locked(&self, locked: bool) {
			if let Some(body) = document().ok().and_then(|d| d.body()) {
				let style = body.style();
				let result = if locked {
					style.set_property("overflow", "hidden")
				} else {
					style.remove_property("overflow").map(|_| ())
				};
				if let Err(e) = result {
					debug_log!("Could not update body overflow: {:?}", e);
				}
			}
		}

		fn focus(&self, id: &str) -> Result<(), DomError> {
			html_element(id)?.focus().map_err(operation)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::markup::html::{a, aside, div, main};
	use rstest::{fixture, rstest};

	#[fixture]
	fn dom() -> MemoryDom {
		let dom = MemoryDom::new("app");
		dom.set_children(
			"app",
			vec![
				aside()
					.id("sidebar")
					.class("sidebar")
					.child(a().id("nav-dashboard").attr("href", "#/dashboard").class("sidebar-item"))
					.child(a().id("nav-clients").attr("href", "#/clientes").class("sidebar-item sidebar-item--active"))
					.into(),
				main().id("main-content").into(),
			],
		)
		.unwrap();
		dom
	}

	#[rstest]
	fn test_lookup_and_text(dom: MemoryDom) {
		assert!(dom.contains("main-content"));
		assert!(!dom.contains("missing"));
		dom.set_text("main-content", "Cargando...").unwrap();
		assert_eq!(dom.text("main-content").as_deref(), Some("Cargando..."));
	}

	#[rstest]
	fn test_missing_element_is_not_found(dom: MemoryDom) {
		assert_eq!(
			dom.set_class("missing", "open", true),
			Err(DomError::NotFound("missing".to_string()))
		);
	}

	#[rstest]
	fn test_replace_keeps_position(dom: MemoryDom) {
		dom.replace("sidebar", aside().id("sidebar").class("sidebar sidebar--collapsed").into())
			.unwrap();
		assert!(dom.has_class("sidebar", "sidebar--collapsed"));
		let root = dom.element("app").unwrap();
		assert_eq!(root.child_nodes().len(), 2);
		assert_eq!(
			root.child_nodes()[0].as_element().and_then(Element::element_id),
			Some("sidebar")
		);
	}

	#[rstest]
	fn test_replace_root(dom: MemoryDom) {
		dom.replace("app", div().id("app").text("vacío").into()).unwrap();
		assert_eq!(dom.text("app").as_deref(), Some("vacío"));
		assert!(dom.replace("app", Node::text("x")).is_err());
	}

	#[rstest]
	fn test_remove(dom: MemoryDom) {
		assert!(dom.remove("nav-clients"));
		assert!(!dom.remove("nav-clients"));
		assert!(!dom.contains("nav-clients"));
	}

	#[rstest]
	fn test_active_marker_moves(dom: MemoryDom) {
		assert_eq!(dom.remove_class_everywhere("sidebar-item--active"), 1);
		assert_eq!(
			dom.add_class_where_attr("href", "#/dashboard", "sidebar-item--active"),
			1
		);
		assert!(dom.has_class("nav-dashboard", "sidebar-item--active"));
		assert!(!dom.has_class("nav-clients", "sidebar-item--active"));
	}

	#[rstest]
	fn test_styles_and_body_lock(dom: MemoryDom) {
		dom.set_style("main-content", "margin-left", Some("300px")).unwrap();
		assert_eq!(dom.style("main-content", "margin-left").as_deref(), Some("300px"));
		dom.set_style("main-content", "margin-left", None).unwrap();
		assert_eq!(dom.style("main-content", "margin-left"), None);

		dom.set_body_scroll_locked(true);
		assert!(dom.is_body_scroll_locked());
	}

	#[rstest]
	fn test_attribute_and_title(dom: MemoryDom) {
		assert_eq!(dom.attribute("nav-clients", "href").as_deref(), Some("#/clientes"));
		dom.set_document_title("Clientes - Mi SaaS");
		assert_eq!(dom.document_title(), "Clientes - Mi SaaS");
	}

	#[rstest]
	fn test_focus_follows_the_element(dom: MemoryDom) {
		assert_eq!(dom.focus("missing"), Err(DomError::NotFound("missing".to_string())));
		dom.focus("nav-clients").unwrap();
		assert_eq!(dom.focused().as_deref(), Some("nav-clients"));

		dom.remove("nav-clients");
		assert_eq!(dom.focused(), None);
	}
}
