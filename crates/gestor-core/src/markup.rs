//! Element tree used to describe chrome and page content.
//!
//! A [`Node`] is plain data: it can be rendered to an HTML string (what the
//! browser backend injects) or held and inspected by [`MemoryDom`](crate::MemoryDom).
//! Behaviour is attached through `data-action` attributes rather than
//! closures, so the same tree works in both places.
//!
//! ## Example
//!
//! ```
//! use gestor_core::markup::html::{button, div};
//!
//! let panel = div()
//! 	.id("form-sidebar")
//! 	.class("form-sidebar")
//! 	.child(button().attr("data-action", "close-form-sidebar").text("×"));
//!
//! assert_eq!(
//! 	panel.render_to_string(),
//! 	"<div id=\"form-sidebar\" class=\"form-sidebar\"><button data-action=\"close-form-sidebar\">×</button></div>"
//! );
//! ```

use std::borrow::Cow;

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// An element with attributes and children.
	Element(Element),
	/// Escaped text.
	Text(String),
	/// Trusted, already rendered markup. Emitted verbatim.
	Html(String),
	/// A node built by page code against the browser document. Mounted as
	/// is, so its listeners and state survive.
	#[cfg(target_arch = "wasm32")]
	Live(web_sys::Node),
}

impl Node {
	/// Creates a text node.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Returns the element, if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(el) => Some(el),
			_ => None,
		}
	}

	/// Concatenated text of this node and its descendants.
	pub fn text_content(&self) -> String {
		match self {
			Self::Element(el) => el.text_content(),
			Self::Text(text) | Self::Html(text) => text.clone(),
			#[cfg(target_arch = "wasm32")]
			Self::Live(node) => node.text_content().unwrap_or_default(),
		}
	}

	/// Returns true if this node is, or contains, a [`Node::Live`].
	#[cfg(target_arch = "wasm32")]
	pub(crate) fn contains_live(&self) -> bool {
		match self {
			Self::Live(_) => true,
			Self::Element(el) => el.child_nodes().iter().any(Node::contains_live),
			Self::Text(_) | Self::Html(_) => false,
		}
	}

	/// Renders the node as HTML.
	pub fn render_to_string(&self) -> String {
		let mut out = String::new();
		self.render_into(&mut out);
		out
	}

	fn render_into(&self, out: &mut String) {
		match self {
			Self::Element(el) => el.render_into(out),
			Self::Text(text) => out.push_str(&html_escape(text)),
			Self::Html(html) => out.push_str(html),
			// Only a snapshot; mounting through the DOM keeps the node itself.
			#[cfg(target_arch = "wasm32")]
			Self::Live(node) => {
				use wasm_bindgen::JsCast;
				match node.dyn_ref::<web_sys::Element>() {
					Some(el) => out.push_str(&el.outer_html()),
					None => out.push_str(&html_escape(&node.text_content().unwrap_or_default())),
				}
			}
		}
	}
}

impl From<Element> for Node {
	fn from(el: Element) -> Self {
		Self::Element(el)
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// An element: tag, attributes, classes, inline styles and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
	tag: String,
	attrs: Vec<(String, String)>,
	classes: Vec<String>,
	styles: Vec<(String, String)>,
	children: Vec<Node>,
}

impl Element {
	/// Creates an empty element.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			..Self::default()
		}
	}

	/// Sets the `id` attribute.
	pub fn id(self, id: impl Into<String>) -> Self {
		self.attr("id", id)
	}

	/// Sets an attribute, replacing a previous value.
	///
	/// `class` and `style` are routed to [`class`](Self::class) and
	/// [`style`](Self::style) parsing so they stay individually editable.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set_attr(name, value);
		self
	}

	/// Sets an attribute when `value` is present.
	pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
		match value {
			Some(value) => self.attr(name, value),
			None => self,
		}
	}

	/// Adds one or more space-separated classes.
	pub fn class(mut self, classes: &str) -> Self {
		for class in classes.split_whitespace() {
			self.set_class(class, true);
		}
		self
	}

	/// Adds a class when `condition` holds.
	pub fn class_if(self, class: &str, condition: bool) -> Self {
		if condition { self.class(class) } else { self }
	}

	/// Sets an inline style property.
	pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
		let value = value.into();
		self.set_style(&property.into(), Some(&value));
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Appends a child when present.
	pub fn child_opt(self, child: Option<impl Into<Node>>) -> Self {
		match child {
			Some(child) => self.child(child),
			None => self,
		}
	}

	/// Appends several children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	/// Appends a text child.
	pub fn text(self, text: impl Into<String>) -> Self {
		self.child(Node::Text(text.into()))
	}

	/// Returns the tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Returns an attribute value (`class` and `style` are serialized).
	pub fn get_attr(&self, name: &str) -> Option<Cow<'_, str>> {
		match name {
			"class" if !self.classes.is_empty() => Some(Cow::Owned(self.classes.join(" "))),
			"style" if !self.styles.is_empty() => Some(Cow::Owned(self.style_string())),
			_ => self
				.attrs
				.iter()
				.find(|(k, _)| k == name)
				.map(|(_, v)| Cow::Borrowed(v.as_str())),
		}
	}

	/// Returns the `id` attribute.
	pub fn element_id(&self) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(k, _)| k == "id")
			.map(|(_, v)| v.as_str())
	}

	/// Returns true if the element carries `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}

	/// Returns the classes in insertion order.
	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	/// Returns an inline style value.
	pub fn get_style(&self, property: &str) -> Option<&str> {
		self.styles
			.iter()
			.find(|(k, _)| k == property)
			.map(|(_, v)| v.as_str())
	}

	/// Returns the children.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Returns the children mutably.
	pub fn child_nodes_mut(&mut self) -> &mut Vec<Node> {
		&mut self.children
	}

	/// Sets an attribute in place.
	pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match name.as_str() {
			"class" => {
				self.classes.clear();
				for class in value.split_whitespace() {
					self.set_class(class, true);
				}
			}
			"style" => {
				self.styles.clear();
				for decl in value.split(';') {
					if let Some((k, v)) = decl.split_once(':') {
						self.set_style(k.trim(), Some(v.trim()));
					}
				}
			}
			_ => match self.attrs.iter_mut().find(|(k, _)| *k == name) {
				Some(slot) => slot.1 = value,
				None => self.attrs.push((name, value)),
			},
		}
	}

	/// Adds or removes a class in place. Returns true if the element changed.
	pub fn set_class(&mut self, class: &str, enabled: bool) -> bool {
		let present = self.has_class(class);
		match (present, enabled) {
			(false, true) => {
				self.classes.push(class.to_string());
				true
			}
			(true, false) => {
				self.classes.retain(|c| c != class);
				true
			}
			_ => false,
		}
	}

	/// Sets (`Some`) or removes (`None`) an inline style property in place.
	pub fn set_style(&mut self, property: &str, value: Option<&str>) {
		match value {
			Some(value) => match self.styles.iter_mut().find(|(k, _)| k == property) {
				Some(slot) => slot.1 = value.to_string(),
				None => self
					.styles
					.push((property.to_string(), value.to_string())),
			},
			None => self.styles.retain(|(k, _)| k != property),
		}
	}

	/// Replaces every child with a single text node.
	pub fn set_text(&mut self, text: impl Into<String>) {
		self.children = vec![Node::Text(text.into())];
	}

	/// Concatenated text of the descendants.
	pub fn text_content(&self) -> String {
		self.children.iter().map(Node::text_content).collect()
	}

	/// Renders the element as HTML.
	pub fn render_to_string(&self) -> String {
		let mut out = String::new();
		self.render_into(&mut out);
		out
	}

	fn style_string(&self) -> String {
		self.styles
			.iter()
			.map(|(k, v)| format!("{}: {}", k, v))
			.collect::<Vec<_>>()
			.join("; ")
	}

	/// Every attribute in render order: `id` first, then class and style,
	/// then the rest in insertion order.
	pub fn attributes(&self) -> Vec<(&str, Cow<'_, str>)> {
		let mut attrs = Vec::with_capacity(self.attrs.len() + 2);
		if let Some(id) = self.element_id() {
			attrs.push(("id", Cow::Borrowed(id)));
		}
		if !self.classes.is_empty() {
			attrs.push(("class", Cow::Owned(self.classes.join(" "))));
		}
		if !self.styles.is_empty() {
			attrs.push(("style", Cow::Owned(self.style_string())));
		}
		attrs.extend(
			self.attrs
				.iter()
				.filter(|(k, _)| k != "id")
				.map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str()))),
		);
		attrs
	}

	fn render_into(&self, out: &mut String) {
		out.push('<');
		out.push_str(&self.tag);
		for (name, value) in self.attributes() {
			push_attr(out, name, &value);
		}
		out.push('>');

		if VOID_ELEMENTS.contains(&self.tag.as_str()) {
			return;
		}

		for child in &self.children {
			child.render_into(out);
		}
		out.push_str("</");
		out.push_str(&self.tag);
		out.push('>');
	}
}

fn push_attr(out: &mut String, name: &str, value: &str) {
	out.push(' ');
	out.push_str(name);
	out.push_str("=\"");
	out.push_str(&html_escape(value));
	out.push('"');
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Shorthand constructors for the elements the shell uses.
pub mod html {
	use super::Element;

	macro_rules! elements {
		($($name:ident),* $(,)?) => {
			$(
				#[doc = concat!("Creates a `<", stringify!($name), ">` element.")]
				pub fn $name() -> Element {
					Element::new(stringify!($name))
				}
			)*
		};
	}

	elements!(
		a, aside, button, div, footer, h1, h2, header, img, input, kbd, main, nav, p, span, strong
	);
}

#[cfg(test)]
mod tests {
	use super::html::{div, img, span};
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_render_escapes_text_and_attributes() {
		let el = div()
			.attr("title", "a \"quoted\" <value>")
			.text("Tom & Jerry <script>");
		assert_eq!(
			el.render_to_string(),
			"<div title=\"a &quot;quoted&quot; &lt;value&gt;\">Tom &amp; Jerry &lt;script&gt;</div>"
		);
	}

	#[rstest]
	fn test_html_node_is_not_escaped() {
		let el = div().child(Node::Html("<b>ok</b>".to_string()));
		assert_eq!(el.render_to_string(), "<div><b>ok</b></div>");
	}

	#[rstest]
	fn test_void_element_has_no_closing_tag() {
		let el = img().attr("src", "/a.png").attr("alt", "avatar");
		assert_eq!(el.render_to_string(), "<img src=\"/a.png\" alt=\"avatar\">");
	}

	#[rstest]
	fn test_class_and_style_editing() {
		let mut el = div().class("sidebar sidebar--collapsed").style("margin-left", "80px");
		assert!(el.has_class("sidebar--collapsed"));

		assert!(el.set_class("sidebar--collapsed", false));
		assert!(!el.set_class("sidebar--collapsed", false));
		el.set_style("margin-left", Some("300px"));

		assert_eq!(el.get_attr("class").as_deref(), Some("sidebar"));
		assert_eq!(el.get_style("margin-left"), Some("300px"));

		el.set_style("margin-left", None);
		assert_eq!(el.get_attr("style"), None);
	}

	#[rstest]
	fn test_class_attr_is_parsed() {
		let el = div().attr("class", "a  b").attr("style", "display: none; color: red");
		assert_eq!(el.classes(), &["a".to_string(), "b".to_string()]);
		assert_eq!(el.get_style("display"), Some("none"));
		assert_eq!(el.get_style("color"), Some("red"));
	}

	#[rstest]
	fn test_text_content_is_recursive() {
		let el = div().text("Hola ").child(span().text("mundo"));
		assert_eq!(el.text_content(), "Hola mundo");
	}

	#[rstest]
	fn test_optional_builders() {
		let el = div()
			.attr_opt("data-tooltip", None::<String>)
			.attr_opt("href", Some("#/clientes"))
			.child_opt(None::<Node>)
			.class_if("active", false);
		assert_eq!(el.render_to_string(), "<div href=\"#/clientes\"></div>");
	}

	#[rstest]
	fn test_attributes_follow_render_order() {
		let el = div()
			.attr("data-action", "close-search")
			.class("search-modal-overlay")
			.id("search-modal-overlay")
			.style("display", "none");
		let names: Vec<&str> = el.attributes().iter().map(|(name, _)| *name).collect();
		assert_eq!(names, ["id", "class", "style", "data-action"]);
		assert_eq!(el.attributes()[2].1, "display: none");
	}
}
