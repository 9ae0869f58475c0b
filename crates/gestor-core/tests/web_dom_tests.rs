//! Browser tests for [`WebDom`](gestor_core::WebDom).
//!
//! Run with `wasm-pack test --headless --chrome crates/gestor-core`.

#[cfg(target_arch = "wasm32")]
mod web_dom_tests {
	use gestor_core::markup::html;
	use gestor_core::{Dom, Node, WebDom};
	use wasm_bindgen::JsValue;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn document() -> web_sys::Document {
		web_sys::window().unwrap().document().unwrap()
	}

	fn fresh_root(id: &str) -> web_sys::Element {
		let doc = document();
		if let Some(old) = doc.get_element_by_id(id) {
			old.remove();
		}
		let root = doc.create_element("div").unwrap();
		root.set_id(id);
		doc.body().unwrap().append_child(&root).unwrap();
		root
	}

	// A JS expando survives only if the node itself is attached
	fn marked_button(id: &str) -> web_sys::Element {
		let button = document().create_element("button").unwrap();
		button.set_id(id);
		js_sys::Reflect::set(&button, &JsValue::from_str("marker"), &JsValue::from(7)).unwrap();
		button
	}

	fn marker(id: &str) -> JsValue {
		let el = document().get_element_by_id(id).unwrap();
		js_sys::Reflect::get(&el, &JsValue::from_str("marker")).unwrap()
	}

	#[wasm_bindgen_test]
	fn test_live_node_is_mounted_not_serialized() {
		fresh_root("live-root");
		let dom = WebDom::new();
		let button = marked_button("live-save");

		dom.set_children(
			"live-root",
			vec![
				html::div()
					.id("live-form")
					.class("form-body")
					.child(Node::Live(button.clone().into()))
					.into(),
			],
		)
		.unwrap();

		assert!(dom.has_class("live-form", "form-body"));
		assert_eq!(marker("live-save"), JsValue::from(7));
	}

	#[wasm_bindgen_test]
	fn test_live_node_append_and_replace() {
		fresh_root("live-append");
		let dom = WebDom::new();

		dom.append_child("live-append", html::p().id("live-old").text("antes").into())
			.unwrap();
		dom.replace("live-old", Node::Live(marked_button("live-new").into()))
			.unwrap();
		assert!(!dom.contains("live-old"));
		assert_eq!(marker("live-new"), JsValue::from(7));

		dom.append_child("live-append", Node::Live(marked_button("live-extra").into()))
			.unwrap();
		assert_eq!(marker("live-extra"), JsValue::from(7));
	}

	#[wasm_bindgen_test]
	fn test_focus_moves_to_element() {
		fresh_root("focus-root");
		let dom = WebDom::new();
		dom.set_children(
			"focus-root",
			vec![html::input().id("focus-input").attr("type", "text").into()],
		)
		.unwrap();

		dom.focus("focus-input").unwrap();
		let active = document().active_element().unwrap();
		assert_eq!(active.id(), "focus-input");
	}

	#[wasm_bindgen_test]
	fn test_bulk_class_updates_and_body_lock() {
		fresh_root("bulk-root");
		let dom = WebDom::new();
		dom.set_children(
			"bulk-root",
			vec![
				html::a().id("bulk-a").attr("data-route", "/clientes").into(),
				html::a().id("bulk-b").class("bulk-active").into(),
			],
		)
		.unwrap();

		assert_eq!(dom.remove_class_everywhere("bulk-active"), 1);
		assert!(!dom.has_class("bulk-b", "bulk-active"));
		assert_eq!(dom.add_class_where_attr("data-route", "/clientes", "bulk-active"), 1);
		assert!(dom.has_class("bulk-a", "bulk-active"));

		dom.set_body_scroll_locked(true);
		let body = document().body().unwrap();
		assert_eq!(body.style().get_property_value("overflow").unwrap(), "hidden");
		dom.set_body_scroll_locked(false);
		assert_eq!(body.style().get_property_value("overflow").unwrap(), "");
	}
}
