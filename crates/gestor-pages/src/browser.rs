//! Browser event wiring (WASM only).
//!
//! Converts DOM events into calls on the shell. Every listener lives for
//! the lifetime of the page.

use std::cell::Cell;
use std::rc::Rc;

use gestor_auth::IdentityProvider;
use gestor_core::spawn::spawn_local;
use gestor_core::{Node, ShellSettings, debug_log, error_log};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Element, Event, EventTarget, KeyboardEvent, TouchEvent};

use crate::app::Platform;
use crate::error::ShellError;
use crate::interaction::{KeyPress, UiAction};
use crate::router::Route;
use crate::shell::Shell;

/// Document event that opens the form panel. `detail` is
/// `{ title: string, content?: Node, html?: string }`; a `content` node is
/// mounted as is, otherwise `html` is parsed.
pub const FORM_SIDEBAR_OPEN_EVENT: &str = "formSidebar:open";
/// Document event that closes the form panel.
pub const FORM_SIDEBAR_CLOSE_EVENT: &str = "formSidebar:close";

/// Builds a shell on the running browser and starts it.
pub fn launch(settings: ShellSettings, provider: Rc<dyn IdentityProvider>, routes: Vec<Route>) {
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();

	let shell = Shell::new(settings, Platform::browser(), provider, routes);
	spawn_local(async move {
		if let Err(e) = shell.start().await {
			error_log!("Shell failed to start: {}", e);
		}
	});
}

/// Installs the window and document listeners for `shell`.
pub(crate) fn attach(shell: &Shell) -> Result<(), ShellError> {
	let window = web_sys::window().ok_or_else(|| ShellError::Unavailable("window".to_string()))?;
	let document = window
		.document()
		.ok_or_else(|| ShellError::Unavailable("document".to_string()))?;
	let root_id = &shell.app().settings().navigation.root_id;
	let root = document
		.get_element_by_id(root_id)
		.ok_or_else(|| ShellError::RootMissing(root_id.clone()))?;

	let router = Rc::clone(shell.router());
	listen(&window, "hashchange", move |_| {
		let router = Rc::clone(&router);
		spawn_local(async move {
			router.handle_location_change().await;
		});
	});

	let template = shell.template().clone();
	listen(&window, "resize", move |_| template.handle_resize());

	let template = shell.template().clone();
	listen(&root, "click", move |event| {
		let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
			return;
		};
		let Ok(Some(source)) = target.closest("[data-action]") else {
			return;
		};
		let Some(name) = source.get_attribute("data-action") else {
			return;
		};
		let item_id = source.get_attribute("data-item-id");
		match UiAction::parse(&name, item_id.as_deref()) {
			Some(action) => {
				// Links keep their default behaviour and change the hash.
				if source.tag_name() != "A" {
					event.prevent_default();
				}
				template.dispatch(action);
			}
			None => debug_log!("Unknown data-action '{}'", name),
		}
	});

	let template = shell.template().clone();
	listen(&document, "keydown", move |event| {
		let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
			return;
		};
		let press = KeyPress {
			key: event.key(),
			ctrl: event.ctrl_key(),
			meta: event.meta_key(),
		};
		if template.keyboard().handle(&press) {
			event.prevent_default();
		}
	});

	let template = shell.template().clone();
	listen(&document, "touchstart", move |event| {
		if let (Some(gestures), Some(x)) = (template.gestures(), touch_x(&event)) {
			gestures.touch_start(x);
		}
	});

	let template = shell.template().clone();
	listen(&document, "touchend", move |event| {
		if let (Some(gestures), Some(x)) = (template.gestures(), touch_x(&event)) {
			gestures.touch_end(x);
		}
	});

	let scroll = shell.template().scroll().clone();
	let ticking = Rc::new(Cell::new(false));
	let frame_window = window.clone();
	listen(&window, "scroll", move |_| {
		if ticking.replace(true) {
			return;
		}
		let scroll = scroll.clone();
		let done = Rc::clone(&ticking);
		let frame = Closure::once_into_js(move || {
			scroll.on_scroll();
			done.set(false);
		});
		if frame_window
			.request_animation_frame(frame.unchecked_ref())
			.is_err()
		{
			ticking.set(false);
		}
	});

	let app = shell.app().clone();
	listen(&document, FORM_SIDEBAR_OPEN_EVENT, move |event| {
		let Some(event) = event.dyn_ref::<CustomEvent>() else {
			return;
		};
		let detail = event.detail();
		let title = detail_string(&detail, "title").unwrap_or_default();
		let content = match detail_node(&detail, "content") {
			Some(node) => Node::Live(node),
			None => Node::Html(detail_string(&detail, "html").unwrap_or_default()),
		};
		app.open_form_sidebar(title, content);
	});

	let app = shell.app().clone();
	listen(&document, FORM_SIDEBAR_CLOSE_EVENT, move |_| app.close_form_sidebar());

	debug_log!("Browser listeners installed");
	Ok(())
}

fn listen(target: &EventTarget, name: &str, handler: impl FnMut(Event) + 'static) {
	let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
	if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
		error_log!("Cannot listen to '{}': {:?}", name, e);
	}
	closure.forget(); // Keep closure alive
}

fn touch_x(event: &Event) -> Option<f64> {
	let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
	Some(f64::from(touch.screen_x()))
}

fn detail_string(detail: &JsValue, key: &str) -> Option<String> {
	js_sys::Reflect::get(detail, &JsValue::from_str(key))
		.ok()?
		.as_string()
}

fn detail_node(detail: &JsValue, key: &str) -> Option<web_sys::Node> {
	js_sys::Reflect::get(detail, &JsValue::from_str(key))
		.ok()?
		.dyn_into::<web_sys::Node>()
		.ok()
}
