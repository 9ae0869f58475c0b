//! The Template Manager.
//!
//! Owns the chrome of an authenticated session: topbar, sidebar, the main
//! content container the router renders into, the mobile backdrop, the
//! form panel and the search modal. After [`TemplateManager::init`] it follows the State Manager
//! topics and keeps classes and styles in line with the layout state. Page
//! content is never touched here.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use gestor_auth::UserData;
use gestor_core::markup::html;
use gestor_core::spawn::spawn_local;
use gestor_core::{
	DomError, Element, IntoListenerResult, ListenerResult, Node, ShellEvent, SidebarItem,
	SidebarSubItem, SubscriptionId, Topic, debug_log, info_log,
};

use super::presentation::{apply, present};
use super::sidebar::render_sidebar;
use super::topbar::render_topbar;
use super::{
	EXPANDED_ITEM_CLASS, SIDEBAR_ID, SIDEBAR_OVERLAY_ID, TOPBAR_TITLE_ID, USER_DROPDOWN_ID,
	USER_DROPDOWN_OPEN_CLASS, sidebar_item_id, sidebar_subitems_id,
};
use crate::app::AppContext;
use crate::form_sidebar::FormSidebar;
use crate::interaction::{KeyboardShortcuts, ScrollObserver, TouchGestures, UiAction};
use crate::search_modal::SearchModal;

/// A full-screen loading overlay returned by
/// [`TemplateManager::show_loading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadingHandle(u64);

impl LoadingHandle {
	/// Element id of the overlay.
	pub fn element_id(&self) -> String {
		format!("loading-overlay-{}", self.0)
	}
}

/// Partial update of a sidebar entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarItemPatch {
	/// New label.
	pub label: Option<String>,
	/// New icon.
	pub icon: Option<String>,
	/// New link target.
	pub href: Option<String>,
	/// New tooltip.
	pub tooltip: Option<String>,
	/// New sub-items.
	pub sub_items: Option<Vec<SidebarSubItem>>,
}

impl SidebarItemPatch {
	fn apply_to(self, item: &mut SidebarItem) {
		if let Some(label) = self.label {
			item.label = label;
		}
		if let Some(icon) = self.icon {
			item.icon = icon;
		}
		if let Some(href) = self.href {
			item.href = Some(href);
		}
		if let Some(tooltip) = self.tooltip {
			item.tooltip = Some(tooltip);
		}
		if let Some(sub_items) = self.sub_items {
			item.sub_items = sub_items;
		}
	}
}

struct Inner {
	app: AppContext,
	items: RefCell<Vec<SidebarItem>>,
	title: RefCell<String>,
	user: RefCell<Option<UserData>>,
	subscriptions: RefCell<Vec<(Topic, SubscriptionId)>>,
	mounted: Cell<bool>,
	user_menu_open: Cell<bool>,
	next_loading: Cell<u64>,
	form_sidebar: FormSidebar,
	search_modal: SearchModal,
	keyboard: KeyboardShortcuts,
	scroll: ScrollObserver,
	gestures: RefCell<Option<Rc<TouchGestures>>>,
}

/// The layout manager. Clones share the same chrome.
#[derive(Clone)]
pub struct TemplateManager {
	inner: Rc<Inner>,
}

impl fmt::Debug for TemplateManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TemplateManager")
			.field("mounted", &self.inner.mounted.get())
			.field("items", &self.inner.items.borrow().len())
			.field("title", &self.inner.title.borrow())
			.field("subscriptions", &self.inner.subscriptions.borrow().len())
			.finish()
	}
}

impl TemplateManager {
	/// Creates the manager with the configured sidebar items. Nothing is
	/// rendered until [`init`](Self::init) or [`mount_bare`](Self::mount_bare).
	pub fn new(app: AppContext) -> Self {
		let state = app.state().clone();
		Self {
			inner: Rc::new(Inner {
				items: RefCell::new(app.settings().sidebar.items.clone()),
				title: RefCell::new(String::new()),
				user: RefCell::new(None),
				subscriptions: RefCell::new(Vec::new()),
				mounted: Cell::new(false),
				user_menu_open: Cell::new(false),
				next_loading: Cell::new(0),
				form_sidebar: FormSidebar::new(&app),
				search_modal: SearchModal::new(&app),
				keyboard: KeyboardShortcuts::new(state.clone()),
				scroll: ScrollObserver::new(state, Rc::clone(app.viewport())),
				gestures: RefCell::new(None),
				app,
			}),
		}
	}

	/// Renders the chrome into the root element and starts following the
	/// layout topics.
	///
	/// Running it again (after a new sign-in) re-renders everything with
	/// the current user.
	pub fn init(&self) -> Result<(), DomError> {
		if self.inner.mounted.get() {
			self.unsubscribe_all();
		}
		let app = &self.inner.app;
		let settings = app.settings();
		let state = app.state();
		let is_mobile = state.is_mobile();

		*self.inner.user.borrow_mut() = app.auth().user_data();
		self.inner.user_menu_open.set(false);

		let chrome: Vec<Node> = vec![
			self.render_topbar().into(),
			self.render_sidebar(is_mobile).into(),
			html::main()
				.id(settings.navigation.container_id.as_str())
				.class("main-content")
				.into(),
			html::div()
				.id(SIDEBAR_OVERLAY_ID)
				.class("sidebar-overlay")
				.attr("data-action", "close-sidebar")
				.into(),
			self.inner.form_sidebar.render().into(),
			self.inner.search_modal.render().into(),
		];
		app.dom().set_children(&settings.navigation.root_id, chrome)?;

		self.subscribe_all();
		self.inner.form_sidebar.attach();
		self.inner.search_modal.attach();
		apply(
			app.dom().as_ref(),
			settings,
			&present(&state.snapshot(), is_mobile, settings),
		);

		let gestures = (app.viewport().supports_touch() && is_mobile)
			.then(|| Rc::new(TouchGestures::new(state.clone())));
		*self.inner.gestures.borrow_mut() = gestures;

		self.inner.mounted.set(true);
		info_log!("Template mounted (mobile: {})", is_mobile);
		Ok(())
	}

	/// Mounts only the main content container, for visitors without a
	/// session.
	pub fn mount_bare(&self) -> Result<(), DomError> {
		let navigation = &self.inner.app.settings().navigation;
		self.inner.app.dom().set_children(
			&navigation.root_id,
			vec![
				html::main()
					.id(navigation.container_id.as_str())
					.class("main-content main-content--bare")
					.into(),
			],
		)
	}

	/// Removes the chrome and its subscriptions, leaving the bare container.
	pub fn teardown(&self) {
		self.unsubscribe_all();
		self.inner.form_sidebar.detach();
		self.inner.search_modal.detach();
		self.inner.gestures.borrow_mut().take();
		self.inner.user.borrow_mut().take();
		self.inner.mounted.set(false);
		if let Err(e) = self.mount_bare() {
			debug_log!("Bare layout not mounted: {}", e);
		}
	}

	/// Whether the chrome is mounted.
	pub fn is_mounted(&self) -> bool {
		self.inner.mounted.get()
	}

	/// The application context.
	pub fn app(&self) -> &AppContext {
		&self.inner.app
	}

	/// The form panel.
	pub fn form_sidebar(&self) -> &FormSidebar {
		&self.inner.form_sidebar
	}

	/// The search modal.
	pub fn search_modal(&self) -> &SearchModal {
		&self.inner.search_modal
	}

	/// Keyboard shortcuts bound to this layout.
	pub fn keyboard(&self) -> &KeyboardShortcuts {
		&self.inner.keyboard
	}

	/// Scroll tracking for the compact topbar.
	pub fn scroll(&self) -> &ScrollObserver {
		&self.inner.scroll
	}

	/// Swipe handling, present only on touch devices that were mobile at
	/// [`init`](Self::init).
	pub fn gestures(&self) -> Option<Rc<TouchGestures>> {
		self.inner.gestures.borrow().clone()
	}

	/// Current sidebar entries.
	pub fn sidebar_items(&self) -> Vec<SidebarItem> {
		self.inner.items.borrow().clone()
	}

	/// Sets the topbar title and the document title.
	pub fn set_page_title(&self, title: &str) {
		*self.inner.title.borrow_mut() = title.to_string();
		let app = &self.inner.app;
		if let Err(e) = app.dom().set_text(TOPBAR_TITLE_ID, title) {
			debug_log!("Topbar title not updated: {}", e);
		}
		app.dom()
			.set_document_title(&app.settings().document_title(title));
	}

	/// Inserts a sidebar entry at `position` (appended when `None` or past
	/// the end) and re-renders the sidebar.
	pub fn add_sidebar_item(&self, item: SidebarItem, position: Option<usize>) {
		{
			let mut items = self.inner.items.borrow_mut();
			let index = position.unwrap_or(items.len()).min(items.len());
			items.insert(index, item);
		}
		self.rerender_sidebar();
	}

	/// Removes a sidebar entry. Returns false if no entry has `item_id`.
	pub fn remove_sidebar_item(&self, item_id: &str) -> bool {
		let removed = {
			let mut items = self.inner.items.borrow_mut();
			let before = items.len();
			items.retain(|item| item.id != item_id);
			items.len() != before
		};
		if removed {
			self.rerender_sidebar();
		}
		removed
	}

	/// Updates a sidebar entry. Returns false if no entry has `item_id`.
	pub fn update_sidebar_item(&self, item_id: &str, patch: SidebarItemPatch) -> bool {
		let updated = {
			let mut items = self.inner.items.borrow_mut();
			match items.iter_mut().find(|item| item.id == item_id) {
				Some(item) => {
					patch.apply_to(item);
					true
				}
				None => false,
			}
		};
		if updated {
			self.rerender_sidebar();
		}
		updated
	}

	/// Shows a blocking overlay with `message`.
	pub fn show_loading(&self, message: &str) -> LoadingHandle {
		let handle = LoadingHandle(self.inner.next_loading.get() + 1);
		self.inner.next_loading.set(handle.0);

		let overlay = html::div()
			.id(handle.element_id())
			.class("loading-overlay")
			.attr("role", "alert")
			.attr("aria-busy", "true")
			.child(html::div().class("loading-spinner"))
			.child(html::p().class("loading-overlay__message").text(message));
		let app = &self.inner.app;
		if let Err(e) = app
			.dom()
			.append_child(&app.settings().navigation.root_id, overlay.into())
		{
			debug_log!("Loading overlay not shown: {}", e);
		}
		handle
	}

	/// Removes an overlay. Returns false if it was already gone.
	pub fn hide_loading(&self, handle: LoadingHandle) -> bool {
		self.inner.app.dom().remove(&handle.element_id())
	}

	/// Runs a UI action.
	pub fn dispatch(&self, action: UiAction) {
		let state = self.inner.app.state();
		match action {
			UiAction::ToggleSidebar => state.toggle_sidebar(),
			UiAction::CloseSidebar => state.close_sidebar(),
			UiAction::ToggleExpand(item_id) => state.toggle_expanded_item(&item_id),
			UiAction::NavigateLink => {
				if state.is_mobile() {
					state.close_sidebar();
				}
			}
			UiAction::OpenSearch => state.open_search(),
			UiAction::CloseSearch => state.close_search(),
			UiAction::ToggleUserMenu => self.set_user_menu_open(!self.inner.user_menu_open.get()),
			UiAction::CloseUserMenu => self.set_user_menu_open(false),
			UiAction::Logout => {
				self.set_user_menu_open(false);
				state.request_logout();
			}
			UiAction::CloseFormSidebar => state.close_form_sidebar(),
		}
	}

	/// Re-evaluates the breakpoint after a viewport resize.
	pub fn handle_resize(&self) {
		let state = self.inner.app.state();
		state.handle_resize();
		if self.inner.mounted.get()
			&& let Err(e) = self.refresh(state.is_mobile())
		{
			debug_log!("Sidebar not re-rendered: {}", e);
		}
	}

	fn render_topbar(&self) -> Element {
		render_topbar(
			&self.inner.app.settings().topbar,
			&self.inner.title.borrow(),
			self.inner.user.borrow().as_ref(),
			self.inner.user_menu_open.get(),
		)
	}

	fn render_sidebar(&self, is_mobile: bool) -> Element {
		let app = &self.inner.app;
		let sidebar = app.state().snapshot().sidebar;
		let collapsed = !is_mobile && !sidebar.is_open;
		render_sidebar(
			&self.inner.items.borrow(),
			&app.settings().sidebar.footer,
			&sidebar,
			collapsed,
		)
	}

	// Sidebar markup depends on collapsed mode, so it is rebuilt before the
	// classes are applied.
	fn refresh(&self, is_mobile: bool) -> Result<(), DomError> {
		let app = &self.inner.app;
		let sidebar = self.render_sidebar(is_mobile);
		let replaced = app.dom().replace(SIDEBAR_ID, sidebar.into());
		let settings = app.settings();
		apply(
			app.dom().as_ref(),
			settings,
			&present(&app.state().snapshot(), is_mobile, settings),
		);
		replaced
	}

	fn rerender_sidebar(&self) {
		if self.inner.mounted.get()
			&& let Err(e) = self.refresh(self.inner.app.state().is_mobile())
		{
			debug_log!("Sidebar not re-rendered: {}", e);
		}
	}

	fn show_expanded(&self, item_id: &str, expanded: bool) -> Result<(), DomError> {
		let app = &self.inner.app;
		let dom = app.dom();
		let state = app.state();
		let collapsed = !state.is_mobile() && !state.snapshot().sidebar.is_open;

		dom.set_class(&sidebar_item_id(item_id), EXPANDED_ITEM_CLASS, expanded)?;
		let display = if expanded && !collapsed { "block" } else { "none" };
		dom.set_style(&sidebar_subitems_id(item_id), "display", Some(display))
	}

	fn set_user_menu_open(&self, open: bool) {
		self.inner.user_menu_open.set(open);
		if let Err(e) = self
			.inner
			.app
			.dom()
			.set_class(USER_DROPDOWN_ID, USER_DROPDOWN_OPEN_CLASS, open)
		{
			debug_log!("User menu not updated: {}", e);
		}
	}

	fn subscribe_all(&self) {
		let weak = Rc::downgrade(&self.inner);
		let state = self.inner.app.state();
		let subscriptions = vec![
			(
				Topic::SidebarToggle,
				state.subscribe(
					Topic::SidebarToggle,
					listener(&weak, |this, event| match event {
						ShellEvent::SidebarToggle { is_mobile, .. } => this.refresh(*is_mobile),
						_ => Ok(()),
					}),
				),
			),
			(
				Topic::TopBarScroll,
				state.subscribe(
					Topic::TopBarScroll,
					listener(&weak, |this, _| {
						let app = &this.inner.app;
						let settings = app.settings();
						apply(
							app.dom().as_ref(),
							settings,
							&present(&app.state().snapshot(), app.state().is_mobile(), settings),
						);
					}),
				),
			),
			(
				Topic::SidebarExpandedChanged,
				state.subscribe(
					Topic::SidebarExpandedChanged,
					listener(&weak, |this, event| match event {
						ShellEvent::SidebarExpandedChanged {
							item_id, expanded, ..
						} => this.show_expanded(item_id, *expanded),
						_ => Ok(()),
					}),
				),
			),
			(
				Topic::UserLogout,
				state.subscribe(
					Topic::UserLogout,
					listener(&weak, |this, _| {
						this.set_user_menu_open(false);
						let auth = Rc::clone(this.inner.app.auth());
						spawn_local(async move { auth.logout().await });
					}),
				),
			),
		];
		*self.inner.subscriptions.borrow_mut() = subscriptions;
	}

	fn unsubscribe_all(&self) {
		let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
		for (topic, id) in subscriptions {
			self.inner.app.state().unsubscribe(topic, id);
		}
	}
}

// Listeners hold the manager weakly; once it is gone they do nothing.
fn listener<F, R>(weak: &Weak<Inner>, f: F) -> impl Fn(&ShellEvent) -> ListenerResult + 'static
where
	F: Fn(&TemplateManager, &ShellEvent) -> R + 'static,
	R: IntoListenerResult,
{
	let weak = Weak::clone(weak);
	move |event| match weak.upgrade() {
		Some(inner) => f(&TemplateManager { inner }, event).into_listener_result(),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::{
		ACTIVE_ITEM_CLASS, SIDEBAR_COLLAPSED_CLASS, SIDEBAR_MOBILE_OPEN_CLASS,
		SIDEBAR_OVERLAY_VISIBLE_CLASS, TOPBAR_COMPACT_CLASS, TOPBAR_ID,
	};
	use crate::testing::MemoryPlatform;
	use gestor_core::Dom;
	use rstest::rstest;

	fn mounted(platform: &MemoryPlatform) -> TemplateManager {
		let template = TemplateManager::new(platform.app_context());
		template.init().unwrap();
		template
	}

	#[rstest]
	fn test_init_renders_chrome() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		assert!(template.is_mounted());
		for id in [
			"topbar",
			"sidebar",
			"main-content",
			"sidebar-overlay",
			"form-sidebar",
			"search-modal",
		] {
			assert!(platform.dom.contains(id), "missing #{}", id);
		}
		assert_eq!(platform.dom.style("main-content", "margin-left").as_deref(), Some("300px"));
		assert!(template.gestures().is_none());
	}

	#[rstest]
	fn test_desktop_toggle_collapses_and_moves_content() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		template.dispatch(UiAction::ToggleSidebar);
		assert!(platform.dom.has_class("sidebar", SIDEBAR_COLLAPSED_CLASS));
		assert_eq!(platform.dom.style("main-content", "margin-left").as_deref(), Some("80px"));
		assert!(!platform.dom.has_class("sidebar-overlay", SIDEBAR_OVERLAY_VISIBLE_CLASS));

		template.dispatch(UiAction::ToggleSidebar);
		assert!(!platform.dom.has_class("sidebar", SIDEBAR_COLLAPSED_CLASS));
		assert_eq!(platform.dom.style("main-content", "margin-left").as_deref(), Some("300px"));
	}

	#[rstest]
	fn test_mobile_toggle_uses_overlay() {
		let platform = MemoryPlatform::mobile();
		platform.viewport.set_touch(true);
		let template = mounted(&platform);
		assert!(template.gestures().is_some());

		template.dispatch(UiAction::ToggleSidebar);
		assert!(platform.dom.has_class("sidebar", SIDEBAR_MOBILE_OPEN_CLASS));
		assert!(!platform.dom.has_class("sidebar", SIDEBAR_COLLAPSED_CLASS));
		assert!(platform.dom.has_class("sidebar-overlay", SIDEBAR_OVERLAY_VISIBLE_CLASS));
		assert_eq!(platform.dom.style("main-content", "margin-left").as_deref(), Some("0"));

		// Tapping a link closes the mobile sidebar
		template.dispatch(UiAction::NavigateLink);
		assert!(!platform.dom.has_class("sidebar", SIDEBAR_MOBILE_OPEN_CLASS));
		assert!(!platform.dom.has_class("sidebar-overlay", SIDEBAR_OVERLAY_VISIBLE_CLASS));
	}

	#[rstest]
	fn test_resize_across_breakpoint() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		platform.viewport.set_width(600);
		template.handle_resize();
		assert!(!template.app().state().snapshot().sidebar.is_open);
		assert!(!platform.dom.has_class("sidebar", SIDEBAR_COLLAPSED_CLASS));
		assert_eq!(platform.dom.style("main-content", "margin-left").as_deref(), Some("0"));

		platform.viewport.set_width(1280);
		template.handle_resize();
		assert!(template.app().state().snapshot().sidebar.is_open);
		assert_eq!(platform.dom.style("main-content", "margin-left").as_deref(), Some("300px"));
	}

	#[rstest]
	fn test_scroll_sets_compact_topbar() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		platform.viewport.set_scroll_y(500.0);
		template.scroll().on_scroll();
		assert!(platform.dom.has_class(TOPBAR_ID, TOPBAR_COMPACT_CLASS));

		platform.viewport.set_scroll_y(0.0);
		template.scroll().on_scroll();
		assert!(!platform.dom.has_class(TOPBAR_ID, TOPBAR_COMPACT_CLASS));
	}

	#[rstest]
	fn test_sidebar_item_api_rerenders() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		template.add_sidebar_item(
			SidebarItem::link("reports", "Reportes", "📈", "#/reportes"),
			Some(1),
		);
		assert_eq!(template.sidebar_items()[1].id, "reports");
		assert!(platform.dom.contains("sidebar-link-reports"));

		assert!(template.update_sidebar_item(
			"reports",
			SidebarItemPatch {
				label: Some("Informes".to_string()),
				..SidebarItemPatch::default()
			},
		));
		assert!(platform.dom.text("sidebar-link-reports").unwrap().contains("Informes"));

		assert!(template.remove_sidebar_item("reports"));
		assert!(!platform.dom.contains("sidebar-link-reports"));
		assert!(!template.remove_sidebar_item("reports"));
		assert!(!template.update_sidebar_item("reports", SidebarItemPatch::default()));
	}

	#[rstest]
	fn test_rerender_keeps_active_item() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);
		template
			.app()
			.state()
			.set_active_item(Some("#/clientes".to_string()));

		template.add_sidebar_item(SidebarItem::link("x", "X", "", "#/x"), None);
		assert!(platform.dom.has_class("sidebar-link-clients", ACTIVE_ITEM_CLASS));
	}

	#[rstest]
	fn test_loading_overlays_are_independent() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		let first = template.show_loading("Guardando...");
		let second = template.show_loading("Subiendo...");
		assert_ne!(first, second);
		assert!(platform.dom.contains(&first.element_id()));

		assert!(template.hide_loading(first));
		assert!(!template.hide_loading(first));
		assert!(platform.dom.contains(&second.element_id()));
	}

	#[rstest]
	fn test_user_menu_and_title() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);

		template.dispatch(UiAction::ToggleUserMenu);
		assert!(platform.dom.has_class(USER_DROPDOWN_ID, USER_DROPDOWN_OPEN_CLASS));
		template.dispatch(UiAction::CloseUserMenu);
		assert!(!platform.dom.has_class(USER_DROPDOWN_ID, USER_DROPDOWN_OPEN_CLASS));

		template.set_page_title("Empresas");
		assert_eq!(platform.dom.text(TOPBAR_TITLE_ID).as_deref(), Some("Empresas"));
		assert_eq!(platform.dom.document_title(), "Empresas - Mi SaaS");
	}

	#[rstest]
	fn test_teardown_unsubscribes() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);
		let bus = template.app().state().bus();
		assert_eq!(bus.listener_count(Topic::SidebarToggle), 1);

		template.teardown();
		assert!(!template.is_mounted());
		assert_eq!(bus.listener_count(Topic::SidebarToggle), 0);
		assert_eq!(bus.listener_count(Topic::FormSidebarToggle), 0);
		assert_eq!(bus.listener_count(Topic::SearchOpen), 0);
		assert!(!platform.dom.contains("sidebar"));
		assert!(platform.dom.contains("main-content"));
	}

	#[rstest]
	fn test_init_twice_does_not_duplicate_listeners() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);
		template.init().unwrap();
		assert_eq!(template.app().state().bus().listener_count(Topic::SidebarToggle), 1);
	}

	#[rstest]
	fn test_listener_failure_does_not_stop_other_listeners() {
		let platform = MemoryPlatform::desktop();
		let template = mounted(&platform);
		let state = template.app().state();
		let seen = Rc::new(Cell::new(0));
		let counter = Rc::clone(&seen);
		state.subscribe(Topic::SidebarExpandedChanged, move |_| counter.set(counter.get() + 1));

		// The sidebar markup is gone, so the chrome listener fails
		platform.dom.remove("sidebar");
		state.toggle_expanded_item("sales");
		assert_eq!(seen.get(), 1);
		assert!(state.snapshot().sidebar.expanded_items.contains("sales"));
	}
}
