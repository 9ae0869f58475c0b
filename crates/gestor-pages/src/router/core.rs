//! Core Router Implementation.
//!
//! One call to [`Router::handle_location_change`] is one navigation:
//!
//! 1. read the fragment, split off the query and resolve the route
//!    (exact paths first, then `:param` patterns in table order)
//! 2. run the guards: guest-only, authentication, permissions, `before_enter`
//! 3. lend the content container to the page component and await it
//! 4. mark the active sidebar entry and update the titles
//!
//! Every navigation bumps an epoch. A navigation that finds itself
//! superseded after an await stops without further side effects.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use gestor_core::markup::html;
use gestor_core::{Element, debug_log, error_log, info_log, warn_log};

use super::context::{NavigationToken, PageContainer, PageContext};
use super::pattern::PathPattern;
use crate::app::AppContext;
use crate::error::{PageError, RouterError};
use crate::layout::{ACTIVE_ITEM_CLASS, TOPBAR_TITLE_ID};

/// Id of the loading indicator shown while a page component runs.
pub const PAGE_LOADING_ID: &str = "page-loading";

/// Future returned by page components.
pub type PageFuture = LocalBoxFuture<'static, Result<(), PageError>>;

type Component = Rc<dyn Fn(PageContext) -> PageFuture>;
type BeforeEnter = Rc<dyn Fn(&RouteMatch) -> LocalBoxFuture<'static, bool>>;

/// A matched route with extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	/// The matched route.
	pub route: Route,
	/// Extracted path parameters.
	pub params: HashMap<String, String>,
}

/// A single route definition.
#[derive(Clone)]
pub struct Route {
	pattern: PathPattern,
	title: Option<String>,
	requires_auth: bool,
	guest_only: bool,
	permissions: Vec<String>,
	before_enter: Option<BeforeEnter>,
	component: Component,
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern)
			.field("title", &self.title)
			.field("requires_auth", &self.requires_auth)
			.field("guest_only", &self.guest_only)
			.field("permissions", &self.permissions)
			.field("has_before_enter", &self.before_enter.is_some())
			.finish()
	}
}

impl Route {
	/// Creates a public route rendering `component`.
	pub fn new<F, Fut>(path: &str, component: F) -> Self
	where
		F: Fn(PageContext) -> Fut + 'static,
		Fut: Future<Output = Result<(), PageError>> + 'static,
	{
		Self {
			pattern: PathPattern::new(path),
			title: None,
			requires_auth: false,
			guest_only: false,
			permissions: Vec::new(),
			before_enter: None,
			component: Rc::new(move |ctx| component(ctx).boxed_local()),
		}
	}

	/// Sets the page title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Requires a session; visitors without one go to the login route.
	pub fn requires_auth(mut self) -> Self {
		self.requires_auth = true;
		self
	}

	/// Only for visitors without a session; signed-in users go to the
	/// fallback route.
	pub fn guest_only(mut self) -> Self {
		self.guest_only = true;
		self
	}

	/// Requires every permission in `permissions`.
	pub fn permissions<I, S>(mut self, permissions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.permissions = permissions.into_iter().map(Into::into).collect();
		self
	}

	/// Adds a hook that runs after the other guards; `false` redirects to
	/// the fallback route.
	pub fn before_enter<G, Fut>(mut self, hook: G) -> Self
	where
		G: Fn(&RouteMatch) -> Fut + 'static,
		Fut: Future<Output = bool> + 'static,
	{
		self.before_enter = Some(Rc::new(move |m| hook(m).boxed_local()));
		self
	}

	/// The path pattern.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// The registered path.
	pub fn path(&self) -> &str {
		self.pattern.path()
	}

	/// The page title, if any.
	pub fn page_title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// Whether a session is required.
	pub fn is_auth_required(&self) -> bool {
		self.requires_auth
	}

	/// Whether the route is for visitors without a session.
	pub fn is_guest_only(&self) -> bool {
		self.guest_only
	}

	/// Required permissions.
	pub fn required_permissions(&self) -> &[String] {
		&self.permissions
	}
}

/// Where the router is in the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterPhase {
	/// Nothing in flight.
	#[default]
	Idle,
	/// Matching the path.
	Resolving,
	/// Running guards.
	Guarding,
	/// Awaiting the page component.
	Rendering,
	/// A redirect was issued; the next change signal resolves it.
	Redirecting,
}

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
	/// No route matches the path.
	NotFound,
	/// The route requires a session and there is none.
	Unauthenticated,
	/// The route is guest-only and a session exists.
	AlreadyAuthenticated,
	/// The user lacks a required permission.
	Forbidden,
	/// The `before_enter` hook refused.
	Rejected,
}

/// Result of one navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
	/// The page rendered.
	Rendered {
		/// Resolved path.
		path: String,
	},
	/// The error panel is showing instead of the page.
	RenderFailed {
		/// Resolved path.
		path: String,
		/// What went wrong.
		error: RouterError,
	},
	/// The fragment was changed to another path.
	Redirected {
		/// Path that was requested.
		from: String,
		/// Path that was set.
		to: String,
		/// Why.
		reason: RedirectReason,
	},
	/// A later navigation started before this one finished.
	Superseded,
}

/// The hash router.
pub struct Router {
	app: AppContext,
	routes: Vec<Route>,
	epoch: Rc<Cell<u64>>,
	phase: Cell<RouterPhase>,
	current_path: RefCell<Option<String>>,
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("routes_count", &self.routes.len())
			.field("epoch", &self.epoch.get())
			.field("phase", &self.phase.get())
			.field("current_path", &self.current_path.borrow())
			.finish()
	}
}

impl Router {
	/// Creates a router without routes.
	pub fn new(app: AppContext) -> Self {
		Self {
			app,
			routes: Vec::new(),
			epoch: Rc::new(Cell::new(0)),
			phase: Cell::new(RouterPhase::Idle),
			current_path: RefCell::new(None),
		}
	}

	/// Adds a route. Among pattern routes, earlier registrations win.
	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	/// Adds several routes in order.
	pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
		self.routes.extend(routes);
		self
	}

	/// The application context.
	pub fn app(&self) -> &AppContext {
		&self.app
	}

	/// Number of registered routes.
	pub fn route_count(&self) -> usize {
		self.routes.len()
	}

	/// Current phase.
	pub fn phase(&self) -> RouterPhase {
		self.phase.get()
	}

	/// Epoch of the latest navigation.
	pub fn epoch(&self) -> u64 {
		self.epoch.get()
	}

	/// Path of the last navigation that reached rendering.
	pub fn current_path(&self) -> Option<String> {
		self.current_path.borrow().clone()
	}

	/// Resolves `path`: an exact match on any route first, then the first
	/// `:param` route whose pattern matches.
	pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
		if let Some(route) = self.routes.iter().find(|r| r.pattern.matches_exactly(path)) {
			return Some(RouteMatch {
				route: route.clone(),
				params: HashMap::new(),
			});
		}
		self.routes
			.iter()
			.filter(|r| r.pattern.has_params())
			.find_map(|route| {
				route.pattern.captures(path).map(|params| RouteMatch {
					route: route.clone(),
					params,
				})
			})
	}

	/// Sets the fragment to `path`. Nothing else happens until the change
	/// signal reaches [`handle_location_change`](Self::handle_location_change).
	pub fn navigate_to(&self, path: &str) {
		self.app.navigate_to(path);
	}

	/// Handles the current fragment.
	///
	/// Never fails: unknown paths and failed guards redirect, component
	/// errors show the error panel. On native targets a panicking component
	/// shows it too; the browser build aborts on panic, so there components
	/// must report failure as `Err(PageError)`.
	pub async fn handle_location_change(&self) -> NavigationOutcome {
		let token = self.begin();
		let fragment = self.app.location().fragment();
		let (path, query) = split_fragment(&fragment);
		info_log!("Navigating to {}", path);

		self.phase.set(RouterPhase::Resolving);
		let Some(route_match) = self.match_path(&path) else {
			let fallback = self.app.settings().navigation.fallback.clone();
			warn_log!("No route for '{}', redirecting to {}", path, fallback);
			return self.redirect(path, fallback, RedirectReason::NotFound);
		};

		self.phase.set(RouterPhase::Guarding);
		if let Some(outcome) = self.run_guards(&token, &path, &route_match).await {
			return outcome;
		}

		self.phase.set(RouterPhase::Rendering);
		let outcome = self.render(&token, path, query, route_match).await;
		if outcome != NavigationOutcome::Superseded {
			self.phase.set(RouterPhase::Idle);
		}
		outcome
	}

	fn begin(&self) -> NavigationToken {
		let epoch = self.epoch.get() + 1;
		self.epoch.set(epoch);
		NavigationToken::new(epoch, Rc::clone(&self.epoch))
	}

	async fn run_guards(
		&self,
		token: &NavigationToken,
		path: &str,
		route_match: &RouteMatch,
	) -> Option<NavigationOutcome> {
		let route = &route_match.route;
		let navigation = &self.app.settings().navigation;
		let auth = self.app.auth();

		if route.guest_only {
			let user = auth.current_user().await;
			if !token.is_current() {
				return Some(NavigationOutcome::Superseded);
			}
			if user.is_some() {
				info_log!("Signed in; leaving guest route {}", path);
				return Some(self.redirect(
					path.to_string(),
					navigation.fallback.clone(),
					RedirectReason::AlreadyAuthenticated,
				));
			}
		}

		if route.requires_auth {
			let user = auth.current_user().await;
			if !token.is_current() {
				return Some(NavigationOutcome::Superseded);
			}
			if user.is_none() {
				info_log!("No session for {}, redirecting to login", path);
				return Some(self.redirect(
					path.to_string(),
					navigation.login.clone(),
					RedirectReason::Unauthenticated,
				));
			}
		}

		if !route.permissions.is_empty() {
			let allowed = auth.check_permissions(&route.permissions).await;
			if !token.is_current() {
				return Some(NavigationOutcome::Superseded);
			}
			if !allowed {
				info_log!("Missing permissions {:?} for {}", route.permissions, path);
				return Some(self.redirect(
					path.to_string(),
					navigation.fallback.clone(),
					RedirectReason::Forbidden,
				));
			}
		}

		if let Some(hook) = &route.before_enter {
			let allowed = hook(route_match).await;
			if !token.is_current() {
				return Some(NavigationOutcome::Superseded);
			}
			if !allowed {
				info_log!("before_enter refused {}", path);
				return Some(self.redirect(
					path.to_string(),
					navigation.fallback.clone(),
					RedirectReason::Rejected,
				));
			}
		}

		None
	}

	fn redirect(&self, from: String, to: String, reason: RedirectReason) -> NavigationOutcome {
		if from == to {
			// The fragment would not change, so no change signal would follow.
			error_log!("Redirect loop at {} ({:?})", from, reason);
			let error = RouterError::RedirectLoop(from.clone());
			self.show_error(&error);
			self.phase.set(RouterPhase::Idle);
			return NavigationOutcome::RenderFailed { path: from, error };
		}
		self.phase.set(RouterPhase::Redirecting);
		self.app.navigate_to(&to);
		NavigationOutcome::Redirected { from, to, reason }
	}

	async fn render(
		&self,
		token: &NavigationToken,
		path: String,
		query: HashMap<String, String>,
		route_match: RouteMatch,
	) -> NavigationOutcome {
		let container_id = &self.app.settings().navigation.container_id;
		let container = PageContainer::new(Rc::clone(self.app.dom()), container_id, token.clone());
		if let Err(e) = container.set_content(loading_indicator()) {
			error_log!("Cannot render {}: {}", path, e);
			return NavigationOutcome::RenderFailed {
				path,
				error: RouterError::Container(e),
			};
		}
		*self.current_path.borrow_mut() = Some(path.clone());

		let RouteMatch { route, params } = route_match;
		let ctx = PageContext {
			app: self.app.clone(),
			container,
			params,
			query,
			path: path.clone(),
		};
		let result = run_component(&route, ctx).await;

		if !token.is_current() {
			debug_log!("Navigation to {} was superseded while rendering", path);
			return NavigationOutcome::Superseded;
		}

		self.app.dom().remove(PAGE_LOADING_ID);
		let outcome = match result {
			Ok(()) => NavigationOutcome::Rendered { path: path.clone() },
			Err(error) => {
				error_log!("Error rendering {}: {}", path, error);
				self.show_error(&error);
				NavigationOutcome::RenderFailed {
					path: path.clone(),
					error,
				}
			}
		};
		self.mark_active(&path, &route);
		outcome
	}

	fn show_error(&self, error: &RouterError) {
		let container_id = &self.app.settings().navigation.container_id;
		if let Err(e) = self
			.app
			.dom()
			.set_children(container_id, vec![error_panel(&error.to_string()).into()])
		{
			error_log!("Cannot show error panel: {}", e);
		}
	}

	// Best effort: a missing sidebar or topbar (bare layout) is not an error.
	fn mark_active(&self, path: &str, route: &Route) {
		let dom = self.app.dom();
		let settings = self.app.settings();
		let href = format!("#{}", path);

		dom.remove_class_everywhere(ACTIVE_ITEM_CLASS);
		dom.add_class_where_attr("href", &href, ACTIVE_ITEM_CLASS);

		match route.page_title() {
			Some(title) => {
				dom.set_document_title(&settings.document_title(title));
				if let Err(e) = dom.set_text(TOPBAR_TITLE_ID, title) {
					debug_log!("Topbar title not updated: {}", e);
				}
			}
			None => dom.set_document_title(&settings.app_name),
		}

		self.app.state().set_active_item(Some(href));
	}
}

/// Splits `fragment` into a path (default `/`) and decoded query pairs.
fn split_fragment(fragment: &str) -> (String, HashMap<String, String>) {
	let fragment = fragment.trim_start_matches('#');
	let (path, query) = match fragment.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (fragment, None),
	};
	let path = if path.is_empty() { "/" } else { path };

	let query = match query {
		Some(raw) => match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
			Ok(pairs) => pairs.into_iter().collect(),
			Err(e) => {
				warn_log!("Ignoring malformed query '{}': {}", raw, e);
				HashMap::new()
			}
		},
		None => HashMap::new(),
	};
	(path.to_string(), query)
}

// Panic recovery only happens where panics unwind (native hosts and tests).
// Under `panic = "abort"` a panic ends the module before reaching here.
async fn run_component(route: &Route, ctx: PageContext) -> Result<(), RouterError> {
	let future = match catch_unwind(AssertUnwindSafe(|| (route.component)(ctx))) {
		Ok(future) => future,
		Err(payload) => return Err(RouterError::Panicked(panic_message(payload.as_ref()))),
	};
	match AssertUnwindSafe(future).catch_unwind().await {
		Ok(result) => result.map_err(RouterError::Page),
		Err(payload) => Err(RouterError::Panicked(panic_message(payload.as_ref()))),
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	payload
		.downcast_ref::<&str>()
		.map(|s| s.to_string())
		.or_else(|| payload.downcast_ref::<String>().cloned())
		.unwrap_or_else(|| "unknown panic".to_string())
}

fn loading_indicator() -> Element {
	html::div()
		.id(PAGE_LOADING_ID)
		.class("page-loading")
		.child(html::div().class("loading-spinner"))
		.child(html::p().text("Cargando..."))
}

fn error_panel(message: &str) -> Element {
	html::div()
		.class("page-error")
		.child(html::h2().class("page-error__title").text("Error"))
		.child(html::p().class("page-error__message").text(message))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "/", &[])]
	#[case("#", "/", &[])]
	#[case("/clientes", "/clientes", &[])]
	#[case("#/clientes?page=2&q=ana%20l", "/clientes", &[("page", "2"), ("q", "ana l")])]
	#[case("?tab=1", "/", &[("tab", "1")])]
	fn test_split_fragment(
		#[case] fragment: &str,
		#[case] path: &str,
		#[case] query: &[(&str, &str)],
	) {
		let (got_path, got_query) = split_fragment(fragment);
		assert_eq!(got_path, path);
		let expected: HashMap<String, String> = query
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		assert_eq!(got_query, expected);
	}

	#[rstest]
	fn test_panic_message() {
		let payload: Box<dyn Any + Send> = Box::new("plain");
		assert_eq!(panic_message(payload.as_ref()), "plain");
		let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
		assert_eq!(panic_message(payload.as_ref()), "owned");
		let payload: Box<dyn Any + Send> = Box::new(7_u8);
		assert_eq!(panic_message(payload.as_ref()), "unknown panic");
	}

	#[rstest]
	fn test_route_builder() {
		let route = Route::new("/clientes/:id", |_ctx| async { Ok(()) })
			.title("Cliente")
			.requires_auth()
			.permissions(["clients.read"]);
		assert_eq!(route.path(), "/clientes/:id");
		assert_eq!(route.page_title(), Some("Cliente"));
		assert!(route.is_auth_required());
		assert!(!route.is_guest_only());
		assert_eq!(route.required_permissions(), ["clients.read"]);
	}

	#[rstest]
	fn test_error_panel_escapes_message() {
		let html = error_panel("<script>x</script>").render_to_string();
		assert!(html.contains("&lt;script&gt;"));
		assert!(html.contains("<h2 class=\"page-error__title\">Error</h2>"));
	}
}
