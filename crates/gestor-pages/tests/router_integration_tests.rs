//! Integration tests for the hash router
//!
//! These tests verify:
//! 1. Route resolution (exact paths, `:param` patterns, unknown paths)
//! 2. Guard order and redirects
//! 3. Latest-navigation-wins rendering
//! 4. Error panel for failing and panicking components
//! 5. Active sidebar entry and titles

#![cfg(not(target_arch = "wasm32"))]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use gestor_auth::{Authenticator, IdentityUser, UserData};
use gestor_core::markup::html;
use gestor_core::{Dom, DomError};
use gestor_pages::error::{PageError, RouterError};
use gestor_pages::layout::{ACTIVE_ITEM_CLASS, TOPBAR_TITLE_ID, TemplateManager};
use gestor_pages::router::{
	Location, NavigationOutcome, PAGE_LOADING_ID, PageContext, RedirectReason, Route, Router,
	RouterPhase,
};
use gestor_pages::AppContext;
use gestor_pages::testing::MemoryPlatform;
use proptest::prelude::*;
use rstest::*;

// ============================================================================
// Fixtures
// ============================================================================

/// Authenticator with a fixed answer that records every call.
#[derive(Default)]
struct SpyAuth {
	user: Option<UserData>,
	allowed: bool,
	calls: RefCell<Vec<&'static str>>,
}

impl SpyAuth {
	fn signed_in(allowed: bool) -> Self {
		Self {
			user: Some(UserData::from_parts(
				&IdentityUser::new("u-1", "ana@example.com").full_name("Ana"),
				None,
			)),
			allowed,
			calls: RefCell::new(Vec::new()),
		}
	}

	fn calls(&self) -> Vec<&'static str> {
		self.calls.borrow().clone()
	}
}

#[async_trait(?Send)]
impl Authenticator for SpyAuth {
	fn user_data(&self) -> Option<UserData> {
		self.user.clone()
	}

	async fn current_user(&self) -> Option<UserData> {
		self.calls.borrow_mut().push("current_user");
		self.user.clone()
	}

	async fn check_permissions(&self, _required: &[String]) -> bool {
		self.calls.borrow_mut().push("check_permissions");
		self.allowed
	}

	async fn logout(&self) {
		self.calls.borrow_mut().push("logout");
	}
}

async fn text_page(ctx: PageContext, text: &'static str) -> Result<(), PageError> {
	ctx.container.set_content(html::p().class("page-text").text(text))?;
	Ok(())
}

async fn job_page(ctx: PageContext) -> Result<(), PageError> {
	let id = ctx.param("id").unwrap_or_default();
	let tab = ctx.query_param("tab").unwrap_or("general");
	ctx.container
		.set_content(html::p().class("page-text").text(format!("trabajo {} ({})", id, tab)))?;
	Ok(())
}

async fn failing_page(_ctx: PageContext) -> Result<(), PageError> {
	Err(PageError::msg("<b>sin conexión</b>"))
}

async fn panicking_page(_ctx: PageContext) -> Result<(), PageError> {
	panic!("explotó")
}

fn app_with(platform: &MemoryPlatform, auth: Rc<SpyAuth>) -> AppContext {
	let app = AppContext::new(Rc::clone(&platform.settings), &platform.platform(), auth);
	TemplateManager::new(app.clone())
		.init()
		.expect("chrome mounts on the memory document");
	app
}

fn standard_routes() -> Vec<Route> {
	vec![
		Route::new("/login", |ctx| text_page(ctx, "login"))
			.title("Ingresar")
			.guest_only(),
		Route::new("/dashboard", |ctx| text_page(ctx, "dashboard"))
			.title("Dashboard")
			.requires_auth(),
		Route::new("/clientes", |ctx| text_page(ctx, "clientes"))
			.title("Clientes")
			.requires_auth(),
		Route::new("/trabajos/nuevo", |ctx| text_page(ctx, "nuevo trabajo"))
			.title("Nuevo trabajo")
			.requires_auth(),
		Route::new("/trabajos/:id", job_page)
			.title("Trabajo")
			.requires_auth(),
		Route::new("/informes", |ctx| text_page(ctx, "informes"))
			.title("Informes")
			.requires_auth()
			.permissions(["reports.view"]),
	]
}

struct RouterEnv {
	platform: MemoryPlatform,
	auth: Rc<SpyAuth>,
	router: Router,
}

impl RouterEnv {
	fn new(auth: SpyAuth) -> Self {
		let platform = MemoryPlatform::desktop();
		let auth = Rc::new(auth);
		let router = Router::new(app_with(&platform, Rc::clone(&auth))).routes(standard_routes());
		Self {
			platform,
			auth,
			router,
		}
	}

	async fn go(&self, fragment: &str) -> NavigationOutcome {
		self.platform.location.set_fragment(fragment);
		self.platform.location.take_pending();
		self.router.handle_location_change().await
	}

	fn page_text(&self) -> String {
		self.platform.dom.text("main-content").unwrap_or_default()
	}
}

#[fixture]
fn signed_in() -> RouterEnv {
	RouterEnv::new(SpyAuth::signed_in(true))
}

#[fixture]
fn anonymous() -> RouterEnv {
	RouterEnv::new(SpyAuth::default())
}

// ============================================================================
// Resolution
// ============================================================================

#[rstest]
fn test_exact_path_wins_over_pattern(signed_in: RouterEnv) {
	let m = signed_in.router.match_path("/trabajos/nuevo").unwrap();
	assert_eq!(m.route.path(), "/trabajos/nuevo");
	assert!(m.params.is_empty());

	let m = signed_in.router.match_path("/trabajos/42").unwrap();
	assert_eq!(m.route.path(), "/trabajos/:id");
	assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
}

#[rstest]
#[case("/trabajos")]
#[case("/trabajos/42/extra")]
#[case("/desconocido")]
fn test_unmatched_paths(signed_in: RouterEnv, #[case] path: &str) {
	assert!(signed_in.router.match_path(path).is_none());
}

#[rstest]
#[tokio::test]
async fn test_params_and_query_reach_the_page(signed_in: RouterEnv) {
	let outcome = signed_in.go("#/trabajos/7?tab=notas").await;

	assert_eq!(
		outcome,
		NavigationOutcome::Rendered {
			path: "/trabajos/7".to_string()
		}
	);
	assert_eq!(signed_in.page_text(), "trabajo 7 (notas)");
	assert_eq!(signed_in.router.phase(), RouterPhase::Idle);
	assert_eq!(signed_in.router.current_path().as_deref(), Some("/trabajos/7"));
}

#[rstest]
#[tokio::test]
async fn test_unknown_path_redirects_to_fallback(signed_in: RouterEnv) {
	let outcome = signed_in.go("/no-existe").await;

	assert_eq!(
		outcome,
		NavigationOutcome::Redirected {
			from: "/no-existe".to_string(),
			to: "/dashboard".to_string(),
			reason: RedirectReason::NotFound,
		}
	);
	assert_eq!(signed_in.platform.location.fragment(), "/dashboard");
	assert_eq!(signed_in.platform.location.take_pending(), 1);
	assert_eq!(signed_in.router.phase(), RouterPhase::Redirecting);
}

#[rstest]
#[tokio::test]
async fn test_empty_fragment_resolves_root(signed_in: RouterEnv) {
	let outcome = signed_in.go("").await;
	assert!(matches!(
		outcome,
		NavigationOutcome::Redirected { ref from, reason: RedirectReason::NotFound, .. } if from == "/"
	));
}

// ============================================================================
// Guards
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_protected_route_without_session_goes_to_login(anonymous: RouterEnv) {
	let outcome = anonymous.go("/informes").await;

	assert_eq!(
		outcome,
		NavigationOutcome::Redirected {
			from: "/informes".to_string(),
			to: "/login".to_string(),
			reason: RedirectReason::Unauthenticated,
		}
	);
	// Permissions are never checked without a session
	assert_eq!(anonymous.auth.calls(), vec!["current_user"]);
}

#[rstest]
#[tokio::test]
async fn test_guest_route_with_session_goes_to_fallback(signed_in: RouterEnv) {
	let outcome = signed_in.go("/login").await;

	assert_eq!(
		outcome,
		NavigationOutcome::Redirected {
			from: "/login".to_string(),
			to: "/dashboard".to_string(),
			reason: RedirectReason::AlreadyAuthenticated,
		}
	);
}

#[rstest]
#[tokio::test]
async fn test_missing_permission_goes_to_fallback() {
	let env = RouterEnv::new(SpyAuth::signed_in(false));

	let outcome = env.go("/informes").await;

	assert_eq!(
		outcome,
		NavigationOutcome::Redirected {
			from: "/informes".to_string(),
			to: "/dashboard".to_string(),
			reason: RedirectReason::Forbidden,
		}
	);
	assert_eq!(env.auth.calls(), vec!["current_user", "check_permissions"]);
}

#[rstest]
#[tokio::test]
async fn test_before_enter_runs_last() {
	let platform = MemoryPlatform::desktop();
	let auth = Rc::new(SpyAuth::signed_in(true));
	let seen = Rc::new(RefCell::new(None));
	let hook_seen = Rc::clone(&seen);
	let hook_auth = Rc::clone(&auth);
	let router = Router::new(app_with(&platform, Rc::clone(&auth)))
		.routes(standard_routes())
		.route(
			Route::new("/empresas/:slug", |ctx| text_page(ctx, "empresa"))
				.requires_auth()
				.permissions(["companies.view"])
				.before_enter(move |m| {
					*hook_seen.borrow_mut() = Some((m.params.clone(), hook_auth.calls()));
					let allowed = m.params.get("slug").map(String::as_str) != Some("cerrada");
					async move { allowed }
				}),
		);

	platform.location.set_fragment("/empresas/cerrada");
	let outcome = router.handle_location_change().await;

	assert!(matches!(
		outcome,
		NavigationOutcome::Redirected {
			reason: RedirectReason::Rejected,
			..
		}
	));
	let (params, calls_before_hook) = seen.borrow().clone().unwrap();
	assert_eq!(params.get("slug").map(String::as_str), Some("cerrada"));
	assert_eq!(calls_before_hook, vec!["current_user", "check_permissions"]);

	platform.location.set_fragment("/empresas/abierta");
	assert!(matches!(
		router.handle_location_change().await,
		NavigationOutcome::Rendered { .. }
	));
}

#[rstest]
#[tokio::test]
async fn test_redirect_to_same_path_shows_error() {
	let mut settings = gestor_core::ShellSettings::default();
	settings.navigation.fallback = "/informes".to_string();
	let platform = MemoryPlatform::with_settings(settings, 1280);
	let auth = Rc::new(SpyAuth::signed_in(false));
	let router = Router::new(app_with(&platform, auth)).routes(standard_routes());

	platform.location.set_fragment("/informes");
	let outcome = router.handle_location_change().await;

	assert_eq!(
		outcome,
		NavigationOutcome::RenderFailed {
			path: "/informes".to_string(),
			error: RouterError::RedirectLoop("/informes".to_string()),
		}
	);
	assert_eq!(platform.dom.elements_with_class("page-error").len(), 1);
	assert_eq!(router.phase(), RouterPhase::Idle);
}

// ============================================================================
// Rendering
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_superseded_navigation_cannot_write() {
	let platform = MemoryPlatform::desktop();
	let auth = Rc::new(SpyAuth::signed_in(true));
	let released = Rc::new(Cell::new(false));
	let slow_result = Rc::new(RefCell::new(None));

	let gate = Rc::clone(&released);
	let result_slot = Rc::clone(&slow_result);
	let router = Router::new(app_with(&platform, auth))
		.routes(standard_routes())
		.route(Route::new("/lento", move |ctx: PageContext| {
			let gate = Rc::clone(&gate);
			let result_slot = Rc::clone(&result_slot);
			async move {
				while !gate.get() {
					tokio::task::yield_now().await;
				}
				let result = ctx.container.set_content(html::p().text("lento"));
				*result_slot.borrow_mut() = Some(result.clone());
				result?;
				Ok::<(), PageError>(())
			}
		}));

	platform.location.set_fragment("/lento");
	let slow = router.handle_location_change();
	let fast = async {
		tokio::task::yield_now().await;
		platform.location.set_fragment("/clientes");
		let outcome = router.handle_location_change().await;
		released.set(true);
		outcome
	};
	let (slow, fast) = futures_util::join!(slow, fast);

	assert_eq!(slow, NavigationOutcome::Superseded);
	assert_eq!(
		fast,
		NavigationOutcome::Rendered {
			path: "/clientes".to_string()
		}
	);
	assert_eq!(*slow_result.borrow(), Some(Err(DomError::Stale)));
	assert_eq!(platform.dom.text("main-content").as_deref(), Some("clientes"));
	assert_eq!(router.current_path().as_deref(), Some("/clientes"));
	assert_eq!(router.epoch(), 2);
}

#[rstest]
#[tokio::test]
async fn test_component_error_shows_panel() {
	let platform = MemoryPlatform::desktop();
	let router = Router::new(app_with(&platform, Rc::new(SpyAuth::signed_in(true)))).route(
		Route::new("/roto", failing_page).title("Roto"),
	);

	platform.location.set_fragment("/roto");
	let outcome = router.handle_location_change().await;

	assert!(matches!(outcome, NavigationOutcome::RenderFailed { .. }));
	assert!(!platform.dom.contains(PAGE_LOADING_ID));
	let panel = platform.dom.render_to_string();
	assert!(panel.contains("page-error"));
	assert!(panel.contains("&lt;b&gt;sin conexión&lt;/b&gt;"));
	// The chrome still reflects the route
	assert_eq!(platform.dom.document_title(), "Roto - Mi SaaS");
}

#[rstest]
#[tokio::test]
async fn test_component_panic_shows_panel() {
	let platform = MemoryPlatform::desktop();
	let router = Router::new(app_with(&platform, Rc::new(SpyAuth::signed_in(true))))
		.route(Route::new("/panico", panicking_page))
		.route(Route::new("/clientes", |ctx| text_page(ctx, "clientes")));

	platform.location.set_fragment("/panico");
	let outcome = router.handle_location_change().await;

	match outcome {
		NavigationOutcome::RenderFailed {
			error: RouterError::Panicked(message),
			..
		} => assert_eq!(message, "explotó"),
		other => panic!("unexpected outcome {:?}", other),
	}
	assert!(platform.dom.text("main-content").unwrap().contains("explotó"));

	// The router keeps working after a panic
	platform.location.set_fragment("/clientes");
	assert!(matches!(
		router.handle_location_change().await,
		NavigationOutcome::Rendered { .. }
	));
}

#[rstest]
#[tokio::test]
async fn test_active_entry_and_titles(signed_in: RouterEnv) {
	signed_in.go("/dashboard").await;
	assert!(signed_in.platform.dom.has_class("sidebar-link-dashboard", ACTIVE_ITEM_CLASS));

	signed_in.go("/clientes").await;

	let dom = &signed_in.platform.dom;
	assert!(dom.has_class("sidebar-link-clients", ACTIVE_ITEM_CLASS));
	assert!(!dom.has_class("sidebar-link-dashboard", ACTIVE_ITEM_CLASS));
	assert_eq!(dom.elements_with_class(ACTIVE_ITEM_CLASS).len(), 1);
	assert_eq!(dom.document_title(), "Clientes - Mi SaaS");
	assert_eq!(dom.text(TOPBAR_TITLE_ID).as_deref(), Some("Clientes"));
	assert_eq!(
		signed_in.router.app().state().snapshot().sidebar.active_item.as_deref(),
		Some("#/clientes")
	);
}

#[rstest]
#[tokio::test]
async fn test_missing_container_fails_navigation() {
	let platform = MemoryPlatform::desktop();
	let app = AppContext::new(
		Rc::clone(&platform.settings),
		&platform.platform(),
		Rc::new(SpyAuth::signed_in(true)),
	);
	let router = Router::new(app).routes(standard_routes());

	platform.location.set_fragment("/clientes");
	let outcome = router.handle_location_change().await;

	assert!(matches!(
		outcome,
		NavigationOutcome::RenderFailed {
			error: RouterError::Container(DomError::NotFound(_)),
			..
		}
	));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
	/// Any single segment is captured verbatim by a `:id` route.
	#[test]
	fn prop_param_segment_is_captured(id in r"[A-Za-z0-9_.\-]{1,40}") {
		prop_assume!(id != "nuevo");
		let platform = MemoryPlatform::desktop();
		let router = Router::new(platform.app_context()).routes(standard_routes());

		let m = router.match_path(&format!("/trabajos/{}", id));

		prop_assert!(m.is_some());
		let m = m.unwrap();
		prop_assert_eq!(m.route.path(), "/trabajos/:id");
		prop_assert_eq!(m.params.get("id"), Some(&id));
	}

	/// Paths with an extra segment never match a single-segment pattern.
	#[test]
	fn prop_param_does_not_span_segments(
		a in r"[a-z0-9]{1,10}",
		b in r"[a-z0-9]{1,10}",
	) {
		let platform = MemoryPlatform::desktop();
		let router = Router::new(platform.app_context()).routes(standard_routes());

		let path = format!("/trabajos/{}/{}", a, b);
		prop_assert!(router.match_path(&path).is_none());
	}
}
