//! # Gestor
//!
//! Client-side shell of the gestor admin panel, compiled to WebAssembly.
//!
//! The shell owns everything around the pages: a hash router with guards,
//! the layout chrome (topbar, collapsible sidebar, mobile overlay), a
//! right-hand form panel and the session lifecycle. Pages are async
//! functions that receive a [`PageContext`](pages::PageContext) and render
//! into the main content container.
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything below
//! - `pages` - router, layout, form panel and bootstrap
//! - `auth` - identity contract and `AuthIntegration`
//! - `console_error_panic_hook` - readable panics in the browser console
//!
//! ## Crates
//!
//! - [`core`]: settings, State Manager, event bus, DOM/storage/viewport
//! - [`auth`]: identity provider contract and session integration
//! - [`pages`]: router, Template Manager, form panel, shell
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use gestor::prelude::*;
//!
//! async fn dashboard(ctx: PageContext) -> Result<(), PageError> {
//!     ctx.container.set_content(html::h2().text("Dashboard"))?;
//!     Ok(())
//! }
//!
//! #[wasm_bindgen(start)]
//! pub fn main() {
//!     let routes = vec![
//!         Route::new("/login", login).title("Ingresar").guest_only(),
//!         Route::new("/dashboard", dashboard).title("Dashboard").requires_auth(),
//!     ];
//!     gestor::pages::launch(ShellSettings::default(), Rc::new(MyProvider::new()), routes);
//! }
//! ```

pub mod core;

#[cfg(feature = "auth")]
pub mod auth;
#[cfg(feature = "pages")]
pub mod pages;

pub use gestor_core::{debug_log, error_log, info_log, warn_log};

/// Common imports for page modules.
pub mod prelude {
	pub use gestor_core::markup::html;
	pub use gestor_core::{
		Element, LayoutState, Node, ShellEvent, ShellSettings, SidebarItem, SidebarSubItem,
		StateManager, Topic,
	};

	#[cfg(feature = "auth")]
	pub use gestor_auth::{AuthIntegration, Authenticator, IdentityProvider, UserData};

	#[cfg(feature = "pages")]
	pub use gestor_pages::{
		AppContext, NavigationOutcome, PageContainer, PageContext, PageError, Route, Router,
		Shell, TemplateManager,
	};

	pub use std::rc::Rc;
}
