//! Gestor Pages - router, layout chrome and bootstrap of the admin shell
//!
//! Everything between the URL fragment and the document:
//!
//! - [`router`]: hash router with `:param` routes, guards and a
//!   latest-navigation-wins rendering pipeline
//! - [`layout`]: the Template Manager (topbar, sidebar, overlays)
//! - [`form_sidebar`]: the right-hand panel pages fill with forms
//! - [`search_modal`]: the global search dialog
//! - [`interaction`]: UI actions, keyboard shortcuts, swipes, scroll
//! - [`shell`]: start-up and session transitions
//! - [`testing`]: an in-memory platform for driving all of the above
//!
//! ## Example
//!
//! ```ignore
//! use gestor_pages::{PageContext, PageError, Route};
//! use gestor_core::markup::html;
//!
//! async fn dashboard(ctx: PageContext) -> Result<(), PageError> {
//!     ctx.container.set_content(html::h2().text("Dashboard"))?;
//!     Ok(())
//! }
//!
//! let routes = vec![
//!     Route::new("/dashboard", dashboard).title("Dashboard").requires_auth(),
//! ];
//! gestor_pages::launch(ShellSettings::default(), provider, routes);
//! ```

#![warn(missing_docs)]

pub mod app;
pub mod error;
pub mod form_sidebar;
pub mod interaction;
pub mod layout;
pub mod router;
pub mod search_modal;
pub mod shell;

// Testing utilities (available on both WASM and native)
pub mod testing;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use app::{AppContext, Platform};
#[cfg(target_arch = "wasm32")]
pub use browser::launch;
pub use error::{PageError, RouterError, ShellError};
pub use form_sidebar::FormSidebar;
pub use interaction::{KeyPress, KeyboardShortcuts, ScrollObserver, TouchGestures, UiAction};
pub use layout::{LoadingHandle, SidebarItemPatch, TemplateManager};
pub use router::{
	Location, MemoryLocation, NavigationOutcome, PageContainer, PageContext, RedirectReason, Route,
	RouteMatch, Router, RouterPhase,
};
pub use search_modal::SearchModal;
pub use shell::Shell;
