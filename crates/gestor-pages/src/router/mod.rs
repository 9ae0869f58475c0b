//! Hash routing.
//!
//! Routes are matched against the URL fragment (`#/path`). Paths may contain
//! `:name` segments:
//!
//! ```ignore
//! use gestor_pages::router::{Route, Router};
//!
//! let router = Router::new(app)
//!     .route(Route::new("/login", login_page).title("Ingresar").guest_only())
//!     .route(Route::new("/trabajos/:id", job_page).title("Trabajo").requires_auth());
//! ```

mod context;
mod core;
mod location;
mod pattern;

pub use context::{NavigationToken, PageContainer, PageContext};
pub use core::{
	NavigationOutcome, PAGE_LOADING_ID, PageFuture, RedirectReason, Route, RouteMatch, Router,
	RouterPhase,
};
#[cfg(target_arch = "wasm32")]
pub use location::HashLocation;
pub use location::{Location, MemoryLocation};
pub use pattern::PathPattern;
