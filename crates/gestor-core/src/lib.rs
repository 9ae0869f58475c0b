//! Gestor Core - layout state and platform layer of the admin shell
//!
//! This crate holds everything the shell needs that is not routing or page
//! chrome:
//!
//! - [`settings`]: `ShellSettings`, loaded from TOML or JSON
//! - [`bus`]: typed publish/subscribe bus (`Topic` + `ShellEvent`)
//! - [`state`]: the State Manager, single owner of [`LayoutState`]
//! - [`markup`]: element tree used to describe chrome and page content
//! - [`dom`]: DOM abstraction with an in-memory and a browser backend
//! - [`storage`]: key/value persistence (localStorage in the browser)
//! - [`viewport`]: viewport width, scroll offset and touch capability
//! - [`spawn`]: fire-and-forget local tasks
//! - [`logging`]: `debug_log!`, `info_log!`, `warn_log!`, `error_log!`
//!
//! Browser implementations are compiled on `wasm32`; the in-memory ones are
//! always available so the shell can be driven from native tests.

#![warn(missing_docs)]

pub mod bus;
pub mod dom;
pub mod error;
pub mod logging;
pub mod markup;
pub mod settings;
pub mod spawn;
pub mod state;
pub mod storage;
pub mod viewport;

pub use bus::{EventBus, IntoListenerResult, ListenerResult, ShellEvent, SubscriptionId, Topic};
pub use dom::{Dom, MemoryDom};
#[cfg(target_arch = "wasm32")]
pub use dom::WebDom;
pub use error::{ConfigError, DomError, ListenerError, StorageError};
pub use markup::{Element, Node};
pub use settings::{
	Breakpoints, FooterLink, GestureSettings, NavigationSettings, ShellSettings, SidebarFooter,
	SidebarItem, SidebarSettings, SidebarSubItem, StorageSettings, TopBarSettings, UserMenuEntry,
};
pub use state::{
	FormSidebarState, LayoutState, SearchState, SidebarState, StateManager, TopBarState,
};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{KeyValueStore, MemoryStore};
#[cfg(target_arch = "wasm32")]
pub use viewport::WindowViewport;
pub use viewport::{MemoryViewport, Viewport};

#[doc(hidden)]
pub mod __private {
	#[cfg(not(target_arch = "wasm32"))]
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}
