//! Layout state and platform layer
//!
//! Settings, the State Manager with its event bus, the element tree and the
//! DOM, storage and viewport abstractions.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gestor::core::{ShellSettings, ShellEvent, Topic};
//!
//! let settings = ShellSettings::from_toml_str(include_str!("gestor.toml"))?;
//! state.subscribe(Topic::SidebarToggle, |event| {
//!     if let ShellEvent::SidebarToggle { is_open, .. } = event {
//!         gestor::info_log!("sidebar open: {}", is_open);
//!     }
//! });
//! ```

// Re-export all gestor-core functionality
pub use gestor_core::*;
