//! Layout chrome: topbar, sidebar, overlays and the Template Manager.
//!
//! Markup is produced by plain render functions ([`render_sidebar`],
//! [`render_topbar`]); classes and inline styles that depend on the layout
//! state come from [`present`] and are written by [`apply`].

mod presentation;
mod sidebar;
mod template;
mod topbar;

pub use presentation::{ChromePresentation, apply, present};
pub use sidebar::render_sidebar;
pub use template::{LoadingHandle, SidebarItemPatch, TemplateManager};
pub use topbar::render_topbar;

/// Topbar element.
pub const TOPBAR_ID: &str = "topbar";
/// Page title inside the topbar.
pub const TOPBAR_TITLE_ID: &str = "topbar-title";
/// Sidebar element.
pub const SIDEBAR_ID: &str = "sidebar";
/// Backdrop behind the mobile sidebar.
pub const SIDEBAR_OVERLAY_ID: &str = "sidebar-overlay";
/// User dropdown.
pub const USER_DROPDOWN_ID: &str = "user-dropdown";

/// Marks the sidebar entry of the current route.
pub const ACTIVE_ITEM_CLASS: &str = "sidebar-item--active";
/// Marks an expanded sidebar group.
pub const EXPANDED_ITEM_CLASS: &str = "sidebar-item--expanded";
/// Desktop sidebar reduced to icons.
pub const SIDEBAR_COLLAPSED_CLASS: &str = "sidebar--collapsed";
/// Mobile sidebar slid in.
pub const SIDEBAR_MOBILE_OPEN_CLASS: &str = "sidebar--mobile-open";
/// Sidebar floating over the content (mobile).
pub const SIDEBAR_OVERLAY_MODE_CLASS: &str = "sidebar--overlay";
/// Visible sidebar backdrop.
pub const SIDEBAR_OVERLAY_VISIBLE_CLASS: &str = "sidebar-overlay--visible";
/// Compact topbar.
pub const TOPBAR_COMPACT_CLASS: &str = "topbar--compact";
/// Open user dropdown.
pub const USER_DROPDOWN_OPEN_CLASS: &str = "user-dropdown--open";

/// Id of the row of a sidebar group.
pub fn sidebar_item_id(item_id: &str) -> String {
	format!("sidebar-item-{}", item_id)
}

/// Id of the clickable element of a sidebar entry.
pub fn sidebar_link_id(item_id: &str) -> String {
	format!("sidebar-link-{}", item_id)
}

/// Id of the sub-item list of a sidebar group.
pub fn sidebar_subitems_id(item_id: &str) -> String {
	format!("sidebar-subitems-{}", item_id)
}
