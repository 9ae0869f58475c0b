//! Layout state to DOM classes and styles.
//!
//! [`present`] is pure; [`apply`] writes every value it describes, so it can
//! run after any event without knowing what the document looked like before.

use gestor_core::{Dom, LayoutState, ShellSettings, debug_log};

use super::{
	SIDEBAR_COLLAPSED_CLASS, SIDEBAR_ID, SIDEBAR_MOBILE_OPEN_CLASS, SIDEBAR_OVERLAY_ID,
	SIDEBAR_OVERLAY_MODE_CLASS, SIDEBAR_OVERLAY_VISIBLE_CLASS, TOPBAR_COMPACT_CLASS, TOPBAR_ID,
};

/// Classes and styles the chrome must carry for a layout state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromePresentation {
	/// `sidebar--collapsed` (desktop only).
	pub sidebar_collapsed: bool,
	/// `sidebar--mobile-open` (mobile only).
	pub sidebar_mobile_open: bool,
	/// `sidebar--overlay`: the sidebar floats over the content.
	pub sidebar_overlay_mode: bool,
	/// `sidebar-overlay--visible` on the backdrop.
	pub overlay_visible: bool,
	/// Inline `margin-left` of the content container.
	pub main_margin_left: String,
	/// `topbar--compact`.
	pub topbar_compact: bool,
}

/// Derives the chrome presentation.
///
/// On mobile the sidebar is an overlay and never takes layout space; on
/// desktop it is either open or collapsed and the content margin follows.
pub fn present(state: &LayoutState, is_mobile: bool, settings: &ShellSettings) -> ChromePresentation {
	let is_open = state.sidebar.is_open;
	if is_mobile {
		ChromePresentation {
			sidebar_collapsed: false,
			sidebar_mobile_open: is_open,
			sidebar_overlay_mode: true,
			overlay_visible: is_open,
			main_margin_left: "0".to_string(),
			topbar_compact: state.top_bar.is_compact,
		}
	} else {
		let width = if is_open {
			settings.sidebar.open_width
		} else {
			settings.sidebar.collapsed_width
		};
		ChromePresentation {
			sidebar_collapsed: !is_open,
			sidebar_mobile_open: false,
			sidebar_overlay_mode: false,
			overlay_visible: false,
			main_margin_left: format!("{}px", width),
			topbar_compact: state.top_bar.is_compact,
		}
	}
}

/// Writes `presentation` to the chrome. Missing elements are skipped.
pub fn apply(dom: &dyn Dom, settings: &ShellSettings, presentation: &ChromePresentation) {
	let classes = [
		(SIDEBAR_ID, SIDEBAR_COLLAPSED_CLASS, presentation.sidebar_collapsed),
		(SIDEBAR_ID, SIDEBAR_MOBILE_OPEN_CLASS, presentation.sidebar_mobile_open),
		(SIDEBAR_ID, SIDEBAR_OVERLAY_MODE_CLASS, presentation.sidebar_overlay_mode),
		(SIDEBAR_OVERLAY_ID, SIDEBAR_OVERLAY_VISIBLE_CLASS, presentation.overlay_visible),
		(TOPBAR_ID, TOPBAR_COMPACT_CLASS, presentation.topbar_compact),
	];
	for (id, class, enabled) in classes {
		if let Err(e) = dom.set_class(id, class, enabled) {
			debug_log!("Skipping {} on #{}: {}", class, id, e);
		}
	}

	let container = &settings.navigation.container_id;
	if let Err(e) = dom.set_style(container, "margin-left", Some(&presentation.main_margin_left)) {
		debug_log!("Skipping content margin: {}", e);
	}
}
