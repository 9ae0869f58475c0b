//! `data-action` names used in the chrome markup.

/// A UI action triggered by clicking an element with `data-action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
	/// `toggle-sidebar`
	ToggleSidebar,
	/// `close-sidebar` (the mobile backdrop)
	CloseSidebar,
	/// `toggle-expand` on a sidebar group; carries `data-item-id`.
	ToggleExpand(String),
	/// `navigate-link` on a sidebar link; the link itself changes the fragment.
	NavigateLink,
	/// `open-search`
	OpenSearch,
	/// `close-search` (the search backdrop)
	CloseSearch,
	/// `toggle-user-menu`
	ToggleUserMenu,
	/// `close-user-menu`
	CloseUserMenu,
	/// `logout`
	Logout,
	/// `close-form-sidebar` (close button and backdrop)
	CloseFormSidebar,
}

impl UiAction {
	/// Parses a `data-action` value. `toggle-expand` needs `item_id`.
	pub fn parse(action: &str, item_id: Option<&str>) -> Option<Self> {
		Some(match action {
			"toggle-sidebar" => Self::ToggleSidebar,
			"close-sidebar" => Self::CloseSidebar,
			"toggle-expand" => Self::ToggleExpand(item_id?.to_string()),
			"navigate-link" => Self::NavigateLink,
			"open-search" => Self::OpenSearch,
			"close-search" => Self::CloseSearch,
			"toggle-user-menu" => Self::ToggleUserMenu,
			"close-user-menu" => Self::CloseUserMenu,
			"logout" => Self::Logout,
			"close-form-sidebar" => Self::CloseFormSidebar,
			_ => return None,
		})
	}
}
