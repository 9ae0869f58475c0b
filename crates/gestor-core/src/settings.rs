//! Shell configuration.
//!
//! All sections use `#[serde(default)]`, so a settings file only needs the
//! values it overrides:
//!
//! ```toml
//! app_name = "Taller"
//!
//! [breakpoints]
//! mobile = 768
//!
//! [sidebar]
//! persistence = false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level settings for the application shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
	/// Suffix of every document title (`"{page} - {app_name}"`).
	pub app_name: String,
	/// Sidebar behaviour, widths and menu.
	pub sidebar: SidebarSettings,
	/// Responsive breakpoints.
	pub breakpoints: Breakpoints,
	/// Topbar behaviour and user menu.
	pub topbar: TopBarSettings,
	/// Persistence keys.
	pub storage: StorageSettings,
	/// Fixed routes and mount points.
	pub navigation: NavigationSettings,
	/// Touch gesture thresholds.
	pub gestures: GestureSettings,
}

impl Default for ShellSettings {
	fn default() -> Self {
		Self {
			app_name: "Mi SaaS".to_string(),
			sidebar: SidebarSettings::default(),
			breakpoints: Breakpoints::default(),
			topbar: TopBarSettings::default(),
			storage: StorageSettings::default(),
			navigation: NavigationSettings::default(),
			gestures: GestureSettings::default(),
		}
	}
}

impl ShellSettings {
	/// Parses and validates settings from TOML.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Parses and validates settings from JSON.
	pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
		let settings: Self = serde_json::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks the constraints serde cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.breakpoints.mobile == 0 {
			return Err(ConfigError::Invalid {
				field: "breakpoints.mobile",
				reason: "must be greater than zero".to_string(),
			});
		}
		if self.sidebar.open_width == 0 {
			return Err(ConfigError::Invalid {
				field: "sidebar.open_width",
				reason: "must be greater than zero".to_string(),
			});
		}
		if self.storage.namespace.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "storage.namespace",
				reason: "must not be empty".to_string(),
			});
		}
		for (field, path) in [
			("navigation.fallback", &self.navigation.fallback),
			("navigation.login", &self.navigation.login),
		] {
			if !path.starts_with('/') {
				return Err(ConfigError::Invalid {
					field,
					reason: format!("'{}' must start with '/'", path),
				});
			}
		}
		Ok(())
	}

	/// Returns true when `width` falls below the mobile breakpoint.
	pub fn is_mobile_width(&self, width: u32) -> bool {
		width < self.breakpoints.mobile
	}

	/// Formats a page title with the application name.
	pub fn document_title(&self, title: &str) -> String {
		format!("{} - {}", title, self.app_name)
	}
}

/// Sidebar behaviour and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarSettings {
	/// Open state used when nothing is persisted (or persistence is off).
	pub default_open: bool,
	/// Whether the desktop open state survives reloads.
	pub persistence: bool,
	/// Main content margin when the sidebar is open, in pixels.
	pub open_width: u32,
	/// Main content margin when the sidebar is collapsed, in pixels.
	pub collapsed_width: u32,
	/// Navigation entries.
	pub items: Vec<SidebarItem>,
	/// Footer block.
	pub footer: SidebarFooter,
}

impl Default for SidebarSettings {
	fn default() -> Self {
		Self {
			default_open: true,
			persistence: true,
			open_width: 300,
			collapsed_width: 80,
			items: default_items(),
			footer: SidebarFooter::default(),
		}
	}
}

fn default_items() -> Vec<SidebarItem> {
	vec![
		SidebarItem::link("dashboard", "Dashboard", "📊", "#/dashboard").tooltip("Panel principal"),
		SidebarItem::group("sales", "Ventas", "💰")
			.tooltip("Gestión de ventas")
			.sub_item(SidebarSubItem::new("new-sale", "Nueva Venta", "#/sales/new").icon("➕"))
			.sub_item(SidebarSubItem::new("sales-list", "Lista de Ventas", "#/sales").icon("📋"))
			.sub_item(SidebarSubItem::new("invoices", "Facturas", "#/sales/invoices").icon("🧾")),
		SidebarItem::link("jobs", "Trabajos", "🔧", "#/trabajos").tooltip("Gestión de trabajos"),
		SidebarItem::link("clients", "Clientes", "👥", "#/clientes").tooltip("Base de clientes"),
		SidebarItem::link("companies", "Empresas", "🏢", "#/empresas").tooltip("Empresas"),
		SidebarItem::link("team", "Mi Equipo", "👤", "#/equipo").tooltip("Miembros del grupo"),
	]
}

/// A top-level sidebar entry. Entries with sub-items act as expandable groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarItem {
	/// Stable identifier (also the key stored in `expanded_items`).
	pub id: String,
	/// Visible label.
	pub label: String,
	/// Icon text (usually an emoji).
	#[serde(default)]
	pub icon: String,
	/// Link target (`#/path`); ignored for groups.
	#[serde(default)]
	pub href: Option<String>,
	/// Tooltip shown while the sidebar is collapsed.
	#[serde(default)]
	pub tooltip: Option<String>,
	/// Children of an expandable group.
	#[serde(default)]
	pub sub_items: Vec<SidebarSubItem>,
}

impl SidebarItem {
	/// Creates a plain link entry.
	pub fn link(
		id: impl Into<String>,
		label: impl Into<String>,
		icon: impl Into<String>,
		href: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			icon: icon.into(),
			href: Some(href.into()),
			tooltip: None,
			sub_items: Vec::new(),
		}
	}

	/// Creates an expandable group entry.
	pub fn group(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			icon: icon.into(),
			href: None,
			tooltip: None,
			sub_items: Vec::new(),
		}
	}

	/// Sets the tooltip.
	pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}

	/// Appends a sub-item.
	pub fn sub_item(mut self, item: SidebarSubItem) -> Self {
		self.sub_items.push(item);
		self
	}

	/// Returns true when the entry expands instead of navigating.
	pub fn has_sub_items(&self) -> bool {
		!self.sub_items.is_empty()
	}
}

/// A child of an expandable sidebar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarSubItem {
	/// Stable identifier.
	pub id: String,
	/// Visible label.
	pub label: String,
	/// Link target (`#/path`).
	pub href: String,
	/// Optional icon text.
	#[serde(default)]
	pub icon: Option<String>,
}

impl SidebarSubItem {
	/// Creates a sub-item.
	pub fn new(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			href: href.into(),
			icon: None,
		}
	}

	/// Sets the icon.
	pub fn icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}
}

/// Sidebar footer block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarFooter {
	/// Whether the footer is rendered at all.
	pub enabled: bool,
	/// Skip the footer while the sidebar is collapsed.
	pub hide_when_collapsed: bool,
	/// Version string.
	pub version: Option<String>,
	/// Help/documentation links.
	pub links: Vec<FooterLink>,
}

impl Default for SidebarFooter {
	fn default() -> Self {
		Self {
			enabled: true,
			hide_when_collapsed: true,
			version: Some("v2.0.0".to_string()),
			links: vec![
				FooterLink {
					label: "Ayuda".to_string(),
					href: "/help.html".to_string(),
					icon: Some("❓".to_string()),
				},
				FooterLink {
					label: "Docs".to_string(),
					href: "/docs.html".to_string(),
					icon: Some("📖".to_string()),
				},
			],
		}
	}
}

/// A link in the sidebar footer (opened in a new tab).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
	/// Visible label.
	pub label: String,
	/// Target URL.
	pub href: String,
	/// Optional icon text.
	#[serde(default)]
	pub icon: Option<String>,
}

/// Responsive breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
	/// Widths strictly below this value are treated as mobile.
	pub mobile: u32,
}

impl Default for Breakpoints {
	fn default() -> Self {
		Self { mobile: 750 }
	}
}

/// Topbar behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopBarSettings {
	/// Scroll offset above which the topbar turns compact.
	pub scroll_threshold: f64,
	/// Whether scrolling toggles compact mode at all.
	pub compact_on_scroll: bool,
	/// Show the search trigger.
	pub search_enabled: bool,
	/// Show the notifications button.
	pub notifications_enabled: bool,
	/// Number shown on the notifications badge (hidden at zero).
	pub notification_badge: u32,
	/// Entries of the user dropdown.
	pub user_menu: Vec<UserMenuEntry>,
}

impl Default for TopBarSettings {
	fn default() -> Self {
		Self {
			scroll_threshold: 100.0,
			compact_on_scroll: true,
			search_enabled: true,
			notifications_enabled: true,
			notification_badge: 0,
			user_menu: vec![
				UserMenuEntry::Link {
					id: "profile".to_string(),
					label: "Mi Perfil".to_string(),
					icon: "👤".to_string(),
					href: "#/perfil".to_string(),
				},
				UserMenuEntry::Link {
					id: "settings".to_string(),
					label: "Ajustes".to_string(),
					icon: "⚙️".to_string(),
					href: "#/configuracion-grupo".to_string(),
				},
				UserMenuEntry::Divider,
				UserMenuEntry::Action {
					id: "logout".to_string(),
					label: "Cerrar Sesión".to_string(),
					icon: "🚪".to_string(),
					action: "logout".to_string(),
					danger: true,
				},
			],
		}
	}
}

/// An entry of the user dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserMenuEntry {
	/// Navigates to `href`.
	Link {
		/// Stable identifier.
		id: String,
		/// Visible label.
		label: String,
		/// Icon text.
		icon: String,
		/// Link target.
		href: String,
	},
	/// Triggers a UI action (see the `data-action` names of the shell).
	Action {
		/// Stable identifier.
		id: String,
		/// Visible label.
		label: String,
		/// Icon text.
		icon: String,
		/// Action name.
		action: String,
		/// Rendered with the danger style.
		#[serde(default)]
		danger: bool,
	},
	/// Horizontal separator.
	Divider,
}

/// Persistence keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
	/// Prefix of every stored key.
	pub namespace: String,
}

impl Default for StorageSettings {
	fn default() -> Self {
		Self {
			namespace: "template".to_string(),
		}
	}
}

impl StorageSettings {
	/// Key holding the desktop sidebar open flag.
	pub fn sidebar_state_key(&self) -> String {
		format!("{}:sidebar:state", self.namespace)
	}

	/// Key holding the expanded sidebar item ids.
	pub fn sidebar_expanded_key(&self) -> String {
		format!("{}:sidebar:expanded", self.namespace)
	}
}

/// Fixed routes and mount points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
	/// Where unknown paths and failed guards land.
	pub fallback: String,
	/// Where unauthenticated visitors land.
	pub login: String,
	/// Id of the element the router renders pages into.
	pub container_id: String,
	/// Id of the element the shell mounts into.
	pub root_id: String,
}

impl Default for NavigationSettings {
	fn default() -> Self {
		Self {
			fallback: "/dashboard".to_string(),
			login: "/login".to_string(),
			container_id: "main-content".to_string(),
			root_id: "app".to_string(),
		}
	}
}

/// Touch gesture thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
	/// Minimum horizontal travel, in pixels, for a swipe.
	pub min_swipe_distance: f64,
}

impl Default for GestureSettings {
	fn default() -> Self {
		Self {
			min_swipe_distance: 50.0,
		}
	}
}
