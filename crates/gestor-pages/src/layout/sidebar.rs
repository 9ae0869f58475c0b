//! Sidebar markup.

use gestor_core::markup::html;
use gestor_core::{Element, SidebarFooter, SidebarItem, SidebarState, SidebarSubItem};

use super::{
	ACTIVE_ITEM_CLASS, EXPANDED_ITEM_CLASS, SIDEBAR_ID, sidebar_item_id, sidebar_link_id,
	sidebar_subitems_id,
};

/// Renders the whole sidebar.
///
/// `collapsed` is the desktop icon-only mode: labels, sub-items and (if
/// configured) the footer are left out and each entry carries a tooltip.
/// State classes of the `<aside>` itself are written by
/// [`apply`](super::apply).
pub fn render_sidebar(
	items: &[SidebarItem],
	footer: &SidebarFooter,
	state: &SidebarState,
	collapsed: bool,
) -> Element {
	let nav = html::nav()
		.class("sidebar-nav")
		.children(items.iter().map(|item| render_item(item, state, collapsed)));

	let show_footer = footer.enabled && !(collapsed && footer.hide_when_collapsed);

	html::aside()
		.id(SIDEBAR_ID)
		.class("sidebar")
		.attr("aria-label", "Navegación principal")
		.child(render_search(collapsed))
		.child(nav)
		.child_opt(show_footer.then(|| render_footer(footer)))
}

fn render_search(collapsed: bool) -> Element {
	html::div().class("sidebar-header").child(
		html::button()
			.id("sidebar-search")
			.class("sidebar-search")
			.attr("type", "button")
			.attr("data-action", "open-search")
			.attr_opt("data-tooltip", collapsed.then_some("Buscar"))
			.child(html::span().class("sidebar-search__icon").text("🔍"))
			.child_opt((!collapsed).then(|| html::span().class("sidebar-search__label").text("Buscar...")))
			.child_opt((!collapsed).then(|| html::kbd().class("sidebar-search__shortcut").text("Ctrl+K"))),
	)
}

fn item_body(icon: &str, label: &str, collapsed: bool) -> Vec<Element> {
	let mut body = vec![html::span().class("sidebar-item__icon").text(icon)];
	if !collapsed {
		body.push(html::span().class("sidebar-item__label").text(label));
	}
	body
}

fn render_item(item: &SidebarItem, state: &SidebarState, collapsed: bool) -> Element {
	let tooltip = if collapsed {
		Some(item.tooltip.clone().unwrap_or_else(|| item.label.clone()))
	} else {
		None
	};

	if !item.has_sub_items() {
		let href = item.href.clone().unwrap_or_else(|| "#".to_string());
		let active = state.active_item.as_deref() == Some(href.as_str());
		return html::a()
			.id(sidebar_link_id(&item.id))
			.class("sidebar-item")
			.class_if(ACTIVE_ITEM_CLASS, active)
			.attr("href", href)
			.attr("data-action", "navigate-link")
			.attr("data-item-id", item.id.as_str())
			.attr_opt("data-tooltip", tooltip)
			.children(item_body(&item.icon, &item.label, collapsed));
	}

	let expanded = state.expanded_items.contains(&item.id);
	let mut toggle = html::button()
		.id(sidebar_link_id(&item.id))
		.class("sidebar-item sidebar-item--parent")
		.attr("type", "button")
		.attr("data-action", "toggle-expand")
		.attr("data-item-id", item.id.as_str())
		.attr("aria-expanded", expanded.to_string())
		.attr_opt("data-tooltip", tooltip)
		.children(item_body(&item.icon, &item.label, collapsed));
	if !collapsed {
		toggle = toggle.child(html::span().class("sidebar-item__chevron").text("▾"));
	}

	let subitems = html::div()
		.id(sidebar_subitems_id(&item.id))
		.class("sidebar-subitems")
		.style("display", if expanded && !collapsed { "block" } else { "none" })
		.children(item.sub_items.iter().map(|sub| render_sub_item(sub, state)));

	html::div()
		.id(sidebar_item_id(&item.id))
		.class("sidebar-group")
		.class_if(EXPANDED_ITEM_CLASS, expanded)
		.child(toggle)
		.child(subitems)
}

fn render_sub_item(sub: &SidebarSubItem, state: &SidebarState) -> Element {
	let active = state.active_item.as_deref() == Some(sub.href.as_str());
	html::a()
		.id(sidebar_link_id(&sub.id))
		.class("sidebar-subitem")
		.class_if(ACTIVE_ITEM_CLASS, active)
		.attr("href", sub.href.as_str())
		.attr("data-action", "navigate-link")
		.attr("data-item-id", sub.id.as_str())
		.child_opt(
			sub.icon
				.as_deref()
				.map(|icon| html::span().class("sidebar-subitem__icon").text(icon)),
		)
		.child(html::span().class("sidebar-subitem__label").text(sub.label.as_str()))
}

fn render_footer(footer: &SidebarFooter) -> Element {
	let links = footer.links.iter().map(|link| {
		html::a()
			.class("sidebar-footer__link")
			.attr("href", link.href.as_str())
			.attr("target", "_blank")
			.attr("rel", "noopener noreferrer")
			.child_opt(link.icon.as_deref().map(|icon| html::span().text(icon)))
			.child(html::span().text(link.label.as_str()))
	});

	html::footer()
		.id("sidebar-footer")
		.class("sidebar-footer")
		.child(html::div().class("sidebar-footer__links").children(links))
		.child_opt(
			footer
				.version
				.as_deref()
				.map(|version| html::span().class("sidebar-footer__version").text(version)),
		)
}

#[cfg(test)]
mod tests {
	use super::*;
	use gestor_core::ShellSettings;
	use rstest::rstest;

	fn find<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
		if el.element_id() == Some(id) {
			return Some(el);
		}
		el.child_nodes()
			.iter()
			.filter_map(|n| n.as_element())
			.find_map(|child| find(child, id))
	}

	fn render(state: &SidebarState, collapsed: bool) -> Element {
		let settings = ShellSettings::default();
		render_sidebar(&settings.sidebar.items, &settings.sidebar.footer, state, collapsed)
	}

	#[rstest]
	fn test_links_and_groups() {
		let sidebar = render(&SidebarState::default(), false);

		let dashboard = find(&sidebar, "sidebar-link-dashboard").unwrap();
		assert_eq!(dashboard.tag(), "a");
		assert_eq!(dashboard.get_attr("href").as_deref(), Some("#/dashboard"));
		assert_eq!(dashboard.get_attr("data-action").as_deref(), Some("navigate-link"));

		let sales = find(&sidebar, "sidebar-link-sales").unwrap();
		assert_eq!(sales.tag(), "button");
		assert_eq!(sales.get_attr("data-action").as_deref(), Some("toggle-expand"));
		assert_eq!(sales.get_attr("data-item-id").as_deref(), Some("sales"));

		let subitems = find(&sidebar, "sidebar-subitems-sales").unwrap();
		assert_eq!(subitems.get_style("display"), Some("none"));
		assert_eq!(subitems.child_nodes().len(), 3);
	}

	#[rstest]
	fn test_expanded_and_active_state() {
		let state = SidebarState {
			is_open: true,
			active_item: Some("#/sales/invoices".to_string()),
			expanded_items: ["sales".to_string()].into_iter().collect(),
		};
		let sidebar = render(&state, false);

		assert!(find(&sidebar, "sidebar-item-sales").unwrap().has_class(EXPANDED_ITEM_CLASS));
		assert_eq!(
			find(&sidebar, "sidebar-subitems-sales").unwrap().get_style("display"),
			Some("block")
		);
		assert!(find(&sidebar, "sidebar-link-invoices").unwrap().has_class(ACTIVE_ITEM_CLASS));
		assert!(!find(&sidebar, "sidebar-link-dashboard").unwrap().has_class(ACTIVE_ITEM_CLASS));
	}

	#[rstest]
	fn test_collapsed_mode_uses_tooltips_and_hides_footer() {
		let sidebar = render(&SidebarState::default(), true);
		let jobs = find(&sidebar, "sidebar-link-jobs").unwrap();
		assert_eq!(jobs.get_attr("data-tooltip").as_deref(), Some("Gestión de trabajos"));
		assert!(!jobs.text_content().contains("Trabajos"));
		assert!(find(&sidebar, "sidebar-footer").is_none());

		let expanded = render(&SidebarState::default(), false);
		let footer = find(&expanded, "sidebar-footer").unwrap();
		assert!(footer.text_content().contains("v2.0.0"));
	}
}
