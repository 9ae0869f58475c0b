//! Topbar markup.

use gestor_auth::UserData;
use gestor_auth::user::DEFAULT_NAME;
use gestor_core::markup::html;
use gestor_core::{Element, TopBarSettings, UserMenuEntry};

use super::{TOPBAR_ID, TOPBAR_TITLE_ID, USER_DROPDOWN_ID, USER_DROPDOWN_OPEN_CLASS};

/// Renders the topbar with `title` and the user block.
pub fn render_topbar(
	settings: &TopBarSettings,
	title: &str,
	user: Option<&UserData>,
	menu_open: bool,
) -> Element {
	let left = html::div()
		.class("topbar-left")
		.child(
			html::button()
				.id("sidebar-toggle")
				.class("topbar-hamburger")
				.attr("type", "button")
				.attr("data-action", "toggle-sidebar")
				.attr("aria-label", "Alternar menú")
				.text("☰"),
		)
		.child(html::h1().id(TOPBAR_TITLE_ID).class("topbar-title").text(title));

	let search = settings.search_enabled.then(|| {
		html::button()
			.id("topbar-search")
			.class("topbar-search")
			.attr("type", "button")
			.attr("data-action", "open-search")
			.attr("aria-label", "Buscar")
			.text("🔍")
	});

	let notifications = settings.notifications_enabled.then(|| {
		let badge = (settings.notification_badge > 0).then(|| {
			html::span()
				.class("topbar-badge")
				.text(settings.notification_badge.to_string())
		});
		html::button()
			.id("topbar-notifications")
			.class("topbar-notifications")
			.attr("type", "button")
			.attr("aria-label", "Notificaciones")
			.child(html::span().text("🔔"))
			.child_opt(badge)
	});

	let right = html::div()
		.class("topbar-right")
		.child_opt(search)
		.child_opt(notifications)
		.child(render_user_menu(&settings.user_menu, user, menu_open));

	html::header()
		.id(TOPBAR_ID)
		.class("topbar")
		.child(left)
		.child(right)
}

fn render_user_menu(entries: &[UserMenuEntry], user: Option<&UserData>, open: bool) -> Element {
	let name = user.map(|u| u.name.as_str()).unwrap_or(DEFAULT_NAME);

	let trigger = html::button()
		.id("user-trigger")
		.class("user-trigger")
		.attr("type", "button")
		.attr("data-action", "toggle-user-menu")
		.attr("aria-haspopup", "true")
		.attr("aria-expanded", open.to_string())
		.child_opt(user.map(|u| {
			html::img()
				.class("user-avatar")
				.attr("src", u.avatar_url.as_str())
				.attr("alt", u.name.as_str())
		}))
		.child(html::span().class("user-name").text(name));

	let header = html::div()
		.class("user-dropdown__header")
		.child(html::strong().text(name))
		.child_opt(user.map(|u| html::span().class("user-dropdown__email").text(u.email.as_str())));

	let dropdown = html::div()
		.id(USER_DROPDOWN_ID)
		.class("user-dropdown")
		.class_if(USER_DROPDOWN_OPEN_CLASS, open)
		.attr("role", "menu")
		.child(header)
		.children(entries.iter().map(render_entry));

	html::div().class("user-menu").child(trigger).child(dropdown)
}

fn render_entry(entry: &UserMenuEntry) -> Element {
	match entry {
		UserMenuEntry::Link {
			id,
			label,
			icon,
			href,
		} => html::a()
			.id(format!("user-menu-{}", id))
			.class("user-dropdown__item")
			.attr("href", href.as_str())
			.attr("role", "menuitem")
			.attr("data-action", "close-user-menu")
			.child(html::span().text(icon.as_str()))
			.child(html::span().text(label.as_str())),
		UserMenuEntry::Action {
			id,
			label,
			icon,
			action,
			danger,
		} => html::button()
			.id(format!("user-menu-{}", id))
			.class("user-dropdown__item")
			.class_if("user-dropdown__item--danger", *danger)
			.attr("type", "button")
			.attr("role", "menuitem")
			.attr("data-action", action.as_str())
			.child(html::span().text(icon.as_str()))
			.child(html::span().text(label.as_str())),
		UserMenuEntry::Divider => html::div().class("user-dropdown__divider").attr("role", "separator"),
	}
}
