//! In-memory platform for driving the shell without a browser.
//!
//! [`MemoryPlatform`] wires a [`MemoryDom`], [`MemoryStore`],
//! [`MemoryViewport`], [`MemoryLocation`] and [`MemoryIdentityProvider`]
//! together. The fields stay public so tests can both drive the platform
//! (resize, scroll, sign in) and inspect it (rendered document, stored
//! keys, fragment history).
//!
//! ```ignore
//! let platform = MemoryPlatform::desktop().start_at("/dashboard");
//! let shell = Shell::new(
//!     (*platform.settings).clone(),
//!     platform.platform(),
//!     platform.provider.clone(),
//!     routes(),
//! );
//! shell.start().await?;
//! ```

use std::rc::Rc;

use gestor_auth::{AuthIntegration, MemoryIdentityProvider};
use gestor_core::{Dom, MemoryDom, MemoryStore, MemoryViewport, ShellSettings};

use crate::app::{AppContext, Platform};
use crate::interaction::UiAction;
use crate::layout::TemplateManager;
use crate::router::{Location, MemoryLocation};
#[cfg(not(target_arch = "wasm32"))]
use crate::router::{NavigationOutcome, Router};

/// Width used by [`MemoryPlatform::desktop`].
pub const DESKTOP_WIDTH: u32 = 1280;
/// Width used by [`MemoryPlatform::mobile`].
pub const MOBILE_WIDTH: u32 = 375;

/// A complete in-memory platform.
#[derive(Debug)]
pub struct MemoryPlatform {
	/// Settings shared by everything built from this platform.
	pub settings: Rc<ShellSettings>,
	/// The document.
	pub dom: Rc<MemoryDom>,
	/// Durable storage.
	pub store: Rc<MemoryStore>,
	/// Viewport geometry.
	pub viewport: Rc<MemoryViewport>,
	/// The URL fragment.
	pub location: Rc<MemoryLocation>,
	/// The identity backend.
	pub provider: Rc<MemoryIdentityProvider>,
	/// Session integration over [`provider`](Self::provider).
	pub auth: AuthIntegration,
}

impl MemoryPlatform {
	/// Default settings at `width` pixels.
	pub fn new(width: u32) -> Self {
		Self::with_settings(ShellSettings::default(), width)
	}

	/// Custom settings at `width` pixels. The document root gets the
	/// configured root id.
	pub fn with_settings(settings: ShellSettings, width: u32) -> Self {
		let provider = Rc::new(MemoryIdentityProvider::new());
		let auth = AuthIntegration::new(provider.clone());
		Self {
			dom: Rc::new(MemoryDom::new(&settings.navigation.root_id)),
			store: Rc::new(MemoryStore::new()),
			viewport: Rc::new(MemoryViewport::new(width)),
			location: Rc::new(MemoryLocation::new("")),
			settings: Rc::new(settings),
			provider,
			auth,
		}
	}

	/// A desktop viewport.
	pub fn desktop() -> Self {
		Self::new(DESKTOP_WIDTH)
	}

	/// A phone-sized viewport.
	pub fn mobile() -> Self {
		Self::new(MOBILE_WIDTH)
	}

	/// Starts at `fragment` instead of an empty hash.
	pub fn start_at(mut self, fragment: &str) -> Self {
		self.location = Rc::new(MemoryLocation::new(fragment));
		self
	}

	/// The platform services as trait objects.
	pub fn platform(&self) -> Platform {
		let dom: Rc<dyn Dom> = self.dom.clone();
		Platform {
			dom,
			store: self.store.clone(),
			viewport: self.viewport.clone(),
			location: self.location.clone(),
		}
	}

	/// A fresh [`AppContext`] (with its own State Manager) authenticated
	/// through [`auth`](Self::auth).
	pub fn app_context(&self) -> AppContext {
		AppContext::new(
			Rc::clone(&self.settings),
			&self.platform(),
			Rc::new(self.auth.clone()),
		)
	}
}

/// Simulates a click on element `id` the way the delegated browser
/// listener handles it: runs its `data-action`, then follows a `#` link.
///
/// Returns false if the element does not exist.
pub fn click(platform: &MemoryPlatform, template: &TemplateManager, id: &str) -> bool {
	if !platform.dom.contains(id) {
		return false;
	}
	let item_id = platform.dom.attribute(id, "data-item-id");
	if let Some(action) = platform
		.dom
		.attribute(id, "data-action")
		.and_then(|action| UiAction::parse(&action, item_id.as_deref()))
	{
		template.dispatch(action);
	}
	if let Some(href) = platform.dom.attribute(id, "href")
		&& href.starts_with('#')
	{
		platform.location.set_fragment(&href);
	}
	true
}

/// Runs queued tasks and delivers fragment changes to `router` until both
/// are quiet. Returns the outcome of every navigation handled, in order.
#[cfg(not(target_arch = "wasm32"))]
pub async fn settle(router: &Router, location: &MemoryLocation) -> Vec<NavigationOutcome> {
	let mut outcomes = Vec::new();
	loop {
		gestor_core::spawn::run_until_idle().await;
		if location.take_pending() == 0 {
			break;
		}
		outcomes.push(router.handle_location_change().await);
	}
	outcomes
}
