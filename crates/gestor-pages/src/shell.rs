//! Application bootstrap.
//!
//! [`Shell`] ties the pieces together: it resolves the session, mounts the
//! chrome (or the bare container for visitors), reacts to sign-in and
//! sign-out, and handles the initial fragment.

use std::fmt;
use std::rc::{Rc, Weak};

use gestor_auth::{AuthIntegration, IdentityProvider};
use gestor_core::spawn::spawn_local;
use gestor_core::{ShellSettings, error_log, info_log, warn_log};

use crate::app::{AppContext, Platform};
use crate::error::ShellError;
use crate::layout::TemplateManager;
use crate::router::{Route, Router};

struct Inner {
	app: AppContext,
	auth: AuthIntegration,
	router: Rc<Router>,
	template: TemplateManager,
}

/// The running application. Clones share it.
#[derive(Clone)]
pub struct Shell {
	inner: Rc<Inner>,
}

impl fmt::Debug for Shell {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Shell")
			.field("router", &self.inner.router)
			.field("template", &self.inner.template)
			.finish()
	}
}

impl Shell {
	/// Assembles the shell. Nothing touches the document until
	/// [`start`](Self::start).
	pub fn new(
		settings: ShellSettings,
		platform: Platform,
		provider: Rc<dyn IdentityProvider>,
		routes: Vec<Route>,
	) -> Self {
		let auth = AuthIntegration::new(provider);
		let app = AppContext::new(Rc::new(settings), &platform, Rc::new(auth.clone()));
		let router = Rc::new(Router::new(app.clone()).routes(routes));
		let template = TemplateManager::new(app.clone());
		Self {
			inner: Rc::new(Inner {
				app,
				auth,
				router,
				template,
			}),
		}
	}

	/// The application context.
	pub fn app(&self) -> &AppContext {
		&self.inner.app
	}

	/// The router.
	pub fn router(&self) -> &Rc<Router> {
		&self.inner.router
	}

	/// The layout.
	pub fn template(&self) -> &TemplateManager {
		&self.inner.template
	}

	/// The session integration.
	pub fn auth(&self) -> &AuthIntegration {
		&self.inner.auth
	}

	/// Starts the application.
	///
	/// 1. validates the settings and checks that the root element exists
	/// 2. resolves the session
	/// 3. mounts the chrome for a signed-in user, the bare container
	///    otherwise
	/// 4. handles the current fragment
	///
	/// In the browser it also installs the DOM event listeners. No redirect
	/// happens here; route guards decide where the visitor lands.
	pub async fn start(&self) -> Result<(), ShellError> {
		let settings = self.inner.app.settings();
		settings.validate()?;
		let navigation = &settings.navigation;
		if !self.inner.app.dom().contains(&navigation.root_id) {
			return Err(ShellError::RootMissing(navigation.root_id.clone()));
		}

		self.install_auth_hooks();

		match self.inner.auth.init().await {
			Some(user) => {
				info_log!("Starting shell for {}", user.email);
				self.inner.template.init()?;
			}
			None => {
				info_log!("Starting shell without a session");
				self.inner.template.mount_bare()?;
			}
		}

		#[cfg(target_arch = "wasm32")]
		crate::browser::attach(self)?;

		self.inner.router.handle_location_change().await;
		Ok(())
	}

	fn install_auth_hooks(&self) {
		let weak = Rc::downgrade(&self.inner);
		self.inner.auth.on_redirect_to_login(move || {
			if let Some(inner) = weak.upgrade() {
				Shell { inner }.session_ended();
			}
		});

		let weak: Weak<Inner> = Rc::downgrade(&self.inner);
		self.inner.auth.on_signed_in(move |user| {
			if let Some(inner) = weak.upgrade() {
				info_log!("Signed in as {}", user.email);
				Shell { inner }.session_started();
			}
		});
	}

	fn session_ended(&self) {
		self.inner.template.teardown();
		let login = &self.inner.app.settings().navigation.login;
		let fragment = self.inner.app.location().fragment();
		let current = fragment.split('?').next().unwrap_or_default();
		if current == login {
			// Same fragment: no change signal will come, so re-render here.
			self.spawn_navigation();
		} else {
			warn_log!("Session ended, redirecting to {}", login);
			self.inner.router.navigate_to(login);
		}
	}

	fn session_started(&self) {
		if let Err(e) = self.inner.template.init() {
			error_log!("Cannot mount layout after sign-in: {}", e);
		}
		self.spawn_navigation();
	}

	fn spawn_navigation(&self) {
		let router = Rc::clone(&self.inner.router);
		spawn_local(async move {
			router.handle_location_change().await;
		});
	}
}
