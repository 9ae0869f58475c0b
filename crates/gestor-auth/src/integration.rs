//! [`AuthIntegration`]: the identity provider seen through the shell's
//! [`Authenticator`] contract.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use gestor_core::spawn::spawn_local;
use gestor_core::{debug_log, error_log, info_log, warn_log};

use crate::provider::{AuthChange, AuthChangeKind, IdentityProvider};
use crate::user::{IdentityUser, Profile, Session, UserData};

/// What the router and the layout need from authentication.
///
/// Nothing here fails: implementations log provider errors and answer as
/// if there were no session.
#[async_trait(?Send)]
pub trait Authenticator {
	/// Last known user, without contacting the provider.
	fn user_data(&self) -> Option<UserData>;

	/// Re-checks the session with the provider and returns the user.
	async fn current_user(&self) -> Option<UserData>;

	/// Returns true if the current user holds every permission in `required`.
	async fn check_permissions(&self, required: &[String]) -> bool;

	/// Ends the session and sends the visitor to the login route.
	async fn logout(&self);
}

type Hook = Rc<dyn Fn()>;
type UserHook = Rc<dyn Fn(UserData)>;

struct Inner {
	provider: Rc<dyn IdentityProvider>,
	user: RefCell<Option<IdentityUser>>,
	profile: RefCell<Option<Profile>>,
	listening: Cell<bool>,
	// Bumped by every auth notification and every clear. A profile load
	// that finishes under an older generation is discarded.
	generation: Cell<u64>,
	redirect_to_login: RefCell<Option<Hook>>,
	signed_in: RefCell<Option<UserHook>>,
}

/// Session state backed by an [`IdentityProvider`]. Clones share state.
#[derive(Clone)]
pub struct AuthIntegration {
	inner: Rc<Inner>,
}

impl fmt::Debug for AuthIntegration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthIntegration")
			.field("user", &self.inner.user.borrow())
			.field("profile", &self.inner.profile.borrow())
			.field("listening", &self.inner.listening.get())
			.field("generation", &self.inner.generation.get())
			.finish()
	}
}

impl AuthIntegration {
	/// Wraps a provider. Nothing is fetched until [`init`](Self::init).
	pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
		Self {
			inner: Rc::new(Inner {
				provider,
				user: RefCell::new(None),
				profile: RefCell::new(None),
				listening: Cell::new(false),
				generation: Cell::new(0),
				redirect_to_login: RefCell::new(None),
				signed_in: RefCell::new(None),
			}),
		}
	}

	/// Sets what happens when the session ends (usually navigating to the
	/// login route).
	pub fn on_redirect_to_login<F>(&self, hook: F)
	where
		F: Fn() + 'static,
	{
		*self.inner.redirect_to_login.borrow_mut() = Some(Rc::new(hook));
	}

	/// Sets what happens after a sign-in notification has been processed.
	pub fn on_signed_in<F>(&self, hook: F)
	where
		F: Fn(UserData) + 'static,
	{
		*self.inner.signed_in.borrow_mut() = Some(Rc::new(hook));
	}

	/// Resolves the current session, loads the extended profile and starts
	/// following auth notifications.
	///
	/// Returns `None` when there is no session or the provider failed.
	pub async fn init(&self) -> Option<UserData> {
		self.listen();
		match self.inner.provider.get_session().await {
			Ok(Some(session)) => {
				let generation = self.inner.generation.get();
				self.set_user(session.user, generation).await;
				let user = self.user_data();
				if let Some(user) = &user {
					info_log!("Session resolved for {}", user.email);
				}
				user
			}
			Ok(None) => {
				debug_log!("No active session");
				self.clear();
				None
			}
			Err(e) => {
				error_log!("Auth initialization failed: {}", e);
				self.clear();
				None
			}
		}
	}

	/// Sends the visitor to the login route.
	pub fn redirect_to_login(&self) {
		let hook = self.inner.redirect_to_login.borrow().clone();
		match hook {
			Some(hook) => hook(),
			None => warn_log!("Session ended but no login redirect is configured"),
		}
	}

	fn listen(&self) {
		if self.inner.listening.replace(true) {
			return;
		}
		let weak: Weak<Inner> = Rc::downgrade(&self.inner);
		self.inner
			.provider
			.on_auth_state_change(Rc::new(move |change: AuthChange| {
				if let Some(inner) = weak.upgrade() {
					AuthIntegration { inner }.handle_change(change);
				}
			}));
	}

	fn handle_change(&self, change: AuthChange) {
		debug_log!("Auth state changed: {:?}", change.kind);
		let generation = self.bump();
		if change.kind == AuthChangeKind::SignedOut {
			self.clear();
			self.redirect_to_login();
			return;
		}

		let parsed = change
			.session
			.map(Session::from_value)
			.transpose();
		let session = match parsed {
			Ok(Some(session)) => session,
			Ok(None) => {
				warn_log!("Auth notification {:?} without a session", change.kind);
				self.clear();
				self.redirect_to_login();
				return;
			}
			Err(e) => {
				error_log!("Ignoring auth notification: {}", e);
				self.clear();
				self.redirect_to_login();
				return;
			}
		};

		let same_user = self
			.inner
			.user
			.borrow()
			.as_ref()
			.is_some_and(|u| u.id == session.user.id);

		if same_user {
			*self.inner.user.borrow_mut() = Some(session.user);
			return;
		}

		// A different account: the profile has to be fetched again.
		let this = self.clone();
		let kind = change.kind;
		spawn_local(async move {
			if !this.set_user(session.user, generation).await {
				return;
			}
			if kind == AuthChangeKind::SignedIn
				&& let Some(user) = this.user_data()
			{
				let hook = this.inner.signed_in.borrow().clone();
				if let Some(hook) = hook {
					hook(user);
				}
			}
		});
	}

	fn bump(&self) -> u64 {
		let generation = self.inner.generation.get() + 1;
		self.inner.generation.set(generation);
		generation
	}

	/// Loads the profile of `user` and stores both, unless the auth state
	/// moved past `generation` while the profile was loading.
	async fn set_user(&self, user: IdentityUser, generation: u64) -> bool {
		let profile = match self.inner.provider.load_profile(&user.id).await {
			Ok(profile) => profile,
			Err(e) => {
				warn_log!("Could not load extended profile: {}", e);
				None
			}
		};
		if self.inner.generation.get() != generation {
			debug_log!("Discarding profile of {}: auth state changed meanwhile", user.id);
			return false;
		}
		*self.inner.user.borrow_mut() = Some(user);
		*self.inner.profile.borrow_mut() = profile;
		true
	}

	fn clear(&self) {
		self.bump();
		self.inner.user.borrow_mut().take();
		self.inner.profile.borrow_mut().take();
	}
}

#[async_trait(?Send)]
impl Authenticator for AuthIntegration {
	fn user_data(&self) -> Option<UserData> {
		let user = self.inner.user.borrow();
		let profile = self.inner.profile.borrow();
		user.as_ref()
			.map(|user| UserData::from_parts(user, profile.as_ref()))
	}

	async fn current_user(&self) -> Option<UserData> {
		match self.inner.provider.get_session().await {
			Ok(Some(session)) => {
				let known = self
					.inner
					.user
					.borrow()
					.as_ref()
					.is_some_and(|u| u.id == session.user.id);
				if known {
					*self.inner.user.borrow_mut() = Some(session.user);
				} else {
					let generation = self.inner.generation.get();
					self.set_user(session.user, generation).await;
				}
				self.user_data()
			}
			Ok(None) => {
				self.clear();
				None
			}
			Err(e) => {
				error_log!("Session check failed: {}", e);
				self.clear();
				None
			}
		}
	}

	async fn check_permissions(&self, required: &[String]) -> bool {
		if self.inner.user.borrow().is_none() {
			return false;
		}
		let profile = self.inner.profile.borrow();
		match profile.as_ref().and_then(|p| p.permissions.as_ref()) {
			Some(granted) => required.iter().all(|perm| granted.contains(perm)),
			// No permission system configured for this deployment
			None => true,
		}
	}

	async fn logout(&self) {
		let had_user = self.inner.user.borrow().is_some();
		if let Err(e) = self.inner.provider.sign_out().await {
			error_log!("Sign out failed: {}", e);
		}
		// A SIGNED_OUT notification has already cleared and redirected.
		if had_user && self.inner.user.borrow().is_none() {
			return;
		}
		self.clear();
		self.redirect_to_login();
	}
}
