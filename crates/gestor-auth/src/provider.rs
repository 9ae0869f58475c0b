//! Identity provider contract.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::user::{Profile, Session};

/// Kind of an auth state notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeKind {
	/// A user signed in.
	SignedIn,
	/// The session ended.
	SignedOut,
	/// The access token was renewed.
	TokenRefreshed,
	/// The account data changed.
	UserUpdated,
}

/// An auth state notification as the provider delivers it.
///
/// The session travels as raw JSON; a payload that does not parse is
/// treated as "no session".
#[derive(Debug, Clone, PartialEq)]
pub struct AuthChange {
	/// What happened.
	pub kind: AuthChangeKind,
	/// Session payload, absent on sign-out.
	pub session: Option<serde_json::Value>,
}

impl AuthChange {
	/// A notification carrying a session.
	pub fn with_session(kind: AuthChangeKind, session: &Session) -> Self {
		Self {
			kind,
			session: serde_json::to_value(session).ok(),
		}
	}

	/// A sign-out notification.
	pub fn signed_out() -> Self {
		Self {
			kind: AuthChangeKind::SignedOut,
			session: None,
		}
	}
}

/// Callback receiving auth state notifications.
pub type AuthStateListener = Rc<dyn Fn(AuthChange)>;

/// The remote identity service.
#[async_trait(?Send)]
pub trait IdentityProvider {
	/// Returns the current session, if any.
	async fn get_session(&self) -> Result<Option<Session>, AuthError>;

	/// Loads the extended profile of `user_id`. `Ok(None)` when there is none.
	async fn load_profile(&self, user_id: &str) -> Result<Option<Profile>, AuthError>;

	/// Ends the current session.
	async fn sign_out(&self) -> Result<(), AuthError>;

	/// Registers a listener for auth state notifications.
	fn on_auth_state_change(&self, listener: AuthStateListener);
}

/// In-memory [`IdentityProvider`].
///
/// Sessions and profiles are set directly; [`MemoryIdentityProvider::notify`]
/// delivers arbitrary notifications, including malformed ones.
#[derive(Default)]
pub struct MemoryIdentityProvider {
	session: RefCell<Option<Session>>,
	profiles: RefCell<HashMap<String, Profile>>,
	listeners: RefCell<Vec<AuthStateListener>>,
	fail_sessions: Cell<bool>,
	fail_profiles: Cell<bool>,
	session_calls: Cell<usize>,
}

impl std::fmt::Debug for MemoryIdentityProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryIdentityProvider")
			.field("session", &self.session.borrow())
			.field("profiles", &self.profiles.borrow().len())
			.field("listeners", &self.listeners.borrow().len())
			.finish()
	}
}

impl MemoryIdentityProvider {
	/// Creates a provider without a session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the current session without notifying listeners.
	pub fn set_session(&self, session: Option<Session>) {
		*self.session.borrow_mut() = session;
	}

	/// Signs `session` in and notifies listeners with `SIGNED_IN`.
	pub fn sign_in(&self, session: Session) {
		let change = AuthChange::with_session(AuthChangeKind::SignedIn, &session);
		self.set_session(Some(session));
		self.notify(change);
	}

	/// Stores a profile row.
	pub fn insert_profile(&self, profile: Profile) {
		self.profiles
			.borrow_mut()
			.insert(profile.id.clone(), profile);
	}

	/// Makes session lookups fail.
	pub fn fail_sessions(&self, fail: bool) {
		self.fail_sessions.set(fail);
	}

	/// Makes profile lookups fail.
	pub fn fail_profiles(&self, fail: bool) {
		self.fail_profiles.set(fail);
	}

	/// Number of `get_session` calls so far.
	pub fn session_calls(&self) -> usize {
		self.session_calls.get()
	}

	/// Delivers a notification to every listener.
	pub fn notify(&self, change: AuthChange) {
		let listeners: Vec<AuthStateListener> = self.listeners.borrow().clone();
		for listener in listeners {
			listener(change.clone());
		}
	}
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryIdentityProvider {
	async fn get_session(&self) -> Result<Option<Session>, AuthError> {
		self.session_calls.set(self.session_calls.get() + 1);
		if self.fail_sessions.get() {
			return Err(AuthError::Session("session lookup failure injected".to_string()));
		}
		Ok(self.session.borrow().clone())
	}

	async fn load_profile(&self, user_id: &str) -> Result<Option<Profile>, AuthError> {
		if self.fail_profiles.get() {
			return Err(AuthError::Profile("profile lookup failure injected".to_string()));
		}
		Ok(self.profiles.borrow().get(user_id).cloned())
	}

	async fn sign_out(&self) -> Result<(), AuthError> {
		let had_session = self.session.borrow_mut().take().is_some();
		if had_session {
			self.notify(AuthChange::signed_out());
		}
		Ok(())
	}

	fn on_auth_state_change(&self, listener: AuthStateListener) {
		self.listeners.borrow_mut().push(listener);
	}
}
