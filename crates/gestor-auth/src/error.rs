//! Authentication errors.

use thiserror::Error;

/// Failure talking to the identity service.
///
/// [`AuthIntegration`](crate::AuthIntegration) logs these and degrades to
/// "no session"; they only surface from [`IdentityProvider`](crate::IdentityProvider)
/// implementations.
#[derive(Debug, Error)]
pub enum AuthError {
	/// The session could not be retrieved.
	#[error("failed to retrieve session: {0}")]
	Session(String),
	/// The extended profile could not be loaded.
	#[error("failed to load profile: {0}")]
	Profile(String),
	/// Signing out failed.
	#[error("failed to sign out: {0}")]
	SignOut(String),
	/// A session payload did not have the expected shape.
	#[error("malformed session payload: {0}")]
	InvalidPayload(#[from] serde_json::Error),
}
