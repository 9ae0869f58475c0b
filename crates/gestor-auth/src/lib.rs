//! Gestor Auth - session integration for the admin shell
//!
//! The shell never talks to the identity service directly. A hosting
//! application implements [`IdentityProvider`] for its backend;
//! [`AuthIntegration`] turns that into the [`Authenticator`] contract the
//! router and the layout consume:
//!
//! - resolve the current session and augment it with the extended profile
//! - check permissions
//! - sign out
//! - follow sign-in/sign-out notifications, redirecting to the login route
//!   when the session ends
//!
//! [`MemoryIdentityProvider`] is an in-memory provider for tests and demos.

#![warn(missing_docs)]

pub mod error;
pub mod integration;
pub mod provider;
pub mod user;

pub use error::AuthError;
pub use integration::{AuthIntegration, Authenticator};
pub use provider::{
	AuthChange, AuthChangeKind, AuthStateListener, IdentityProvider, MemoryIdentityProvider,
};
pub use user::{IdentityUser, Profile, Session, UserData, UserMetadata, default_avatar_url};
