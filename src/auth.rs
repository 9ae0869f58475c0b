//! Session integration
//!
//! Implement [`IdentityProvider`] for your identity backend and hand it to
//! the shell; [`AuthIntegration`] does the rest.

// Re-export all gestor-auth functionality
pub use gestor_auth::*;
