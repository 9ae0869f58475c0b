//! Error types of the pages layer.
//!
//! None of these escape a navigation: the router turns [`RouterError`] into
//! the error panel and reports it through
//! [`NavigationOutcome`](crate::router::NavigationOutcome).

use std::fmt;

use gestor_core::{ConfigError, DomError};
use thiserror::Error;

/// Failure reported by a page component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
	/// A container or DOM write failed (including [`DomError::Stale`]).
	#[error(transparent)]
	Dom(#[from] DomError),
	/// The remote data service rejected a request.
	#[error("data service error: {0}")]
	Data(String),
	/// Anything else, shown as is.
	#[error("{0}")]
	Message(String),
}

impl PageError {
	/// Creates a [`PageError::Message`].
	pub fn msg(message: impl fmt::Display) -> Self {
		Self::Message(message.to_string())
	}

	/// Returns true when the failure only means the page lost its container.
	pub fn is_stale(&self) -> bool {
		matches!(self, Self::Dom(DomError::Stale))
	}
}

/// Why a navigation could not render its page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// The content container is missing.
	#[error("page container unavailable: {0}")]
	Container(DomError),
	/// The component returned an error.
	#[error(transparent)]
	Page(#[from] PageError),
	/// The component panicked.
	#[error("page component panicked: {0}")]
	Panicked(String),
	/// A redirect pointed back at the path being handled.
	#[error("redirect loop at '{0}'")]
	RedirectLoop(String),
}

/// Failure starting the shell.
#[derive(Debug, Error)]
pub enum ShellError {
	/// The root element is missing.
	#[error("root element #{0} not found")]
	RootMissing(String),
	/// Invalid settings.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A DOM operation failed during start-up.
	#[error(transparent)]
	Dom(#[from] DomError),
	/// A browser API the shell needs is missing.
	#[error("browser API unavailable: {0}")]
	Unavailable(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_page_error_display() {
		assert_eq!(PageError::msg("sin conexión").to_string(), "sin conexión");
		assert_eq!(
			PageError::Data("timeout".to_string()).to_string(),
			"data service error: timeout"
		);
		assert_eq!(
			PageError::from(DomError::Stale).to_string(),
			"container belongs to a superseded navigation"
		);
	}

	#[rstest]
	fn test_router_error_wraps_page_error_transparently() {
		let err = RouterError::from(PageError::msg("boom"));
		assert_eq!(err.to_string(), "boom");
		assert_eq!(
			RouterError::RedirectLoop("/dashboard".to_string()).to_string(),
			"redirect loop at '/dashboard'"
		);
	}

	#[rstest]
	fn test_is_stale() {
		assert!(PageError::Dom(DomError::Stale).is_stale());
		assert!(!PageError::msg("x").is_stale());
	}
}
