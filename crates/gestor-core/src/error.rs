//! Error types shared by the shell crates.

use thiserror::Error;

/// Failure reading or writing persisted layout state.
///
/// Callers inside the shell never propagate this; they log it and keep
/// the in-memory value.
#[derive(Debug, Error)]
pub enum StorageError {
	/// No storage backend is available (private mode, sandboxed iframe).
	#[error("storage is unavailable")]
	Unavailable,
	/// The backend refused to read a key.
	#[error("failed to read '{key}': {reason}")]
	Read {
		/// Key being read.
		key: String,
		/// Backend message.
		reason: String,
	},
	/// The backend refused to write a key (quota, permissions).
	#[error("failed to write '{key}': {reason}")]
	Write {
		/// Key being written.
		key: String,
		/// Backend message.
		reason: String,
	},
	/// The stored value is not valid JSON for the expected type.
	#[error("invalid stored value for '{key}': {source}")]
	Decode {
		/// Key whose value failed to decode.
		key: String,
		/// Underlying JSON error.
		#[source]
		source: serde_json::Error,
	},
}

/// Failure loading or validating [`ShellSettings`](crate::ShellSettings).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// TOML syntax or shape error.
	#[error("invalid TOML settings: {0}")]
	Toml(#[from] toml::de::Error),
	/// JSON syntax or shape error.
	#[error("invalid JSON settings: {0}")]
	Json(#[from] serde_json::Error),
	/// Settings parsed but violate a constraint.
	#[error("invalid setting `{field}`: {reason}")]
	Invalid {
		/// Dotted path of the offending field.
		field: &'static str,
		/// What is wrong with it.
		reason: String,
	},
}

/// Failure of a DOM operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// No element carries the requested id.
	#[error("element not found: #{0}")]
	NotFound(String),
	/// The container was handed to a navigation that has since been superseded.
	#[error("container belongs to a superseded navigation")]
	Stale,
	/// The browser rejected the operation.
	#[error("DOM operation failed: {0}")]
	Operation(String),
}

/// Failure reported by a bus listener.
///
/// [`EventBus::emit`](crate::EventBus::emit) logs it and moves on to the
/// next listener.
#[derive(Debug, Error)]
pub enum ListenerError {
	/// A DOM update failed.
	#[error(transparent)]
	Dom(#[from] DomError),
	/// Persisting state failed.
	#[error(transparent)]
	Storage(#[from] StorageError),
	/// Any other failure.
	#[error("{0}")]
	Failed(String),
}

impl ListenerError {
	/// A failure described by `message`.
	pub fn failed(message: impl Into<String>) -> Self {
		Self::Failed(message.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_dom_error_display() {
		assert_eq!(
			DomError::NotFound("main-content".to_string()).to_string(),
			"element not found: #main-content"
		);
		assert_eq!(
			DomError::Stale.to_string(),
			"container belongs to a superseded navigation"
		);
	}

	#[rstest]
	fn test_storage_error_display() {
		let err = StorageError::Write {
			key: "template:sidebar:state".to_string(),
			reason: "QuotaExceededError".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"failed to write 'template:sidebar:state': QuotaExceededError"
		);
	}

	#[rstest]
	fn test_listener_error_display() {
		let err: ListenerError = DomError::NotFound("sidebar".to_string()).into();
		assert_eq!(err.to_string(), "element not found: #sidebar");
		assert_eq!(ListenerError::failed("boom").to_string(), "boom");
	}

	#[rstest]
	fn test_config_error_display() {
		let err = ConfigError::Invalid {
			field: "breakpoints.mobile",
			reason: "must be greater than zero".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"invalid setting `breakpoints.mobile`: must be greater than zero"
		);
	}
}
