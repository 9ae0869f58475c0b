//! Session and user data types.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Display name used when neither the profile nor the identity carries one.
pub const DEFAULT_NAME: &str = "Usuario";

/// Role used when the profile does not carry one.
pub const DEFAULT_ROLE: &str = "user";

/// Free-form metadata the identity service stores with the account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserMetadata {
	/// Full name entered at sign-up.
	#[serde(default)]
	pub full_name: Option<String>,
	/// Avatar URL from the identity service.
	#[serde(default)]
	pub avatar_url: Option<String>,
}

/// The account as the identity service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
	/// Account id.
	pub id: String,
	/// Sign-in e-mail.
	pub email: String,
	/// Account metadata.
	#[serde(default)]
	pub user_metadata: UserMetadata,
}

impl IdentityUser {
	/// Creates an account without metadata.
	pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			email: email.into(),
			user_metadata: UserMetadata::default(),
		}
	}

	/// Sets the full name metadata.
	pub fn full_name(mut self, name: impl Into<String>) -> Self {
		self.user_metadata.full_name = Some(name.into());
		self
	}

	/// Sets the avatar metadata.
	pub fn avatar_url(mut self, url: impl Into<String>) -> Self {
		self.user_metadata.avatar_url = Some(url.into());
		self
	}
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
	/// Bearer token, when the provider exposes it.
	#[serde(default)]
	pub access_token: Option<String>,
	/// The signed-in account.
	pub user: IdentityUser,
}

impl Session {
	/// Creates a session for `user`.
	pub fn new(user: IdentityUser) -> Self {
		Self {
			access_token: None,
			user,
		}
	}

	/// Parses a session from the JSON payload of an auth notification.
	pub fn from_value(value: serde_json::Value) -> Result<Self, AuthError> {
		Ok(serde_json::from_value(value)?)
	}
}

/// Row of the extended profile table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
	/// Account id.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub full_name: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub avatar_url: Option<String>,
	/// Role name.
	#[serde(default)]
	pub role: Option<String>,
	/// Granted permissions. `None` means the deployment has no permission system.
	#[serde(default)]
	pub permissions: Option<Vec<String>>,
}

/// What the shell knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
	/// Account id.
	pub id: String,
	/// Sign-in e-mail.
	pub email: String,
	/// Display name.
	pub name: String,
	/// Avatar URL (never empty).
	pub avatar_url: String,
	/// Role name.
	pub role: String,
	/// Granted permissions.
	pub permissions: Vec<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|v| !v.is_empty())
}

impl UserData {
	/// Merges the identity account with its optional extended profile.
	///
	/// Profile values win over identity metadata; missing values fall back
	/// to [`DEFAULT_NAME`], [`default_avatar_url`] and [`DEFAULT_ROLE`].
	pub fn from_parts(user: &IdentityUser, profile: Option<&Profile>) -> Self {
		let name = profile
			.and_then(|p| non_empty(&p.full_name))
			.or_else(|| non_empty(&user.user_metadata.full_name))
			.unwrap_or(DEFAULT_NAME)
			.to_string();
		let avatar_url = profile
			.and_then(|p| non_empty(&p.avatar_url))
			.or_else(|| non_empty(&user.user_metadata.avatar_url))
			.map(str::to_string)
			.unwrap_or_else(|| default_avatar_url(&user.email));
		let role = profile
			.and_then(|p| non_empty(&p.role))
			.unwrap_or(DEFAULT_ROLE)
			.to_string();
		let permissions = profile
			.and_then(|p| p.permissions.clone())
			.unwrap_or_default();

		Self {
			id: user.id.clone(),
			email: user.email.clone(),
			name,
			avatar_url,
			role,
			permissions,
		}
	}
}

/// Generated initials avatar for an e-mail address (uses the local part).
pub fn default_avatar_url(email: &str) -> String {
	let local = email.split('@').next().unwrap_or_default();
	format!(
		"https://ui-avatars.com/api/?name={}&background=random",
		urlencoding::encode(local)
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_defaults_without_profile_or_metadata() {
		let user = IdentityUser::new("u-1", "ana.lopez@example.com");
		let data = UserData::from_parts(&user, None);

		assert_eq!(data.name, "Usuario");
		assert_eq!(data.role, "user");
		assert!(data.permissions.is_empty());
		assert_eq!(
			data.avatar_url,
			"https://ui-avatars.com/api/?name=ana.lopez&background=random"
		);
	}

	#[rstest]
	fn test_metadata_used_when_profile_missing() {
		let user = IdentityUser::new("u-1", "ana@example.com")
			.full_name("Ana López")
			.avatar_url("https://cdn.example.com/ana.png");
		let data = UserData::from_parts(&user, None);
		assert_eq!(data.name, "Ana López");
		assert_eq!(data.avatar_url, "https://cdn.example.com/ana.png");
	}

	#[rstest]
	fn test_profile_wins_over_metadata() {
		let user = IdentityUser::new("u-1", "ana@example.com").full_name("Ana");
		let profile = Profile {
			id: "u-1".to_string(),
			full_name: Some("Ana María López".to_string()),
			avatar_url: None,
			role: Some("admin".to_string()),
			permissions: Some(vec!["clients.write".to_string()]),
		};
		let data = UserData::from_parts(&user, Some(&profile));
		assert_eq!(data.name, "Ana María López");
		assert_eq!(data.role, "admin");
		assert_eq!(data.permissions, vec!["clients.write".to_string()]);
	}

	#[rstest]
	fn test_empty_strings_fall_through() {
		let user = IdentityUser::new("u-1", "ana@example.com").full_name("");
		let profile = Profile {
			id: "u-1".to_string(),
			full_name: Some(String::new()),
			..Profile::default()
		};
		assert_eq!(UserData::from_parts(&user, Some(&profile)).name, "Usuario");
	}

	#[rstest]
	#[case("maría+crm@example.com", "https://ui-avatars.com/api/?name=mar%C3%ADa%2Bcrm&background=random")]
	#[case("no-at-sign", "https://ui-avatars.com/api/?name=no-at-sign&background=random")]
	fn test_default_avatar_encodes_local_part(#[case] email: &str, #[case] expected: &str) {
		assert_eq!(default_avatar_url(email), expected);
	}

	#[rstest]
	fn test_session_from_value() {
		let session = Session::from_value(json!({
			"access_token": "jwt",
			"user": { "id": "u-1", "email": "ana@example.com" }
		}))
		.unwrap();
		assert_eq!(session.user.id, "u-1");
		assert_eq!(session.access_token.as_deref(), Some("jwt"));

		let malformed = Session::from_value(json!({ "user": { "id": 7 } }));
		assert!(matches!(malformed, Err(AuthError::InvalidPayload(_))));
	}
}
