//! Grant strategy selection, modeled as a tagged union so exactly one strategy is
//! active per request.

// self
use crate::_prelude::*;

/// Selected grant strategy plus its strategy-specific options.
///
/// The authentication delegate consumes this read-only; the orchestrators only peek
/// at [`GrantOptions::password_username`] for cache-key derivation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantOptions {
	/// Authorization code grant through a local redirect listener and a browser.
	AuthCode(AuthCodeOptions),
	/// Device authorization grant for browserless or remote environments.
	DeviceCode(DeviceCodeOptions),
	/// Resource owner password credentials grant.
	Password(PasswordOptions),
	/// Client credentials grant for non-interactive service identities.
	ClientCredentials,
}
impl GrantOptions {
	/// Returns the RFC-style label of the active strategy, for diagnostics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AuthCode(_) => "authorization_code",
			Self::DeviceCode(_) => "device_code",
			Self::Password(_) => "password",
			Self::ClientCredentials => "client_credentials",
		}
	}

	/// Username carried by the password strategy, if any.
	///
	/// Only the password grant contributes a username to the token cache key; every
	/// other strategy yields `None`.
	pub fn password_username(&self) -> Option<&str> {
		match self {
			Self::Password(options) => options.username.as_deref(),
			_ => None,
		}
	}
}
impl Display for GrantOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Options for the authorization code grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeOptions {
	/// Candidate addresses for the local redirect listener, tried in order.
	pub bind_addresses: Vec<String>,
	/// Suppresses the automatic browser launch when true.
	pub skip_open_browser: bool,
	/// Redirect URL presented to the user when the listener sits behind a proxy.
	pub redirect_url_hint: Option<String>,
	/// Seconds the listener waits for the authorization response.
	pub authentication_timeout_sec: u64,
}
impl Default for AuthCodeOptions {
	fn default() -> Self {
		Self {
			bind_addresses: vec!["127.0.0.1:8000".into(), "127.0.0.1:18000".into()],
			skip_open_browser: false,
			redirect_url_hint: None,
			authentication_timeout_sec: 180,
		}
	}
}

/// Options for the device authorization grant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCodeOptions {
	/// Suppresses the automatic browser launch for the verification URI when true.
	pub skip_open_browser: bool,
}

/// Options for the resource owner password credentials grant.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordOptions {
	/// Username to authenticate as; prompted for by the delegate when absent.
	pub username: Option<String>,
	/// Password; prompted for by the delegate when absent.
	pub password: Option<String>,
}
impl Debug for PasswordOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordOptions")
			.field("username", &self.username)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn username_is_exposed_only_for_the_password_grant() {
		let password = GrantOptions::Password(PasswordOptions {
			username: Some("alice".into()),
			password: None,
		});

		assert_eq!(password.password_username(), Some("alice"));
		assert_eq!(GrantOptions::ClientCredentials.password_username(), None);
		assert_eq!(
			GrantOptions::AuthCode(AuthCodeOptions::default()).password_username(),
			None,
		);
	}

	#[test]
	fn labels_identify_strategies() {
		assert_eq!(GrantOptions::DeviceCode(DeviceCodeOptions::default()).as_str(), "device_code");
		assert_eq!(GrantOptions::ClientCredentials.to_string(), "client_credentials");
	}

	#[test]
	fn password_debug_redacts() {
		let options = PasswordOptions { username: Some("alice".into()), password: Some("pw".into()) };
		let rendered = format!("{options:?}");

		assert!(rendered.contains("alice"));
		assert!(!rendered.contains("pw\""));
	}
}
