//! Identity-provider/client pairing targeted by an acquisition request.

// self
use crate::_prelude::*;

/// One identity-provider/client pairing. Immutable once constructed for a request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
	/// OIDC issuer URL the delegate discovers endpoints from.
	pub issuer_url: Url,
	/// OAuth 2.0 client identifier registered with the issuer.
	pub client_id: String,
	/// Client secret for confidential clients.
	pub client_secret: Option<String>,
	/// Scopes requested on top of `openid`. Ordering is insignificant for caching.
	pub extra_scopes: Vec<String>,
}
impl Debug for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Provider")
			.field("issuer_url", &self.issuer_url.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
			.field("extra_scopes", &self.extra_scopes)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_redacts_the_client_secret() {
		let provider = Provider {
			issuer_url: Url::parse("https://issuer.example.com")
				.expect("Issuer fixture should parse."),
			client_id: "my-client".into(),
			client_secret: Some("hunter2".into()),
			extra_scopes: vec!["groups".into()],
		};
		let rendered = format!("{provider:?}");

		assert!(!rendered.contains("hunter2"));
		assert!(rendered.contains("my-client"));
	}
}
