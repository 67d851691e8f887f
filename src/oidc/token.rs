//! Token sets, redacted token secrets, and unsigned ID token claim decoding.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping token material out of logs and error chains.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a raw secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must keep it out of log output.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token pair produced by the authentication delegate and persisted by the cache.
///
/// Treated as a value: never mutated in place, cloned between the cache, the
/// delegate, and the output sinks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
	/// Opaque signed ID token in JWT compact form.
	pub id_token: TokenSecret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
}
impl TokenSet {
	/// Decodes the ID token claims **without verifying the signature**.
	///
	/// Splits the compact form, base64url-decodes the payload, and parses the claim
	/// set. Signature validation is the delegate's concern; this only answers "when
	/// does the token expire and what does it say", failing if the token is
	/// structurally invalid.
	pub fn decode_claims_without_verify(&self) -> Result<Claims, ClaimsDecodeError> {
		let segments = self.id_token.expose().split('.').collect::<Vec<_>>();

		if segments.len() != 3 {
			return Err(ClaimsDecodeError::MalformedCompactForm { segments: segments.len() });
		}

		let payload =
			URL_SAFE_NO_PAD.decode(segments[1]).map_err(ClaimsDecodeError::PayloadEncoding)?;
		let deserializer = &mut serde_json::Deserializer::from_slice(&payload);
		let value: serde_json::Value =
			serde_path_to_error::deserialize(deserializer).map_err(ClaimsDecodeError::PayloadParse)?;
		let exp = value
			.get("exp")
			.and_then(serde_json::Value::as_i64)
			.ok_or(ClaimsDecodeError::MissingExpiry)?;
		let expiry = OffsetDateTime::from_unix_timestamp(exp)
			.map_err(|_| ClaimsDecodeError::ExpiryOutOfRange { exp })?;
		let string_claim = |name: &str| {
			value.get(name).and_then(serde_json::Value::as_str).unwrap_or_default().to_owned()
		};

		Ok(Claims {
			issuer: string_claim("iss"),
			subject: string_claim("sub"),
			expiry,
			pretty: serde_json::to_string_pretty(&value).unwrap_or_default(),
		})
	}
}

/// Claim summary decoded from an ID token payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claims {
	/// `iss` claim, empty when absent.
	pub issuer: String,
	/// `sub` claim, empty when absent.
	pub subject: String,
	/// `exp` claim as an absolute instant.
	pub expiry: OffsetDateTime,
	/// Pretty-printed JSON of the full claim set, for diagnostics.
	pub pretty: String,
}

/// Structural decoding failures for ID tokens. Never a verification verdict.
#[derive(Debug, ThisError)]
pub enum ClaimsDecodeError {
	/// The token does not have the three dot-separated JWT segments.
	#[error("ID token must have 3 dot-separated segments, found {segments}")]
	MalformedCompactForm {
		/// Number of segments actually present.
		segments: usize,
	},
	/// The payload segment is not valid base64url.
	#[error("ID token payload is not valid base64url")]
	PayloadEncoding(#[source] base64::DecodeError),
	/// The payload segment is not a valid JSON claim set.
	#[error("ID token payload is not a valid claim set")]
	PayloadParse(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// The claim set carries no numeric `exp` claim.
	#[error("ID token carries no exp claim")]
	MissingExpiry,
	/// The `exp` claim does not fit a representable instant.
	#[error("ID token exp claim {exp} is out of range")]
	ExpiryOutOfRange {
		/// The offending claim value.
		exp: i64,
	},
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::testing::encode_unsigned_jwt;

	fn token_set(id_token: impl Into<String>) -> TokenSet {
		TokenSet { id_token: TokenSecret::new(id_token.into()), refresh_token: None }
	}

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("ey.super.secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn decode_extracts_expiry_and_summary() {
		let jwt = encode_unsigned_jwt(&json!({
			"iss": "https://issuer.example.com",
			"sub": "subject-1",
			"exp": 1_700_000_000,
			"aud": "my-client",
		}));
		let claims = token_set(jwt)
			.decode_claims_without_verify()
			.expect("Well-formed token should decode.");

		assert_eq!(claims.issuer, "https://issuer.example.com");
		assert_eq!(claims.subject, "subject-1");
		assert_eq!(claims.expiry.unix_timestamp(), 1_700_000_000);
		assert!(claims.pretty.contains("my-client"));
	}

	#[test]
	fn decode_rejects_wrong_segment_count() {
		let err = token_set("only.two")
			.decode_claims_without_verify()
			.expect_err("Two segments must be rejected.");

		assert!(matches!(err, ClaimsDecodeError::MalformedCompactForm { segments: 2 }));
	}

	#[test]
	fn decode_rejects_garbage_payload() {
		let err = token_set("aGVhZGVy.%%%%.c2ln")
			.decode_claims_without_verify()
			.expect_err("Non-base64url payload must be rejected.");

		assert!(matches!(err, ClaimsDecodeError::PayloadEncoding(_)));
	}

	#[test]
	fn decode_rejects_missing_expiry() {
		let jwt = encode_unsigned_jwt(&json!({ "iss": "https://issuer.example.com" }));
		let err = token_set(jwt)
			.decode_claims_without_verify()
			.expect_err("Claim set without exp must be rejected.");

		assert!(matches!(err, ClaimsDecodeError::MissingExpiry));
	}

	#[test]
	fn decode_rejects_non_json_payload() {
		let payload = URL_SAFE_NO_PAD.encode("not json at all");
		let err = token_set(format!("hdr.{payload}.sig"))
			.decode_claims_without_verify()
			.expect_err("Non-JSON payload must be rejected.");

		assert!(matches!(err, ClaimsDecodeError::PayloadParse(_)));
	}
}
