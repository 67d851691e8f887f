//! Token cache contract and the derived, order-independent cache key.

pub mod file;

pub use file::FileCache;

// std
use std::{borrow::Cow, collections::BTreeSet, sync::OnceLock};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::json;
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, grant::GrantOptions, oidc::{Provider, TokenSet}, tls::TlsClientConfig};

/// Future type returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Persistence contract for cached token sets under a caller-supplied cache root.
///
/// The orchestrator never deletes entries; eviction, if any, is the backend's
/// concern.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Looks up the token set stored under the key, if any.
	fn find<'a>(&'a self, root: &'a Path, key: &'a CacheKey) -> CacheFuture<'a, TokenSet>;

	/// Persists or replaces the token set stored under the key.
	fn save<'a>(
		&'a self,
		root: &'a Path,
		key: &'a CacheKey,
		token_set: &'a TokenSet,
	) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CacheError {
	/// No entry exists for the requested key.
	#[error("no cached token for the requested key")]
	NotFound,
	/// An entry payload could not be serialized or parsed.
	#[error("cache serialization error: {message}")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Storage-level failure.
	#[error("cache backend failure: {message}")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Order-independent identity of a cacheable token.
///
/// Two requests that differ only in the ordering of their extra scopes or CA lists
/// derive equal keys: list fields are sorted and deduplicated before joining, so key
/// equality reflects semantic equality of the provider session, not how the caller
/// assembled the lists. The username participates only for the password grant, which
/// is the one strategy whose session identity depends on who is logging in.
pub struct CacheKey {
	/// Issuer URL in canonical string form.
	pub issuer_url: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret, empty when the client is public.
	pub client_secret: String,
	/// Password-grant username, empty for every other strategy.
	pub username: String,
	/// Canonical comma-joined extra scopes.
	pub extra_scopes: String,
	/// Canonical comma-joined CA certificate paths.
	pub ca_cert_paths: String,
	/// Canonical comma-joined inline CA certificate payloads.
	pub ca_cert_data: String,
	/// Whether server certificate verification is disabled.
	pub skip_tls_verify: bool,
	fingerprint_cache: OnceLock<String>,
}
impl CacheKey {
	/// Derives the key for a request. Pure: no side effects, no failure modes.
	pub fn derive(provider: &Provider, tls: &TlsClientConfig, grant: &GrantOptions) -> Self {
		Self {
			issuer_url: provider.issuer_url.to_string(),
			client_id: provider.client_id.clone(),
			client_secret: provider.client_secret.clone().unwrap_or_default(),
			username: grant.password_username().unwrap_or_default().to_owned(),
			extra_scopes: canonical_join(provider.extra_scopes.iter().map(|s| Cow::from(s.as_str()))),
			ca_cert_paths: canonical_join(tls.ca_cert_paths.iter().map(|p| p.to_string_lossy())),
			ca_cert_data: canonical_join(tls.ca_cert_data.iter().map(|s| Cow::from(s.as_str()))),
			skip_tls_verify: tls.skip_tls_verify,
			fingerprint_cache: OnceLock::new(),
		}
	}

	/// Stable fingerprint of the key, safe to use as a file name.
	///
	/// Base64url (no padding) encoding of the SHA-256 digest over the canonical JSON
	/// form; cached after the first computation.
	pub fn fingerprint(&self) -> String {
		self.fingerprint_cache.get_or_init(|| compute_fingerprint(self)).clone()
	}
}
impl Clone for CacheKey {
	fn clone(&self) -> Self {
		Self {
			issuer_url: self.issuer_url.clone(),
			client_id: self.client_id.clone(),
			client_secret: self.client_secret.clone(),
			username: self.username.clone(),
			extra_scopes: self.extra_scopes.clone(),
			ca_cert_paths: self.ca_cert_paths.clone(),
			ca_cert_data: self.ca_cert_data.clone(),
			skip_tls_verify: self.skip_tls_verify,
			fingerprint_cache: OnceLock::new(),
		}
	}
}
impl PartialEq for CacheKey {
	fn eq(&self, other: &Self) -> bool {
		self.issuer_url == other.issuer_url
			&& self.client_id == other.client_id
			&& self.client_secret == other.client_secret
			&& self.username == other.username
			&& self.extra_scopes == other.extra_scopes
			&& self.ca_cert_paths == other.ca_cert_paths
			&& self.ca_cert_data == other.ca_cert_data
			&& self.skip_tls_verify == other.skip_tls_verify
	}
}
impl Eq for CacheKey {}
impl Debug for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CacheKey")
			.field("issuer_url", &self.issuer_url)
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("username", &self.username)
			.field("extra_scopes", &self.extra_scopes)
			.field("ca_cert_paths", &self.ca_cert_paths)
			.field("ca_cert_data", &self.ca_cert_data)
			.field("skip_tls_verify", &self.skip_tls_verify)
			.finish()
	}
}

fn canonical_join<'a, I>(values: I) -> String
where
	I: IntoIterator<Item = Cow<'a, str>>,
{
	let set: BTreeSet<String> = values.into_iter().map(Cow::into_owned).collect();

	set.into_iter().collect::<Vec<_>>().join(",")
}

fn compute_fingerprint(key: &CacheKey) -> String {
	// serde_json maps are sorted by key, so the canonical form is deterministic.
	let canonical = json!({
		"ca_cert_data": key.ca_cert_data,
		"ca_cert_paths": key.ca_cert_paths,
		"client_id": key.client_id,
		"client_secret": key.client_secret,
		"extra_scopes": key.extra_scopes,
		"issuer_url": key.issuer_url,
		"skip_tls_verify": key.skip_tls_verify,
		"username": key.username,
	});
	let mut hasher = Sha256::new();

	hasher.update(canonical.to_string().as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}
