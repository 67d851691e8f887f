//! TLS client configuration applied to outbound authentication calls.

// self
use crate::_prelude::*;

/// TLS settings for the delegate's network calls.
///
/// Also feeds cache-key derivation, since a different trust configuration can reach
/// a different identity provider. List ordering is insignificant for caching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsClientConfig {
	/// CA certificate file paths appended to the system roots.
	pub ca_cert_paths: Vec<PathBuf>,
	/// Inline base64-encoded CA certificate payloads.
	pub ca_cert_data: Vec<String>,
	/// Disables server certificate verification when true.
	pub skip_tls_verify: bool,
}
