//! Persisted provider entries and the kubeconfig store contract (configuration mode).

// self
use crate::{_prelude::*, oidc::TokenSecret};

/// Future type returned by [`KubeconfigStore`] operations.
pub type KubeconfigFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, KubeconfigError>> + 'a + Send>>;

macro_rules! def_name {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub struct $name(String);
		impl $name {
			/// Wraps a raw name string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the raw name.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				Self(value.to_owned())
			}
		}
		impl From<String> for $name {
			fn from(value: String) -> Self {
				Self(value)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

def_name! { ContextName, "Name of a kubeconfig context used to scope entry lookup." }
def_name! { UserName, "Name of a kubeconfig user entry used to scope entry lookup." }

/// One named OIDC auth-provider record within a kubeconfig file.
///
/// The orchestrator reads one entry, may rewrite its token fields, and writes it
/// back; every other field round-trips unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProviderEntry {
	/// Path of the file the entry was read from; updates target the same file.
	pub location_of_origin: PathBuf,
	/// User entry the record belongs to.
	pub user_name: UserName,
	/// Issuer URL configured for the provider (`idp-issuer-url`).
	pub issuer_url: String,
	/// OAuth 2.0 client identifier (`client-id`).
	pub client_id: String,
	/// Client secret (`client-secret`), if configured.
	pub client_secret: Option<String>,
	/// CA certificate path (`idp-certificate-authority`), if configured.
	pub ca_cert_path: Option<PathBuf>,
	/// Inline CA certificate payload (`idp-certificate-authority-data`), if configured.
	pub ca_cert_data: Option<String>,
	/// Currently held ID token (`id-token`), if any.
	pub id_token: Option<TokenSecret>,
	/// Currently held refresh token (`refresh-token`), if any.
	pub refresh_token: Option<TokenSecret>,
}

/// Error type produced by [`KubeconfigStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum KubeconfigError {
	/// No user entry with OIDC auth-provider settings matched the requested scope.
	#[error("no OIDC-configured user entry matched the requested context/user scope")]
	NoMatchingEntry,
	/// The entry carries an issuer URL that does not parse.
	#[error("entry issuer URL is invalid")]
	InvalidIssuerUrl(#[source] url::ParseError),
	/// Storage-level failure reading or writing the file.
	#[error("kubeconfig backend failure: {message}")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Configuration store contract consumed in configuration mode.
///
/// Parsing and atomic rewriting of the kubeconfig file format live behind this
/// trait. No locking is applied around it: at most one orchestrator invocation is
/// assumed to target a given configuration file at a time.
pub trait KubeconfigStore
where
	Self: Send + Sync,
{
	/// Resolves the auth-provider entry for the requested context/user scope.
	///
	/// `path` overrides the default kubeconfig location; `context` defaults to the
	/// file's current context and `user` to the context's user when absent.
	fn current_auth_provider<'a>(
		&'a self,
		path: Option<&'a Path>,
		context: Option<&'a ContextName>,
		user: Option<&'a UserName>,
	) -> KubeconfigFuture<'a, AuthProviderEntry>;

	/// Writes the entry back to its file of origin.
	fn update_auth_provider<'a>(&'a self, entry: &'a AuthProviderEntry) -> KubeconfigFuture<'a, ()>;
}
