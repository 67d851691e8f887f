//! Stage-tagged error taxonomy shared by both acquisition orchestrators.

// self
use crate::{
	_prelude::*,
	cache::CacheError,
	guard::MutexError,
	kubeconfig::KubeconfigError,
	oidc::ClaimsDecodeError,
	writer::WriterError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type used at collaborator boundaries with open-ended failure sets.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal orchestration failure, tagged with the stage that produced it.
///
/// Guard-release failures are deliberately absent: they are logged and never
/// escalated, since the operation's outcome is already determined by the time
/// release is attempted.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The cross-process lock could not be acquired; no other stage ran.
	#[error("could not acquire the process lock")]
	Lock(#[source] MutexError),
	/// No usable OIDC provider entry could be read from the kubeconfig.
	#[error("could not read the OIDC configuration entry")]
	KubeconfigRead(#[source] KubeconfigError),
	/// The authentication delegate failed; no cache or entry write occurred.
	#[error("authentication error")]
	Authentication(#[source] BoxError),
	/// The obtained ID token is structurally invalid.
	#[error("the obtained token is invalid")]
	TokenDecode(#[from] ClaimsDecodeError),
	/// A freshly obtained token could not be persisted to the token cache.
	///
	/// Distinct from [`Error::Authentication`]: the caller holds a usable token,
	/// but the next invocation will not find it in the cache.
	#[error("could not write the token cache")]
	CacheWrite(#[source] CacheError),
	/// A refreshed provider entry could not be written back to the kubeconfig.
	#[error("could not update the configuration entry")]
	KubeconfigWrite(#[source] KubeconfigError),
	/// The credential could not be handed to the calling process.
	#[error("could not write the credential to the caller")]
	CredentialWrite(#[source] WriterError),
}
