//! Output sink handing the acquired credential to the calling process.

// self
use crate::{_prelude::*, oidc::TokenSecret};

/// Future type returned by [`CredentialWriter::write`].
pub type WriterFuture<'a> = Pin<Box<dyn Future<Output = Result<(), WriterError>> + 'a + Send>>;

/// Token and expiry pair emitted through the exec credential protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	/// ID token handed to the caller.
	pub token: TokenSecret,
	/// Expiry instant decoded from the token claims.
	pub expiry: OffsetDateTime,
}

/// Sink emitting the credential in whatever format the calling tool expects.
///
/// The wire format and transport are the implementation's concern; the orchestrator
/// only guarantees the cache is consistent before this runs.
pub trait CredentialWriter
where
	Self: Send + Sync,
{
	/// Emits the credential to the calling process.
	fn write(&self, credential: Credential) -> WriterFuture<'_>;
}

/// Error type produced by [`CredentialWriter`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum WriterError {
	/// The credential payload could not be serialized.
	#[error("credential serialization error: {message}")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// The output channel rejected the write.
	#[error("credential output failure: {message}")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
