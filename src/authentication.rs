//! Contract of the authentication delegate that performs the actual OIDC round.

// self
use crate::{
	_prelude::*,
	grant::GrantOptions,
	oidc::{Provider, TokenSet},
	tls::TlsClientConfig,
};

/// Future type returned by [`Authenticator::authenticate`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<AuthenticationOutput, BoxError>> + 'a + Send>>;

/// Parameters handed to the delegate for one acquisition attempt.
#[derive(Clone, Debug)]
pub struct AuthenticationInput {
	/// Identity-provider/client pairing to authenticate against.
	pub provider: Provider,
	/// Selected grant strategy and its options.
	pub grant_options: GrantOptions,
	/// TLS settings for the outbound calls.
	pub tls_client_config: TlsClientConfig,
	/// Previously held token set offered as a reuse candidate, if any.
	pub cached_token_set: Option<TokenSet>,
}

/// Result of a delegate invocation.
#[derive(Clone, Debug)]
pub struct AuthenticationOutput {
	/// Token set to hand to the caller.
	pub token_set: TokenSet,
	/// True when the cached candidate was returned as-is.
	///
	/// First-class signal, never inferred from token equality: the orchestrators
	/// persist the token set if and only if this is false.
	pub already_valid: bool,
}

/// Authentication delegate deciding between candidate reuse and a fresh round.
///
/// Implementations own the entire OIDC/OAuth 2.0 protocol execution: discovery,
/// grant exchange (browser, device code, password, or client credentials), and token
/// verification. Network round-trips and user interaction happen inside the returned
/// future; dropping it cancels the attempt before any orchestrator state is mutated.
pub trait Authenticator
where
	Self: Send + Sync,
{
	/// Validates the candidate token set or performs a fresh authentication round.
	fn authenticate(&self, input: AuthenticationInput) -> AuthFuture<'_>;
}
