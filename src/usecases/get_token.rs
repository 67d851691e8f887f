//! Cache-file mode acquisition: guard, consult the cache, authenticate, persist,
//! emit through the exec credential protocol.

// crates.io
use tracing::{debug, warn};
// self
use crate::{
	_prelude::*,
	authentication::{AuthenticationInput, Authenticator},
	cache::{CacheKey, TokenCache},
	grant::GrantOptions,
	guard::ProcessMutex,
	oidc::Provider,
	tls::TlsClientConfig,
	writer::{Credential, CredentialWriter},
};

/// Well-known lock name shared by every cache-file mode invocation.
///
/// Independent processes launched concurrently by the calling tool contend on this
/// one name, so at most one of them runs the lookup-authenticate-save section at a
/// time for a given guard backend.
pub const GET_TOKEN_LOCK: &str = "get-token";

/// Input DTO for [`GetToken::run`].
#[derive(Clone, Debug)]
pub struct GetTokenInput {
	/// Identity-provider/client pairing to acquire a token for.
	pub provider: Provider,
	/// Selected grant strategy and its options.
	pub grant_options: GrantOptions,
	/// TLS settings for the outbound authentication calls.
	pub tls_client_config: TlsClientConfig,
	/// Root directory holding the token cache entries.
	pub token_cache_dir: PathBuf,
}

/// Cache-file mode orchestrator.
///
/// One invocation runs strictly in order: acquire the process lock, derive the cache
/// key, consult the cache, invoke the delegate with the candidate, persist the token
/// set if a fresh round occurred, release the lock, and hand the credential to the
/// writer. See [`GetToken::run`] for the failure contract of each stage.
pub struct GetToken {
	/// Delegate validating the candidate or performing the OIDC round.
	pub authenticator: Arc<dyn Authenticator>,
	/// Cache persisting token sets across invocations.
	pub token_cache: Arc<dyn TokenCache>,
	/// Sink handing the credential to the calling process.
	pub writer: Arc<dyn CredentialWriter>,
	/// Cross-process guard serializing concurrent invocations.
	pub process_mutex: Arc<dyn ProcessMutex>,
}
impl GetToken {
	/// Runs one acquisition.
	///
	/// Every failure is fatal and tagged with its stage, with two exceptions: a cache
	/// lookup failure degrades to "no cached token" (stale cache is fine), and a
	/// guard release failure is logged without changing the outcome (it is already
	/// determined by then). A cache save failure after a successful fresh round is
	/// surfaced as [`Error::CacheWrite`], distinct from [`Error::Authentication`],
	/// because the caller holds a usable token that will not be found next time.
	pub async fn run(&self, input: GetTokenInput) -> Result<()> {
		let handle = self.process_mutex.acquire(GET_TOKEN_LOCK).await.map_err(Error::Lock)?;
		let outcome = self.acquire_locked(&input).await;

		if let Err(e) = self.process_mutex.release(handle).await {
			warn!(error = %e, "failed to release the process lock");
		}

		let credential = outcome?;

		debug!("writing the credential to the calling process");

		self.writer.write(credential).await.map_err(Error::CredentialWrite)
	}

	/// Critical section: cache lookup, delegate call, and conditional save.
	async fn acquire_locked(&self, input: &GetTokenInput) -> Result<Credential> {
		let key = CacheKey::derive(&input.provider, &input.tls_client_config, &input.grant_options);

		debug!(
			cache_dir = %input.token_cache_dir.display(),
			grant = %input.grant_options,
			"looking up the token cache",
		);

		let cached_token_set = match self.token_cache.find(&input.token_cache_dir, &key).await {
			Ok(token_set) => Some(token_set),
			Err(e) => {
				// Not fatal: a missing or unreadable entry means a full round, not an
				// aborted invocation.
				debug!(error = %e, "proceeding without a cached token");

				None
			},
		};
		let output = self
			.authenticator
			.authenticate(AuthenticationInput {
				provider: input.provider.clone(),
				grant_options: input.grant_options.clone(),
				tls_client_config: input.tls_client_config.clone(),
				cached_token_set,
			})
			.await
			.map_err(Error::Authentication)?;
		let claims = output.token_set.decode_claims_without_verify()?;

		if output.already_valid {
			debug!(expiry = %claims.expiry, "reusing the still-valid cached token");
		} else {
			debug!(expiry = %claims.expiry, "persisting the freshly obtained token");

			self.token_cache
				.save(&input.token_cache_dir, &key, &output.token_set)
				.await
				.map_err(Error::CacheWrite)?;
		}

		Ok(Credential { token: output.token_set.id_token.clone(), expiry: claims.expiry })
	}
}
impl Debug for GetToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GetToken").finish_non_exhaustive()
	}
}
