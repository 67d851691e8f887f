//! Configuration mode: refresh the token fields of a kubeconfig auth-provider entry
//! in place.

// crates.io
use tracing::debug;
// self
use crate::{
	_prelude::*,
	authentication::{AuthenticationInput, Authenticator},
	grant::GrantOptions,
	kubeconfig::{AuthProviderEntry, ContextName, KubeconfigError, KubeconfigStore, UserName},
	oidc::{Provider, TokenSet},
	tls::TlsClientConfig,
};

/// Input DTO for [`Standalone::run`].
#[derive(Clone, Debug)]
pub struct StandaloneInput {
	/// Kubeconfig location; the store's default is used when absent.
	pub kubeconfig_path: Option<PathBuf>,
	/// Context to resolve the entry from; the current context when absent.
	pub context_name: Option<ContextName>,
	/// User entry to resolve; the context's user when absent.
	pub user_name: Option<UserName>,
	/// Selected grant strategy and its options.
	pub grant_options: GrantOptions,
	/// Caller-supplied TLS settings, merged with the entry's CA fields.
	pub tls_client_config: TlsClientConfig,
}

/// Configuration mode orchestrator.
///
/// Reads the current auth-provider entry, offers its held token as a reuse
/// candidate, and writes the entry back with refreshed token fields when a fresh
/// round occurred. This mode targets exactly one configuration file per invocation,
/// so it uses neither the token cache nor the process lock.
pub struct Standalone {
	/// Delegate validating the candidate or performing the OIDC round.
	pub authenticator: Arc<dyn Authenticator>,
	/// Store resolving and rewriting the auth-provider entry.
	pub kubeconfig: Arc<dyn KubeconfigStore>,
}
impl Standalone {
	/// Runs one acquisition against the kubeconfig entry.
	///
	/// A read failure aborts before any authentication attempt. An entry-update
	/// failure after a successful fresh round is surfaced as
	/// [`Error::KubeconfigWrite`], distinct from [`Error::Authentication`].
	pub async fn run(&self, input: StandaloneInput) -> Result<()> {
		let mut entry = self
			.kubeconfig
			.current_auth_provider(
				input.kubeconfig_path.as_deref(),
				input.context_name.as_ref(),
				input.user_name.as_ref(),
			)
			.await
			.map_err(Error::KubeconfigRead)?;

		debug!(
			user = %entry.user_name,
			origin = %entry.location_of_origin.display(),
			"resolved the current auth provider entry",
		);

		let issuer_url = Url::parse(&entry.issuer_url)
			.map_err(|e| Error::KubeconfigRead(KubeconfigError::InvalidIssuerUrl(e)))?;
		let provider = Provider {
			issuer_url,
			client_id: entry.client_id.clone(),
			client_secret: entry.client_secret.clone(),
			extra_scopes: Vec::new(),
		};
		let cached_token_set = entry.id_token.clone().map(|id_token| TokenSet {
			id_token,
			refresh_token: entry.refresh_token.clone(),
		});
		let output = self
			.authenticator
			.authenticate(AuthenticationInput {
				provider,
				grant_options: input.grant_options.clone(),
				tls_client_config: merge_tls(&input.tls_client_config, &entry),
				cached_token_set,
			})
			.await
			.map_err(Error::Authentication)?;
		let claims = output.token_set.decode_claims_without_verify()?;

		if output.already_valid {
			debug!(expiry = %claims.expiry, "the kubeconfig already holds a valid token");

			return Ok(());
		}

		entry.id_token = Some(output.token_set.id_token.clone());
		entry.refresh_token = output.token_set.refresh_token.clone();

		debug!(
			expiry = %claims.expiry,
			origin = %entry.location_of_origin.display(),
			"writing the refreshed token back to the kubeconfig",
		);

		self.kubeconfig.update_auth_provider(&entry).await.map_err(Error::KubeconfigWrite)
	}
}
impl Debug for Standalone {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Standalone").finish_non_exhaustive()
	}
}

/// Appends the entry's CA fields to the caller-supplied TLS settings.
fn merge_tls(base: &TlsClientConfig, entry: &AuthProviderEntry) -> TlsClientConfig {
	let mut merged = base.clone();

	if let Some(path) = &entry.ca_cert_path {
		merged.ca_cert_paths.push(path.clone());
	}
	if let Some(data) = &entry.ca_cert_data {
		merged.ca_cert_data.push(data.clone());
	}

	merged
}
