//! Test support: an unsigned JWT encoder and in-memory collaborator doubles.
//!
//! Public so the crate's integration suites—and embedders testing their own
//! wiring—can exercise the orchestrators without an identity provider, a file
//! system, or a real cross-process lock.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{
	_prelude::*,
	authentication::{AuthFuture, AuthenticationInput, AuthenticationOutput, Authenticator},
	cache::{CacheError, CacheFuture, CacheKey, TokenCache},
	guard::{LockHandle, MemoryMutex, MutexError, MutexFuture, ProcessMutex},
	kubeconfig::{AuthProviderEntry, ContextName, KubeconfigError, KubeconfigFuture, KubeconfigStore, UserName},
	oidc::TokenSet,
	writer::{Credential, CredentialWriter, WriterError, WriterFuture},
};

/// Encodes an unsigned compact JWT carrying the provided claim set.
///
/// The signature segment is empty; claim decoding never checks it.
pub fn encode_unsigned_jwt(claims: &serde_json::Value) -> String {
	let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
	let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

	format!("{header}.{payload}.")
}

/// Delegate double returning a fixed output and recording every input it saw.
pub struct StaticAuthenticator {
	output: AuthenticationOutput,
	calls: Mutex<Vec<AuthenticationInput>>,
}
impl StaticAuthenticator {
	/// Builds a double that always returns the provided output.
	pub fn new(output: AuthenticationOutput) -> Self {
		Self { output, calls: Mutex::new(Vec::new()) }
	}

	/// Inputs recorded so far, in call order.
	pub fn calls(&self) -> Vec<AuthenticationInput> {
		self.calls.lock().clone()
	}

	/// Number of invocations recorded so far.
	pub fn call_count(&self) -> usize {
		self.calls.lock().len()
	}
}
impl Authenticator for StaticAuthenticator {
	fn authenticate(&self, input: AuthenticationInput) -> AuthFuture<'_> {
		Box::pin(async move {
			self.calls.lock().push(input);

			Ok(self.output.clone())
		})
	}
}

/// Delegate double failing every invocation with the configured message.
pub struct FailingAuthenticator {
	message: String,
	calls: Mutex<usize>,
}
impl FailingAuthenticator {
	/// Builds a double that always fails with the provided message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), calls: Mutex::new(0) }
	}

	/// Number of invocations recorded so far.
	pub fn call_count(&self) -> usize {
		*self.calls.lock()
	}
}
impl Authenticator for FailingAuthenticator {
	fn authenticate(&self, _: AuthenticationInput) -> AuthFuture<'_> {
		Box::pin(async move {
			*self.calls.lock() += 1;

			Err(self.message.clone().into())
		})
	}
}

/// In-memory [`TokenCache`] keyed by fingerprint, recording saves.
#[derive(Default)]
pub struct MemoryCache {
	entries: Mutex<HashMap<String, TokenSet>>,
	saves: Mutex<Vec<(String, TokenSet)>>,
	fail_saves: bool,
}
impl MemoryCache {
	/// Builds a cache whose saves fail with a synthetic backend error.
	pub fn failing_saves() -> Self {
		Self { fail_saves: true, ..Default::default() }
	}

	/// Pre-populates an entry, bypassing the save recorder.
	pub fn seed(&self, key: &CacheKey, token_set: TokenSet) {
		self.entries.lock().insert(key.fingerprint(), token_set);
	}

	/// Saves recorded so far as (fingerprint, token set) pairs, in call order.
	pub fn saves(&self) -> Vec<(String, TokenSet)> {
		self.saves.lock().clone()
	}
}
impl TokenCache for MemoryCache {
	fn find<'a>(&'a self, _: &'a Path, key: &'a CacheKey) -> CacheFuture<'a, TokenSet> {
		Box::pin(async move {
			self.entries.lock().get(&key.fingerprint()).cloned().ok_or(CacheError::NotFound)
		})
	}

	fn save<'a>(
		&'a self,
		_: &'a Path,
		key: &'a CacheKey,
		token_set: &'a TokenSet,
	) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			if self.fail_saves {
				return Err(CacheError::Backend { message: "synthetic save failure".into() });
			}

			let fingerprint = key.fingerprint();

			self.entries.lock().insert(fingerprint.clone(), token_set.clone());
			self.saves.lock().push((fingerprint, token_set.clone()));

			Ok(())
		})
	}
}

/// Recording [`CredentialWriter`], optionally failing every write.
#[derive(Default)]
pub struct RecordingWriter {
	written: Mutex<Vec<Credential>>,
	fail: bool,
}
impl RecordingWriter {
	/// Builds a writer whose writes fail with a synthetic backend error.
	pub fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	/// Credentials written so far, in call order.
	pub fn written(&self) -> Vec<Credential> {
		self.written.lock().clone()
	}
}
impl CredentialWriter for RecordingWriter {
	fn write(&self, credential: Credential) -> WriterFuture<'_> {
		Box::pin(async move {
			if self.fail {
				return Err(WriterError::Backend { message: "synthetic write failure".into() });
			}

			self.written.lock().push(credential);

			Ok(())
		})
	}
}

/// In-memory [`KubeconfigStore`] serving one optional entry and recording updates.
#[derive(Default)]
pub struct MemoryKubeconfig {
	entry: Option<AuthProviderEntry>,
	updates: Mutex<Vec<AuthProviderEntry>>,
	fail_updates: bool,
	reads: Mutex<usize>,
}
impl MemoryKubeconfig {
	/// Builds a store resolving every lookup to the provided entry.
	pub fn with_entry(entry: AuthProviderEntry) -> Self {
		Self { entry: Some(entry), ..Default::default() }
	}

	/// Builds a store with no matching entry; lookups fail.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Builds a store whose updates fail with a synthetic backend error.
	pub fn failing_updates(entry: AuthProviderEntry) -> Self {
		Self { entry: Some(entry), fail_updates: true, ..Default::default() }
	}

	/// Updates recorded so far, in call order.
	pub fn updates(&self) -> Vec<AuthProviderEntry> {
		self.updates.lock().clone()
	}

	/// Number of lookups served so far.
	pub fn read_count(&self) -> usize {
		*self.reads.lock()
	}
}
impl KubeconfigStore for MemoryKubeconfig {
	fn current_auth_provider<'a>(
		&'a self,
		_: Option<&'a Path>,
		_: Option<&'a ContextName>,
		_: Option<&'a UserName>,
	) -> KubeconfigFuture<'a, AuthProviderEntry> {
		Box::pin(async move {
			*self.reads.lock() += 1;

			self.entry.clone().ok_or(KubeconfigError::NoMatchingEntry)
		})
	}

	fn update_auth_provider<'a>(&'a self, entry: &'a AuthProviderEntry) -> KubeconfigFuture<'a, ()> {
		Box::pin(async move {
			if self.fail_updates {
				return Err(KubeconfigError::Backend {
					message: "synthetic update failure".into(),
				});
			}

			self.updates.lock().push(entry.clone());

			Ok(())
		})
	}
}

/// [`ProcessMutex`] wrapper counting acquire/release pairs around a [`MemoryMutex`].
#[derive(Default)]
pub struct CountingMutex {
	inner: MemoryMutex,
	acquired: Mutex<usize>,
	released: Mutex<usize>,
}
impl CountingMutex {
	/// Number of successful acquisitions so far.
	pub fn acquired(&self) -> usize {
		*self.acquired.lock()
	}

	/// Number of releases so far.
	pub fn released(&self) -> usize {
		*self.released.lock()
	}
}
impl ProcessMutex for CountingMutex {
	fn acquire<'a>(&'a self, name: &'a str) -> MutexFuture<'a, LockHandle> {
		Box::pin(async move {
			let handle = self.inner.acquire(name).await?;

			*self.acquired.lock() += 1;

			Ok(handle)
		})
	}

	fn release(&self, handle: LockHandle) -> MutexFuture<'_, ()> {
		Box::pin(async move {
			self.inner.release(handle).await?;

			*self.released.lock() += 1;

			Ok(())
		})
	}
}

/// [`ProcessMutex`] double whose acquisitions always fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoisonedMutex;
impl ProcessMutex for PoisonedMutex {
	fn acquire<'a>(&'a self, name: &'a str) -> MutexFuture<'a, LockHandle> {
		Box::pin(async move {
			Err(MutexError::Acquire {
				name: name.to_owned(),
				message: "synthetic acquire failure".into(),
			})
		})
	}

	fn release(&self, handle: LockHandle) -> MutexFuture<'_, ()> {
		Box::pin(async move {
			Err(MutexError::Release { name: handle.name, message: "never held".into() })
		})
	}
}
