//! Cache-file mode scenarios: fresh acquisition, reuse, and the failure contract of
//! every stage.

// std
use std::{path::PathBuf, sync::Arc};
// crates.io
use serde_json::json;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use oidc_credential_broker::{
	authentication::AuthenticationOutput,
	cache::CacheKey,
	error::Error,
	grant::GrantOptions,
	oidc::{Provider, TokenSecret, TokenSet},
	testing::{
		CountingMutex, FailingAuthenticator, MemoryCache, PoisonedMutex, RecordingWriter,
		StaticAuthenticator, encode_unsigned_jwt,
	},
	tls::TlsClientConfig,
	usecases::{GetToken, GetTokenInput},
};

fn issued_jwt(expiry: OffsetDateTime) -> String {
	encode_unsigned_jwt(&json!({
		"iss": "https://issuer.example.com",
		"sub": "subject-1",
		"exp": expiry.unix_timestamp(),
	}))
}

fn provider() -> Provider {
	Provider {
		issuer_url: Url::parse("https://issuer.example.com").expect("Issuer fixture should parse."),
		client_id: "my-client".into(),
		client_secret: Some("my-secret".into()),
		extra_scopes: vec!["email".into(), "groups".into()],
	}
}

fn input() -> GetTokenInput {
	GetTokenInput {
		provider: provider(),
		grant_options: GrantOptions::ClientCredentials,
		tls_client_config: TlsClientConfig::default(),
		token_cache_dir: PathBuf::from("/path/to/cache"),
	}
}

fn fresh_output(id_token: &str) -> AuthenticationOutput {
	AuthenticationOutput {
		token_set: TokenSet {
			id_token: TokenSecret::new(id_token),
			refresh_token: Some(TokenSecret::new("fresh-refresh")),
		},
		already_valid: false,
	}
}

#[tokio::test]
async fn fresh_token_is_cached_and_written() {
	let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
	let jwt = issued_jwt(expiry);
	let authenticator = Arc::new(StaticAuthenticator::new(fresh_output(&jwt)));
	let token_cache = Arc::new(MemoryCache::default());
	let writer = Arc::new(RecordingWriter::default());
	let process_mutex = Arc::new(CountingMutex::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: writer.clone(),
		process_mutex: process_mutex.clone(),
	};
	let request = input();
	let expected_key =
		CacheKey::derive(&request.provider, &request.tls_client_config, &request.grant_options);

	use_case.run(request).await.expect("Fresh acquisition should succeed.");

	let calls = authenticator.calls();

	assert_eq!(calls.len(), 1);
	assert!(calls[0].cached_token_set.is_none(), "Empty cache should offer no candidate.");

	let saves = token_cache.saves();

	assert_eq!(saves.len(), 1, "A fresh token should be saved exactly once.");
	assert_eq!(saves[0].0, expected_key.fingerprint());
	assert_eq!(saves[0].1.id_token.expose(), jwt);

	let written = writer.written();

	assert_eq!(written.len(), 1);
	assert_eq!(written[0].token.expose(), jwt);
	assert_eq!(written[0].expiry.unix_timestamp(), expiry.unix_timestamp());
	assert_eq!(process_mutex.acquired(), 1);
	assert_eq!(process_mutex.released(), 1);
}

#[tokio::test]
async fn valid_cached_token_is_reused_without_save() {
	let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
	let jwt = issued_jwt(expiry);
	let cached = TokenSet {
		id_token: TokenSecret::new(jwt.as_str()),
		refresh_token: Some(TokenSecret::new("cached-refresh")),
	};
	let authenticator = Arc::new(StaticAuthenticator::new(AuthenticationOutput {
		token_set: cached.clone(),
		already_valid: true,
	}));
	let token_cache = Arc::new(MemoryCache::default());
	let writer = Arc::new(RecordingWriter::default());
	let request = input();
	let key = CacheKey::derive(&request.provider, &request.tls_client_config, &request.grant_options);

	token_cache.seed(&key, cached.clone());

	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: writer.clone(),
		process_mutex: Arc::new(CountingMutex::default()),
	};

	use_case.run(request).await.expect("Reuse should succeed.");

	assert_eq!(
		authenticator.calls()[0].cached_token_set,
		Some(cached),
		"The cached token should be offered as the reuse candidate.",
	);
	assert!(token_cache.saves().is_empty(), "A reused token must never be re-saved.");
	assert_eq!(writer.written()[0].token.expose(), jwt);
}

#[tokio::test]
async fn lock_failure_prevents_all_side_effects() {
	let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
	let authenticator = Arc::new(StaticAuthenticator::new(fresh_output(&issued_jwt(expiry))));
	let token_cache = Arc::new(MemoryCache::default());
	let writer = Arc::new(RecordingWriter::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: writer.clone(),
		process_mutex: Arc::new(PoisonedMutex),
	};
	let err = use_case.run(input()).await.expect_err("Lock failure should abort.");

	assert!(matches!(err, Error::Lock(_)));
	assert_eq!(authenticator.call_count(), 0);
	assert!(token_cache.saves().is_empty());
	assert!(writer.written().is_empty());
}

#[tokio::test]
async fn authentication_failure_still_releases_the_lock() {
	let authenticator = Arc::new(FailingAuthenticator::new("provider unreachable"));
	let token_cache = Arc::new(MemoryCache::default());
	let writer = Arc::new(RecordingWriter::default());
	let process_mutex = Arc::new(CountingMutex::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: writer.clone(),
		process_mutex: process_mutex.clone(),
	};
	let err = use_case.run(input()).await.expect_err("Delegate failure should abort.");

	assert!(matches!(err, Error::Authentication(_)));
	assert_eq!(authenticator.call_count(), 1);
	assert_eq!(process_mutex.acquired(), 1);
	assert_eq!(process_mutex.released(), 1, "The lock must be released on the failure path.");
	assert!(token_cache.saves().is_empty());
	assert!(writer.written().is_empty());
}

#[tokio::test]
async fn cache_save_failure_is_distinct_and_blocks_output() {
	let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
	let authenticator = Arc::new(StaticAuthenticator::new(fresh_output(&issued_jwt(expiry))));
	let writer = Arc::new(RecordingWriter::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: Arc::new(MemoryCache::failing_saves()),
		writer: writer.clone(),
		process_mutex: Arc::new(CountingMutex::default()),
	};
	let err = use_case.run(input()).await.expect_err("Save failure should abort.");

	assert!(matches!(err, Error::CacheWrite(_)), "Save failure must not masquerade as {err:?}.");
	assert!(!matches!(err, Error::Authentication(_)));
	assert!(writer.written().is_empty(), "No credential goes out when the save failed.");
}

#[tokio::test]
async fn writer_failure_leaves_the_cache_consistent() {
	let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
	let authenticator = Arc::new(StaticAuthenticator::new(fresh_output(&issued_jwt(expiry))));
	let token_cache = Arc::new(MemoryCache::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: Arc::new(RecordingWriter::failing()),
		process_mutex: Arc::new(CountingMutex::default()),
	};
	let err = use_case.run(input()).await.expect_err("Writer failure should abort.");

	assert!(matches!(err, Error::CredentialWrite(_)));
	assert_eq!(token_cache.saves().len(), 1, "The cache save completed before the hand-off.");
}

#[tokio::test]
async fn malformed_token_fails_decode_before_any_write() {
	let authenticator = Arc::new(StaticAuthenticator::new(fresh_output("not-a-jwt")));
	let token_cache = Arc::new(MemoryCache::default());
	let writer = Arc::new(RecordingWriter::default());
	let process_mutex = Arc::new(CountingMutex::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: writer.clone(),
		process_mutex: process_mutex.clone(),
	};
	let err = use_case.run(input()).await.expect_err("Malformed token should abort.");

	assert!(matches!(err, Error::TokenDecode(_)));
	assert!(token_cache.saves().is_empty(), "A token that fails decoding is never cached.");
	assert!(writer.written().is_empty());
	assert_eq!(process_mutex.released(), 1);
}

#[tokio::test]
async fn corrupt_cache_lookup_degrades_to_a_full_round() {
	let expiry = OffsetDateTime::now_utc() + Duration::hours(1);
	let jwt = issued_jwt(expiry);
	let authenticator = Arc::new(StaticAuthenticator::new(fresh_output(&jwt)));
	let token_cache = Arc::new(MemoryCache::default());
	let writer = Arc::new(RecordingWriter::default());
	let use_case = GetToken {
		authenticator: authenticator.clone(),
		token_cache: token_cache.clone(),
		writer: writer.clone(),
		process_mutex: Arc::new(CountingMutex::default()),
	};

	// Nothing seeded: the lookup misses, which must not abort the operation.
	use_case.run(input()).await.expect("A cache miss should degrade, not fail.");

	assert!(authenticator.calls()[0].cached_token_set.is_none());
	assert_eq!(writer.written().len(), 1);
}
