//! File-backed [`TokenCache`] storing one JSON entry per key fingerprint.

// std
use std::{
	fs::{self, File},
	io::Write,
};
// self
use crate::{
	_prelude::*,
	cache::{CacheError, CacheFuture, CacheKey, TokenCache},
	oidc::TokenSet,
};

/// Stores each token set as `<cache root>/<key fingerprint>` in JSON form.
///
/// Writes go through a temporary file followed by a rename, so a concurrent reader
/// never observes a torn entry even without holding the process lock.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileCache;
impl FileCache {
	fn entry_path(root: &Path, key: &CacheKey) -> PathBuf {
		root.join(key.fingerprint())
	}

	fn read_entry(path: &Path) -> Result<TokenSet, CacheError> {
		if !path.exists() {
			return Err(CacheError::NotFound);
		}

		let bytes = fs::read(path).map_err(|e| CacheError::Backend {
			message: format!("failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| CacheError::Serialization {
			message: format!("failed to parse {}: {e}", path.display()),
		})
	}

	fn write_entry(root: &Path, path: &Path, token_set: &TokenSet) -> Result<(), CacheError> {
		fs::create_dir_all(root).map_err(|e| CacheError::Backend {
			message: format!("failed to create cache directory {}: {e}", root.display()),
		})?;

		let serialized = serde_json::to_vec(token_set).map_err(|e| CacheError::Serialization {
			message: format!("failed to serialize the cache entry: {e}"),
		})?;
		let mut tmp_path = path.to_path_buf();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| CacheError::Backend {
				message: format!("failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| CacheError::Backend {
				message: format!("failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| CacheError::Backend {
				message: format!("failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, path).map_err(|e| CacheError::Backend {
			message: format!("failed to replace {}: {e}", path.display()),
		})
	}
}
impl TokenCache for FileCache {
	fn find<'a>(&'a self, root: &'a Path, key: &'a CacheKey) -> CacheFuture<'a, TokenSet> {
		Box::pin(async move { Self::read_entry(&Self::entry_path(root, key)) })
	}

	fn save<'a>(
		&'a self,
		root: &'a Path,
		key: &'a CacheKey,
		token_set: &'a TokenSet,
	) -> CacheFuture<'a, ()> {
		Box::pin(async move { Self::write_entry(root, &Self::entry_path(root, key), token_set) })
	}
}
