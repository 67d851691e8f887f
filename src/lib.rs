//! Orchestration core for OIDC cluster credential plugins—cache-aware token acquisition,
//! cross-process serialization, and exec-credential hand-off in one library crate.
//!
//! The crate composes four collaborator contracts—an [`authentication::Authenticator`]
//! delegate owning the OIDC protocol round, a [`cache::TokenCache`], a
//! [`guard::ProcessMutex`], and an output sink—into two acquisition use cases:
//! [`usecases::GetToken`] (cache-file mode, emitting through the exec credential
//! protocol) and [`usecases::Standalone`] (rewriting the token fields of a persisted
//! kubeconfig auth-provider entry in place).

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod authentication;
pub mod cache;
pub mod error;
pub mod grant;
pub mod guard;
pub mod kubeconfig;
pub mod oidc;
pub mod testing;
pub mod tls;
pub mod usecases;
pub mod writer;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

pub use url;
#[cfg(test)] use tokio as _;
