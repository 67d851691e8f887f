//! Cross-process mutual-exclusion contract serializing concurrent acquisitions.

pub mod memory;

pub use memory::MemoryMutex;

// std
use std::any::Any;
// self
use crate::_prelude::*;

/// Future type returned by [`ProcessMutex`] operations.
pub type MutexFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MutexError>> + 'a + Send>>;

/// Opaque handle identifying a held lock.
///
/// Returned by [`ProcessMutex::acquire`] and passed back unchanged to
/// [`ProcessMutex::release`]; the payload has no meaning to the orchestrators.
pub struct LockHandle {
	/// Name the lock was acquired under.
	pub name: String,
	/// Implementation-defined payload carried between acquire and release.
	pub data: Box<dyn Any + Send>,
}
impl LockHandle {
	/// Builds a handle around an implementation-defined payload.
	pub fn new(name: impl Into<String>, data: impl Any + Send) -> Self {
		Self { name: name.into(), data: Box::new(data) }
	}
}
impl Debug for LockHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LockHandle").field("name", &self.name).finish_non_exhaustive()
	}
}

/// Named mutual-exclusion primitive shared by cooperating invocations.
///
/// `acquire` blocks until the named lock is exclusively held. Dropping the returned
/// future abandons the attempt with no side effects, which is how callers cancel a
/// guard wait. Implementations may back the lock with a file lock, an OS-level named
/// semaphore, or an external coordination service; release must be safe to call even
/// after a failed critical section.
pub trait ProcessMutex
where
	Self: Send + Sync,
{
	/// Blocks until the named lock is held, returning the handle to release it with.
	fn acquire<'a>(&'a self, name: &'a str) -> MutexFuture<'a, LockHandle>;

	/// Releases a previously acquired lock.
	///
	/// Callers treat a failure here as non-fatal: the orchestrators log it and keep
	/// their already-determined outcome.
	fn release(&self, handle: LockHandle) -> MutexFuture<'_, ()>;
}

/// Error type produced by [`ProcessMutex`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MutexError {
	/// The named lock could not be acquired.
	#[error("could not acquire lock {name}: {message}")]
	Acquire {
		/// Lock name the acquisition targeted.
		name: String,
		/// Human-readable error payload.
		message: String,
	},
	/// The handle could not be released cleanly.
	#[error("could not release lock {name}: {message}")]
	Release {
		/// Lock name carried by the handle.
		name: String,
		/// Human-readable error payload.
		message: String,
	},
}
