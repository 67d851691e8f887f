//! In-process [`ProcessMutex`] backed by named async mutexes.

// self
use crate::{
	_prelude::*,
	guard::{LockHandle, MutexError, MutexFuture, ProcessMutex},
};

/// Serializes invocations that share one instance within a single process.
///
/// Each name maps to its own async mutex, so locks with different names never
/// contend. Cross-process deployments back [`ProcessMutex`] with a file or OS-level
/// lock instead; this implementation covers embedders running every invocation in
/// one process and doubles as the guard used by the test suites.
#[derive(Default)]
pub struct MemoryMutex {
	guards: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}
impl MemoryMutex {
	/// Returns (and creates on demand) the mutex registered under the name.
	fn guard(&self, name: &str) -> Arc<AsyncMutex<()>> {
		self.guards
			.lock()
			.entry(name.to_owned())
			.or_insert_with(|| Arc::new(AsyncMutex::new(())))
			.clone()
	}
}
impl ProcessMutex for MemoryMutex {
	fn acquire<'a>(&'a self, name: &'a str) -> MutexFuture<'a, LockHandle> {
		Box::pin(async move {
			let guard = self.guard(name).lock_arc().await;

			Ok(LockHandle::new(name, guard))
		})
	}

	fn release(&self, handle: LockHandle) -> MutexFuture<'_, ()> {
		Box::pin(async move {
			// Dropping the payload releases the underlying guard.
			drop(handle);

			Ok(())
		})
	}
}
impl Debug for MemoryMutex {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryMutex").field("names", &self.guards.lock().len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Duration;
	// self
	use super::*;

	#[tokio::test]
	async fn same_name_is_exclusive_until_released() {
		let mutex = MemoryMutex::default();
		let handle =
			mutex.acquire("get-token").await.expect("First acquisition should succeed.");
		let contended = tokio::time::timeout(Duration::from_millis(50), mutex.acquire("get-token"));

		assert!(contended.await.is_err(), "Second acquisition should block while held.");

		mutex.release(handle).await.expect("Release should succeed.");

		let reacquired = tokio::time::timeout(Duration::from_millis(50), mutex.acquire("get-token"))
			.await
			.expect("Acquisition should complete after release.")
			.expect("Reacquisition should succeed.");

		assert_eq!(reacquired.name, "get-token");
	}

	#[tokio::test]
	async fn distinct_names_do_not_contend() {
		let mutex = MemoryMutex::default();
		let _held = mutex.acquire("get-token").await.expect("First name should lock.");
		let other = tokio::time::timeout(Duration::from_millis(50), mutex.acquire("other"))
			.await
			.expect("A different name should not block.")
			.expect("A different name should acquire.");

		assert_eq!(other.name, "other");
	}

	#[tokio::test]
	async fn dropping_a_pending_acquire_leaves_the_lock_usable() {
		let mutex = MemoryMutex::default();
		let handle = mutex.acquire("get-token").await.expect("First acquisition should succeed.");

		// A cancelled waiter must not poison the lock for later acquisitions.
		drop(tokio::time::timeout(Duration::from_millis(10), mutex.acquire("get-token")).await);

		mutex.release(handle).await.expect("Release should succeed.");
		mutex.acquire("get-token").await.expect("Lock should be acquirable after cancellation.");
	}
}
