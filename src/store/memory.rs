//! Thread-safe in-memory [`StateStore`] for single-process deployments, demos, and tests.

// self
use crate::{
	_prelude::*,
	store::{StateStore, StoreError, StoreFuture},
};

#[derive(Clone, Debug)]
struct Entry {
	value: String,
	expires_at: OffsetDateTime,
}
impl Entry {
	fn is_live_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

type StateMap = Arc<RwLock<HashMap<String, Entry>>>;

/// Keeps pending states in-process; expired entries read as absent and are purged on access.
#[derive(Clone, Debug, Default)]
pub struct MemoryStateStore(StateMap);
impl MemoryStateStore {
	/// Number of stored entries, including expired ones not yet purged.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn set_now(map: &StateMap, key: &str, value: &str, ttl: Duration) {
		let expires_at = OffsetDateTime::now_utc().saturating_add(ttl);

		map.write().insert(key.to_owned(), Entry { value: value.to_owned(), expires_at });
	}

	fn get_now(map: &StateMap, key: &str) -> Option<String> {
		let now = OffsetDateTime::now_utc();

		if let Some(entry) = map.read().get(key) {
			if entry.is_live_at(now) {
				return Some(entry.value.clone());
			}
		} else {
			return None;
		}

		let mut guard = map.write();

		// Re-check under the write lock; a concurrent `set` may have refreshed the entry.
		match guard.get(key) {
			Some(entry) if entry.is_live_at(now) => Some(entry.value.clone()),
			Some(_) => {
				guard.remove(key);

				None
			},
			None => None,
		}
	}

	fn take_if_now(map: &StateMap, key: &str, expected: &str) -> bool {
		let now = OffsetDateTime::now_utc();
		let mut guard = map.write();

		match guard.get(key) {
			Some(entry) if entry.is_live_at(now) && entry.value == expected => {
				guard.remove(key);

				true
			},
			Some(entry) if !entry.is_live_at(now) => {
				guard.remove(key);

				false
			},
			_ => false,
		}
	}
}
impl StateStore for MemoryStateStore {
	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			Self::set_now(&self.0, key, value, ttl);

			Ok::<_, StoreError>(())
		})
	}

	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move { Ok(Self::get_now(&self.0, key)) })
	}

	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.0.write().remove(key);

			Ok(())
		})
	}

	fn take_if<'a>(&'a self, key: &'a str, expected: &'a str) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(Self::take_if_now(&self.0, key, expected)) })
	}
}
