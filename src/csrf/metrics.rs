// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token cache activity.
#[derive(Debug, Default)]
pub struct CacheMetrics {
	fetches: AtomicU64,
	refreshes: AtomicU64,
	failures: AtomicU64,
}
impl CacheMetrics {
	/// Returns the number of calls issued to the token source.
	pub fn fetches(&self) -> u64 {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that replaced the cached token.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of failed token source calls.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_fetch(&self) {
		self.fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
