//! Lazily populated, single-flight anti-forgery token cache.

// self
use crate::{
	_prelude::*,
	csrf::{CacheMetrics, CsrfToken, TokenSource},
	error::TokenFetchError,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Freshness of the cached token.
///
/// Stale tokens are never stored: staleness is only discovered when the backend rejects a call,
/// at which point the pipeline refreshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
	/// No token is cached; the next [`TokenCache::get_token`] fetches one.
	Absent,
	/// A token is cached and will be handed out without a fetch.
	Valid,
}

#[derive(Debug, Default)]
struct Slot {
	token: Option<CsrfToken>,
	// Bumped on every stored fetch so waiting refreshers can tell a sibling already refreshed.
	generation: u64,
}

/// Process-wide owner of the anti-forgery token.
pub struct TokenCache {
	source: Arc<dyn TokenSource>,
	slot: Mutex<Slot>,
	flight: AsyncMutex<()>,
	metrics: CacheMetrics,
}
impl TokenCache {
	/// Creates an empty cache backed by `source`.
	pub fn new(source: Arc<dyn TokenSource>) -> Self {
		Self {
			source,
			slot: Mutex::new(Slot::default()),
			flight: AsyncMutex::new(()),
			metrics: CacheMetrics::default(),
		}
	}

	/// Returns the cached token, fetching and caching one when absent.
	pub async fn get_token(&self) -> Result<CsrfToken, TokenFetchError> {
		if let Some(token) = self.cached() {
			return Ok(token);
		}

		let _singleflight = self.flight.lock().await;

		if let Some(token) = self.cached() {
			return Ok(token);
		}

		let token = self.fetch(CallKind::TokenFetch).await?;

		self.store(token.clone());

		Ok(token)
	}

	/// Discards the cached token and fetches a replacement.
	///
	/// Callers that queued behind a refresh which completed while they waited receive that
	/// refreshed token instead of triggering another fetch. On failure the cache is left
	/// [`CacheState::Absent`].
	pub async fn refresh_token(&self) -> Result<CsrfToken, TokenFetchError> {
		let observed = self.slot.lock().generation;

		self.refresh_unless(|slot| slot.generation != observed).await
	}

	/// Replaces `stale`, the token a rejected call carried (`None` if it went out without one).
	///
	/// When the cache already holds a different token, a sibling refreshed after that call was
	/// sent and its token is returned without a fetch, however long ago that refresh finished.
	pub async fn refresh_stale(&self, stale: Option<&str>) -> Result<CsrfToken, TokenFetchError> {
		self.refresh_unless(|slot| {
			slot.token.as_ref().is_some_and(|token| Some(token.expose()) != stale)
		})
		.await
	}

	async fn refresh_unless(
		&self,
		superseded: impl Fn(&Slot) -> bool,
	) -> Result<CsrfToken, TokenFetchError> {
		let _singleflight = self.flight.lock().await;

		{
			let mut slot = self.slot.lock();

			if superseded(&*slot)
				&& let Some(token) = slot.token.clone()
			{
				return Ok(token);
			}

			slot.token = None;
		}

		let token = self.fetch(CallKind::TokenRefresh).await?;

		self.store(token.clone());
		self.metrics.record_refresh();

		Ok(token)
	}

	/// Forgets the cached token without fetching a replacement.
	pub fn clear_token(&self) {
		self.slot.lock().token = None;
	}

	/// Returns the cached token without fetching.
	pub fn cached(&self) -> Option<CsrfToken> {
		self.slot.lock().token.clone()
	}

	/// Returns the current freshness state.
	pub fn state(&self) -> CacheState {
		if self.slot.lock().token.is_some() { CacheState::Valid } else { CacheState::Absent }
	}

	/// Counters describing fetch/refresh activity.
	pub fn metrics(&self) -> &CacheMetrics {
		&self.metrics
	}

	fn store(&self, token: CsrfToken) {
		let mut slot = self.slot.lock();

		slot.token = Some(token);
		slot.generation = slot.generation.wrapping_add(1);
	}

	async fn fetch(&self, kind: CallKind) -> Result<CsrfToken, TokenFetchError> {
		let span = CallSpan::new(kind, "fetch_token");

		obs::record_call_outcome(kind, CallOutcome::Attempt);
		self.metrics.record_fetch();

		let result = span.instrument(self.source.fetch_token()).await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(err) => {
				self.metrics.record_failure();
				obs::record_call_outcome(kind, CallOutcome::Failure);
				obs::warn_token_failure(kind, err);
			},
		}

		result
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("state", &self.state())
			.field("metrics", &self.metrics)
			.finish()
	}
}
