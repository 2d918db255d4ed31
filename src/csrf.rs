//! Anti-forgery token model, cache, and the source seam the cache fetches from.
//!
//! The [`TokenCache`] is the only owner of the current token. It fetches lazily on
//! [`TokenCache::get_token`], replaces the token on [`TokenCache::refresh_token`], and forgets it
//! on [`TokenCache::clear_token`]. Concurrent fetches are coalesced behind one async guard so a
//! burst of stale-token rejections produces a single refresh call.

pub mod cache;
pub mod token;

mod metrics;

pub use cache::*;
pub use metrics::CacheMetrics;
pub use token::*;

// self
use crate::{_prelude::*, error::TokenFetchError};

/// Boxed future returned by [`TokenSource::fetch_token`].
pub type TokenFuture<'a> =
	Pin<Box<dyn Future<Output = Result<CsrfToken, TokenFetchError>> + 'a + Send>>;

/// Anything that can mint a fresh anti-forgery token, typically the backend's token endpoint.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Fetches a brand-new token; never consults a cache.
	fn fetch_token(&self) -> TokenFuture<'_>;
}

/// Wire shape of the token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TokenPayload {
	#[serde(alias = "csrfToken")]
	pub(crate) token: String,
}
impl TokenPayload {
	/// Decodes the endpoint body, reporting the failing field path on error.
	pub(crate) fn decode(body: &[u8]) -> Result<CsrfToken, TokenFetchError> {
		let mut de = serde_json::Deserializer::from_slice(body);
		let payload: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| TokenFetchError::Parse { source })?;

		if payload.token.trim().is_empty() {
			return Err(TokenFetchError::EmptyToken);
		}

		Ok(CsrfToken::new(payload.token))
	}
}
