// self
use crate::{_prelude::*, error::TokenFetchError, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by the pipeline and token cache.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("booking_client.call", kind = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a token fetch failure that the pipeline is about to swallow or convert.
pub fn warn_token_failure(kind: CallKind, err: &TokenFetchError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(kind = kind.as_str(), error = %err, "anti-forgery token unavailable");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, err);
	}
}

/// Logs a session expiry reported by the backend.
pub fn warn_session_expired(path: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(path, "backend reported an expired session");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = path;
	}
}

/// Logs an anti-forgery rejection that triggers a refresh-and-retry.
pub fn debug_anti_forgery_retry(path: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(path, "anti-forgery rejection; refreshing token and retrying once");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = path;
	}
}
