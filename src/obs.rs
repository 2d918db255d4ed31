//! Optional observability helpers for pipeline calls and token fetches.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to wrap calls in spans named `booking_client.call` with the
//!   `kind` (call category) and `stage` (call site) fields, and to log swallowed token failures.
//! - Enable `metrics` to increment the `booking_client_call_total` counter for every
//!   attempt/retry/success/failure, labeled by `kind` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, request::Method};

/// Call categories observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Read-only backend call.
	Read,
	/// State-changing backend call.
	Write,
	/// Lazy anti-forgery token fetch.
	TokenFetch,
	/// Forced anti-forgery token refresh.
	TokenRefresh,
}
impl CallKind {
	/// Classifies a backend call by its verb.
	pub const fn for_method(method: Method) -> Self {
		if method.is_state_changing() { Self::Write } else { Self::Read }
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Read => "read",
			CallKind::Write => "write",
			CallKind::TokenFetch => "token_fetch",
			CallKind::TokenRefresh => "token_refresh",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to the pipeline.
	Attempt,
	/// The call was re-issued after an anti-forgery refresh.
	Retry,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Retry => "retry",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
