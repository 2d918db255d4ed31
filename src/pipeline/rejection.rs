//! Rejection classification hooks consulted on every non-2xx response.
//!
//! Classifiers only see primitive data (verb, path, status, backend message) so they stay
//! decoupled from any HTTP client. The pipeline owns the consequences of each
//! [`RejectionKind`]; the classifier only names it.

// self
use crate::{
	_prelude::*,
	http::ApiResponse,
	request::{ApiRequest, Method},
};

/// Strategy hook that maps a rejected response onto a pipeline reaction.
pub trait RejectionClassifier
where
	Self: Send + Sync,
{
	/// Names the reaction the pipeline should take for this rejection.
	fn classify(&self, ctx: &RejectionContext) -> RejectionKind;
}

/// Pipeline reactions to a rejected response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionKind {
	/// The session is gone; log out, notify, and redirect. Never retried.
	SessionExpired,
	/// The anti-forgery token was refused; refresh it and retry once.
	AntiForgery,
	/// Surface to the caller unchanged.
	Other,
}

/// Context passed to classifiers for one rejected response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectionContext {
	/// Verb of the rejected call.
	pub method: Method,
	/// Path of the rejected call.
	pub path: String,
	/// HTTP status code.
	pub status: u16,
	/// Backend-supplied `message` field, when the body carried one.
	pub message: Option<String>,
	/// Whether the call had already been retried.
	pub retried: bool,
}
impl RejectionContext {
	/// Captures the context of `response` for `request`.
	pub fn new(request: &ApiRequest, response: &ApiResponse) -> Self {
		Self {
			method: request.method,
			path: request.path.clone(),
			status: response.status,
			message: response.message(),
			retried: request.is_retried(),
		}
	}
}

/// Default classification: `401` expires the session; `403` whose message contains the
/// anti-forgery marker is an anti-forgery rejection. `401` is checked first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultRejectionClassifier {
	marker: String,
}
impl DefaultRejectionClassifier {
	/// Creates a classifier matching `marker` inside 403 messages.
	pub fn new(marker: impl Into<String>) -> Self {
		Self { marker: marker.into() }
	}
}
impl RejectionClassifier for DefaultRejectionClassifier {
	fn classify(&self, ctx: &RejectionContext) -> RejectionKind {
		match ctx.status {
			401 => RejectionKind::SessionExpired,
			403 if ctx.message.as_deref().is_some_and(|message| message.contains(&self.marker)) =>
				RejectionKind::AntiForgery,
			_ => RejectionKind::Other,
		}
	}
}
