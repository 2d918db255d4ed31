//! Client configuration shared by the transport, token cache, and pipeline.
//!
//! A [`ClientConfig`] is immutable once built; use [`ClientConfig::builder`] to assemble one
//! and let [`ClientConfigBuilder::build`] validate it.

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Validated settings for one backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend origin every request path is resolved against.
	pub base_url: Url,
	/// Path of the anti-forgery token endpoint.
	pub csrf_endpoint: String,
	/// Header that carries the anti-forgery token on state-changing requests.
	pub csrf_header: String,
	/// Substring of a 403 `message` that identifies an anti-forgery rejection.
	pub anti_forgery_marker: String,
	/// Route the application is redirected to when the session expires.
	pub login_route: String,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Keeps a cookie store so the backend's session cookie travels with each call.
	pub with_credentials: bool,
}
impl ClientConfig {
	/// Default anti-forgery token endpoint path.
	pub const DEFAULT_CSRF_ENDPOINT: &'static str = "/api/csrf-token";
	/// Default anti-forgery header name.
	pub const DEFAULT_CSRF_HEADER: &'static str = "X-CSRF-Token";
	/// Default anti-forgery rejection marker.
	pub const DEFAULT_ANTI_FORGERY_MARKER: &'static str = "CSRF";
	/// Default login route used for session-expiry redirects.
	pub const DEFAULT_LOGIN_ROUTE: &'static str = "/login";
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);
	/// Environment variable read by [`ClientConfig::from_env`].
	pub const BASE_URL_ENV: &'static str = "BACKEND_URL";

	/// Creates a new builder for the provided backend origin.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a default configuration from the `BACKEND_URL` environment variable.
	pub fn from_env() -> Result<Self, ConfigError> {
		let raw = std::env::var(Self::BASE_URL_ENV)
			.map_err(|_| ConfigError::MissingEnv { name: Self::BASE_URL_ENV })?;

		ClientConfigBuilder::parse(&raw)?.build()
	}

	/// Resolves a request path (e.g. `/api/doctor/list`) against the base URL.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path)
			.map_err(|source| ConfigError::UnresolvablePath { path: path.to_owned(), source })
	}

	/// Absolute URL of the anti-forgery token endpoint.
	pub fn csrf_url(&self) -> Result<Url, ConfigError> {
		self.resolve(&self.csrf_endpoint)
	}

	/// Timeout converted for transports that speak [`std::time::Duration`].
	pub fn std_timeout(&self) -> std::time::Duration {
		std::time::Duration::try_from(self.timeout).unwrap_or_default()
	}
}
