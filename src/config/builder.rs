// self
use crate::{_prelude::*, config::ClientConfig, error::ConfigError};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Backend origin.
	pub base_url: Url,
	/// Anti-forgery token endpoint path.
	pub csrf_endpoint: String,
	/// Anti-forgery header name.
	pub csrf_header: String,
	/// Anti-forgery rejection marker.
	pub anti_forgery_marker: String,
	/// Login route for session-expiry redirects.
	pub login_route: String,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Whether to keep a cookie store.
	pub with_credentials: bool,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with defaults for the provided origin.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			csrf_endpoint: ClientConfig::DEFAULT_CSRF_ENDPOINT.into(),
			csrf_header: ClientConfig::DEFAULT_CSRF_HEADER.into(),
			anti_forgery_marker: ClientConfig::DEFAULT_ANTI_FORGERY_MARKER.into(),
			login_route: ClientConfig::DEFAULT_LOGIN_ROUTE.into(),
			timeout: ClientConfig::DEFAULT_TIMEOUT,
			with_credentials: true,
		}
	}

	/// Parses the origin from a string before seeding the builder.
	pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
		let trimmed = base_url.trim();

		if trimmed.is_empty() {
			return Err(ConfigError::MissingBaseUrl);
		}

		let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self::new(url))
	}

	/// Sets the anti-forgery token endpoint path.
	pub fn csrf_endpoint(mut self, path: impl Into<String>) -> Self {
		self.csrf_endpoint = path.into();

		self
	}

	/// Sets the anti-forgery header name.
	pub fn csrf_header(mut self, name: impl Into<String>) -> Self {
		self.csrf_header = name.into();

		self
	}

	/// Sets the substring that identifies anti-forgery rejections.
	pub fn anti_forgery_marker(mut self, marker: impl Into<String>) -> Self {
		self.anti_forgery_marker = marker.into();

		self
	}

	/// Sets the login route used for session-expiry redirects.
	pub fn login_route(mut self, route: impl Into<String>) -> Self {
		self.login_route = route.into();

		self
	}

	/// Overrides the per-request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Toggles the cookie store.
	pub fn with_credentials(mut self, enabled: bool) -> Self {
		self.with_credentials = enabled;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let config = ClientConfig {
			base_url: self.base_url,
			csrf_endpoint: self.csrf_endpoint,
			csrf_header: self.csrf_header,
			anti_forgery_marker: self.anti_forgery_marker,
			login_route: self.login_route,
			timeout: self.timeout,
			with_credentials: self.with_credentials,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: self.base_url.to_string() });
		}

		validate_path("csrf_endpoint", &self.csrf_endpoint)?;
		validate_path("login_route", &self.login_route)?;
		validate_header_name(&self.csrf_header)?;

		if self.anti_forgery_marker.trim().is_empty() {
			return Err(ConfigError::EmptyMarker);
		}
		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(())
	}
}

fn validate_path(field: &'static str, path: &str) -> Result<(), ConfigError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(ConfigError::InvalidPath { field, path: path.to_owned() })
	}
}

// RFC 9110 `token` characters.
fn validate_header_name(name: &str) -> Result<(), ConfigError> {
	let valid = !name.is_empty()
		&& name.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));

	if valid { Ok(()) } else { Err(ConfigError::InvalidHeaderName { name: name.to_owned() }) }
}
