//! Client-level error types shared across the pipeline, token cache, and booking API.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every pipeline call resolves to exactly one of these (or a response); a call that was retried
/// never yields both the retry's success and the first attempt's rejection.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No response was received (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The anti-forgery token endpoint itself failed.
	#[error(transparent)]
	TokenFetch(#[from] TokenFetchError),

	/// Backend answered with a non-2xx status that no pipeline rule resolved.
	#[error("Backend rejected the request with HTTP {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Backend-supplied `message` field, or a preview of the body.
		message: String,
	},
	/// Backend answered 2xx but flagged the operation as unsuccessful.
	#[error("Backend reported failure: {message}.")]
	Unsuccessful {
		/// Backend-supplied message.
		message: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
	/// Response body could not be decoded into the expected shape.
	#[error("Response body from HTTP {status} could not be decoded.")]
	Decode {
		/// Structured parsing failure, including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the undecodable response.
		status: u16,
	},
}
impl Error {
	/// Returns the HTTP status behind the error: a backend rejection, an undecodable response,
	/// or a failing token endpoint.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::TokenFetch(TokenFetchError::Status { status }) => Some(*status),
			_ => None,
		}
	}

	/// Whether the backend declared the caller's session expired.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Rejected { status: 401, .. })
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// No base URL was supplied.
	#[error("Missing backend base URL.")]
	MissingBaseUrl,
	/// Base URL cannot be parsed.
	#[error("Backend base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL is not an HTTP(S) origin.
	#[error("Backend base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Offending URL.
		url: String,
	},
	/// A configured path does not start with `/`.
	#[error("The {field} path must start with '/': {path}.")]
	InvalidPath {
		/// Which setting failed validation.
		field: &'static str,
		/// Offending value.
		path: String,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` cannot be resolved against the base URL.")]
	UnresolvablePath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name contains characters outside the HTTP token set.
	#[error("Header name `{name}` is invalid.")]
	InvalidHeaderName {
		/// Offending header name.
		name: String,
	},
	/// The anti-forgery marker is empty, which would match every 403.
	#[error("Anti-forgery marker cannot be empty.")]
	EmptyMarker,
	/// Timeout is zero or negative.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
	/// Environment variable required for configuration is absent.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO); no response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request to the backend timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Failures raised while obtaining an anti-forgery token.
#[derive(Debug, ThisError)]
pub enum TokenFetchError {
	/// Token endpoint answered with a non-2xx status.
	#[error("Token endpoint returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint returned an empty token.
	#[error("Token endpoint returned an empty token.")]
	EmptyToken,
	/// Token endpoint URL could not be resolved.
	#[error("Token endpoint URL could not be resolved.")]
	Config(#[source] ConfigError),
}
impl From<TransportError> for TokenFetchError {
	fn from(e: TransportError) -> Self {
		Self::Transport(e)
	}
}
