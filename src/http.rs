//! Transport primitives for backend calls.
//!
//! The module exposes [`ApiTransport`] alongside [`ApiResponse`] so callers can plug in a custom
//! HTTP stack (or an in-process fake) without losing the pipeline's anti-forgery and session
//! handling. A transport executes exactly one attempt; retries are decided by the pipeline.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransportError, request::ApiRequest};
#[cfg(feature = "reqwest")]
use crate::{
	config::ClientConfig,
	error::ConfigError,
	request::{Method, MultipartForm, PartValue, RequestBody},
};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one backend call.
///
/// Implementations must resolve to `Ok` for every response that was received, whatever its
/// status; `Err` is reserved for calls that never produced a response (DNS, TCP, TLS, timeout).
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` to the fully resolved `url`, carrying every header in
	/// [`ApiRequest::headers`] and the request body, if any.
	fn execute<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a>;
}

/// Status and body of a received response.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	const PREVIEW_LIMIT: usize = 256;

	/// Wraps a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Builds a response whose body is the serialized JSON `value`.
	pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
		Self::new(status, value.to_string())
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body, reporting the failing field path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}

	/// Returns the body as (lossy) UTF-8 text.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Returns the backend's `message` field when the body is a JSON object carrying one.
	pub fn message(&self) -> Option<String> {
		let value = serde_json::from_slice::<serde_json::Value>(&self.body).ok()?;

		value.get("message")?.as_str().map(str::to_owned)
	}

	/// Human-readable rejection text: the `message` field, else a bounded body preview.
	pub fn rejection_message(&self) -> String {
		self.message().unwrap_or_else(|| truncate_preview(self.text()))
	}
}
impl Debug for ApiResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiResponse")
			.field("status", &self.status)
			.field("body_len", &self.body.len())
			.finish()
	}
}

fn truncate_preview(mut body: String) -> String {
	if body.len() > ApiResponse::PREVIEW_LIMIT {
		let mut cut = ApiResponse::PREVIEW_LIMIT;

		while !body.is_char_boundary(cut) {
			cut -= 1;
		}

		body.truncate(cut);
		body.push('…');
	}

	body
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Build it with [`ReqwestTransport::from_config`] to get the configured timeout and, when
/// `with_credentials` is set, a cookie store that carries the backend's session cookie. A
/// custom [`ReqwestClient`] passed to [`ReqwestTransport::with_client`] keeps its own settings.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured timeout and credential policy.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.cookie_store(config.with_credentials)
			.timeout(config.std_timeout())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder = self.0.request(reqwest_method(request.method), url);

			for (name, value) in request.headers() {
				builder = builder.header(name, value);
			}

			// Non-positive overrides keep the client-wide timeout.
			if let Some(timeout) = request.options.timeout.filter(|timeout| timeout.is_positive())
				&& let Ok(timeout) = std::time::Duration::try_from(timeout)
			{
				builder = builder.timeout(timeout);
			}

			builder = match &request.body {
				None => builder,
				Some(RequestBody::Json(value)) => builder
					.header(reqwest::header::CONTENT_TYPE, "application/json")
					.body(value.to_string()),
				Some(RequestBody::Multipart(form)) => builder.multipart(multipart_form(form)?),
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse::new(status, body))
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: Method) -> reqwest::Method {
	match method {
		Method::Get => reqwest::Method::GET,
		Method::Post => reqwest::Method::POST,
		Method::Put => reqwest::Method::PUT,
		Method::Patch => reqwest::Method::PATCH,
		Method::Delete => reqwest::Method::DELETE,
	}
}

#[cfg(feature = "reqwest")]
fn multipart_form(form: &MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
	use reqwest::multipart::{Form, Part};

	let mut out = Form::new();

	for part in &form.parts {
		out = match &part.value {
			PartValue::Text(value) => out.text(part.name.clone(), value.clone()),
			PartValue::File { file_name, mime, bytes } => {
				let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());

				if let Some(mime) = mime {
					file = file.mime_str(mime)?;
				}

				out.part(part.name.clone(), file)
			},
		};
	}

	Ok(out)
}
