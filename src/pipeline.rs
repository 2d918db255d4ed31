//! Uniform call surface with transparent anti-forgery and session-expiry handling.
//!
//! Every call goes through [`ApiClient::send`]:
//!
//! 1. State-changing verbs ask the [`TokenCache`] for a token and attach it as the configured
//!    header. A token that cannot be obtained does not block the call; the backend stays the
//!    enforcement point.
//! 2. A `401` response flips the session to logged-out, raises a notice, and requests a redirect
//!    to the login route. It is never retried.
//! 3. A `403` whose message carries the anti-forgery marker refreshes the token and re-issues
//!    the same call exactly once. If the refresh fails, the token is cleared, a notice is raised,
//!    and the original rejection is returned.
//!
//! Every other non-2xx response is returned as [`Error::Rejected`].

pub mod rejection;

pub use rejection::*;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	csrf::{TokenCache, TokenFuture, TokenPayload, TokenSource},
	error::{ConfigError, TokenFetchError},
	http::{ApiResponse, ApiTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	request::{ApiRequest, Method, RequestBody, RequestOptions},
	session::{Notice, SessionHooks},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Notice raised when the backend reports an expired session.
pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";
/// Notice raised when an anti-forgery token could not be refreshed.
pub const TOKEN_EXPIRED_NOTICE: &str = "Security token expired. Please refresh the page.";

/// Request pipeline bound to one backend.
///
/// The client owns the transport, configuration, session hooks, rejection classifier, and the
/// process-wide [`TokenCache`]. Clones share all of them, including the cached token.
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound call, including token fetches.
	pub transport: Arc<T>,
	/// Validated backend configuration.
	pub config: Arc<ClientConfig>,
	/// Hooks into the application's session state.
	pub session: Arc<dyn SessionHooks>,
	/// Classifier consulted on every rejected response.
	pub classifier: Arc<dyn RejectionClassifier>,
	csrf: Arc<TokenCache>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
		session: Arc<dyn SessionHooks>,
	) -> Self {
		let transport = transport.into();
		let config = Arc::new(config);
		let source = EndpointTokenSource { transport: transport.clone(), config: config.clone() };
		let classifier = Arc::new(DefaultRejectionClassifier::new(&config.anti_forgery_marker));

		Self {
			transport,
			config,
			session,
			classifier,
			csrf: Arc::new(TokenCache::new(Arc::new(source))),
		}
	}

	/// Replaces the rejection classifier.
	pub fn with_classifier(mut self, classifier: Arc<dyn RejectionClassifier>) -> Self {
		self.classifier = classifier;

		self
	}

	/// The anti-forgery token cache shared by every clone of this client.
	pub fn csrf(&self) -> &TokenCache {
		&self.csrf
	}

	/// Issues any verb with an optional body and per-call options.
	///
	/// The verb shorthands below cover the common case; reach for this (or [`ApiClient::send`])
	/// to pass [`RequestOptions`] or a body on `DELETE`.
	pub async fn call(
		&self,
		method: Method,
		path: &str,
		body: Option<RequestBody>,
		options: RequestOptions,
	) -> Result<ApiResponse> {
		let mut request = ApiRequest::new(method, path).with_options(options);

		request.body = body;

		self.send(request).await
	}

	/// Issues a `GET`. Never carries an anti-forgery token.
	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		self.send(ApiRequest::get(path)).await
	}

	/// Issues a `POST` with a JSON body.
	pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send(ApiRequest::post(path).with_json(body)?).await
	}

	/// Issues a `PUT` with a JSON body.
	pub async fn put<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send(ApiRequest::put(path).with_json(body)?).await
	}

	/// Issues a `PATCH` with a JSON body.
	pub async fn patch<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.send(ApiRequest::patch(path).with_json(body)?).await
	}

	/// Issues a `DELETE` without a body; see [`ApiClient::call`] for one with a body or options.
	pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
		self.send(ApiRequest::delete(path)).await
	}

	/// Runs a fully described call through the pipeline.
	///
	/// Resolves to exactly one terminal outcome: the (possibly retried) successful response or
	/// a single error. A non-positive timeout override fails with
	/// [`ConfigError::NonPositiveTimeout`] before anything is sent.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		if request.options.timeout.is_some_and(|timeout| !timeout.is_positive()) {
			return Err(ConfigError::NonPositiveTimeout.into());
		}

		let kind = CallKind::for_method(request.method);
		let span = CallSpan::new(kind, "send");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(kind, request)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	async fn dispatch(&self, kind: CallKind, mut request: ApiRequest) -> Result<ApiResponse> {
		if request.method.is_state_changing() {
			// A failed fetch was already logged by the cache; send without the header.
			if let Ok(token) = self.csrf.get_token().await {
				request.attach_header(&self.config.csrf_header, token.expose());
			}
		}

		let url = self.url_for(&request)?;

		loop {
			let response = self.transport.execute(url.clone(), &request).await?;

			if response.is_success() {
				return Ok(response);
			}

			let ctx = RejectionContext::new(&request, &response);
			let rejected =
				Error::Rejected { status: response.status, message: response.rejection_message() };

			match self.classifier.classify(&ctx) {
				RejectionKind::SessionExpired => {
					self.expire_session(&request.path);

					return Err(rejected);
				},
				RejectionKind::AntiForgery if request.mark_retried() => {
					obs::debug_anti_forgery_retry(&request.path);

					let stale =
						request.attached_header(&self.config.csrf_header).map(str::to_owned);

					match self.csrf.refresh_stale(stale.as_deref()).await {
						Ok(token) => {
							request.attach_header(&self.config.csrf_header, token.expose());
							obs::record_call_outcome(kind, CallOutcome::Retry);
						},
						Err(_) => {
							self.session.notify(Notice::error(TOKEN_EXPIRED_NOTICE));
							self.csrf.clear_token();

							return Err(rejected);
						},
					}
				},
				_ => return Err(rejected),
			}
		}
	}

	fn url_for(&self, request: &ApiRequest) -> Result<Url> {
		let mut url = self.config.resolve(&request.path)?;

		if !request.options.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.options.query.iter());
		}

		Ok(url)
	}

	fn expire_session(&self, path: &str) {
		obs::warn_session_expired(path);
		self.session.set_logged_in(false);
		self.session.notify(Notice::error(SESSION_EXPIRED_NOTICE));
		self.session.redirect(&self.config.login_route);
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client with its own reqwest transport built from `config`.
	pub fn new(config: ClientConfig, session: Arc<dyn SessionHooks>) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Ok(Self::with_transport(config, transport, session))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			session: self.session.clone(),
			classifier: self.classifier.clone(),
			csrf: self.csrf.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("csrf", &self.csrf)
			.finish()
	}
}

/// Fetches tokens straight from the configured endpoint, bypassing the rejection rules so a
/// failing token endpoint can never log the user out.
struct EndpointTokenSource<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	config: Arc<ClientConfig>,
}
impl<T> TokenSource for EndpointTokenSource<T>
where
	T: ?Sized + ApiTransport,
{
	fn fetch_token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			let url = self.config.csrf_url().map_err(TokenFetchError::Config)?;
			let request = ApiRequest::get(self.config.csrf_endpoint.as_str());
			let response = self.transport.execute(url, &request).await?;

			if !response.is_success() {
				return Err(TokenFetchError::Status { status: response.status });
			}

			TokenPayload::decode(&response.body)
		})
	}
}
