#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc, time::Duration};
// crates.io
use parking_lot::Mutex;
// self
use booking_client::{
	config::ClientConfig,
	error::TransportError,
	http::{ApiResponse, ApiTransport, TransportFuture},
	pipeline::ApiClient,
	request::{ApiRequest, Method, RequestBody},
	session::MemorySession,
	url::Url,
};
#[cfg(feature = "reqwest")] use booking_client::pipeline::ReqwestApiClient;

pub const BASE_URL: &str = "https://booking.test";
pub const CSRF_PATH: &str = "/api/csrf-token";

/// One request as the transport saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
	pub method: Method,
	pub path: String,
	pub query: Option<String>,
	pub csrf: Option<String>,
	pub body: Option<RequestBody>,
}

/// In-process transport that replays queued responses and records every request.
///
/// Token endpoint calls and API calls draw from separate queues so tests can script each side.
#[derive(Default)]
pub struct ScriptedTransport {
	tokens: Mutex<VecDeque<ApiResponse>>,
	// Each response is held back for its delay once its call arrives.
	responses: Mutex<VecDeque<(ApiResponse, Duration)>>,
	recorded: Mutex<Vec<Recorded>>,
}
impl ScriptedTransport {
	pub fn token(&self, token: &str) -> &Self {
		let body = serde_json::json!({ "token": token });

		self.tokens.lock().push_back(ApiResponse::json_body(200, &body));

		self
	}

	pub fn token_status(&self, status: u16) -> &Self {
		self.tokens.lock().push_back(ApiResponse::json_body(status, &serde_json::json!({})));

		self
	}

	pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
		self.respond_after(0, status, body)
	}

	pub fn respond_after(&self, delay_ms: u64, status: u16, body: serde_json::Value) -> &Self {
		let response = ApiResponse::json_body(status, &body);

		self.responses.lock().push_back((response, Duration::from_millis(delay_ms)));

		self
	}

	pub fn ok(&self) -> &Self {
		self.respond(200, serde_json::json!({ "success": true }))
	}

	pub fn anti_forgery_rejection(&self) -> &Self {
		self.anti_forgery_rejection_after(0)
	}

	pub fn anti_forgery_rejection_after(&self, delay_ms: u64) -> &Self {
		let body = serde_json::json!({ "success": false, "message": "Invalid CSRF token" });

		self.respond_after(delay_ms, 403, body)
	}

	pub fn session_expired(&self) -> &Self {
		self.respond(401, serde_json::json!({ "success": false, "message": "Not Authorized" }))
	}

	pub fn recorded(&self) -> Vec<Recorded> {
		self.recorded.lock().clone()
	}

	/// Recorded calls other than token fetches.
	pub fn api_calls(&self) -> Vec<Recorded> {
		self.recorded().into_iter().filter(|call| call.path != CSRF_PATH).collect()
	}

	pub fn token_fetches(&self) -> usize {
		self.recorded().iter().filter(|call| call.path == CSRF_PATH).count()
	}
}
impl ApiTransport for ScriptedTransport {
	fn execute<'a>(&'a self, url: Url, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let csrf = request
				.headers()
				.find(|(name, _)| name.eq_ignore_ascii_case("x-csrf-token"))
				.map(|(_, value)| value.to_owned());

			self.recorded.lock().push(Recorded {
				method: request.method,
				path: url.path().to_owned(),
				query: url.query().map(str::to_owned),
				csrf,
				body: request.body.clone(),
			});

			let unscripted =
				|| TransportError::Io(std::io::Error::other(format!("Unscripted call to {url}.")));

			if url.path() == CSRF_PATH {
				return self.tokens.lock().pop_front().ok_or_else(unscripted);
			}

			let (response, delay) = self.responses.lock().pop_front().ok_or_else(unscripted)?;

			if !delay.is_zero() {
				tokio::time::sleep(delay).await;
			}

			Ok(response)
		})
	}
}

pub fn config() -> ClientConfig {
	ClientConfig::builder(Url::parse(BASE_URL).expect("Test base URL should parse."))
		.build()
		.expect("Default test configuration should validate.")
}

pub fn scripted_client()
-> (ApiClient<ScriptedTransport>, Arc<ScriptedTransport>, MemorySession) {
	let transport = Arc::new(ScriptedTransport::default());
	let session = MemorySession::logged_in();
	let client = ApiClient::with_transport(config(), transport.clone(), Arc::new(session.clone()));

	(client, transport, session)
}

#[cfg(feature = "reqwest")]
pub fn reqwest_client(base_url: &str) -> (ReqwestApiClient, MemorySession) {
	let base_url = Url::parse(base_url).expect("Mock server URL should parse.");
	let config =
		ClientConfig::builder(base_url).build().expect("Mock server configuration should validate.");
	let session = MemorySession::logged_in();
	let client = ReqwestApiClient::new(config, Arc::new(session.clone()))
		.expect("Reqwest-backed client should build.");

	(client, session)
}
