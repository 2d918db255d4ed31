//! Registration, login, one-time-password, password reset, and logout.
//!
//! Calls that establish a session flip the shared logged-in flag through
//! [`SessionHooks`](crate::session::SessionHooks); the session itself lives in the backend's
//! cookie, so no credential is stored client-side.

// self
use crate::{_prelude::*, api, http::ApiTransport, pipeline::ApiClient};

const REGISTER: &str = "/api/user/register";
const LOGIN: &str = "/api/user/login";
const VERIFY_REGISTRATION_OTP: &str = "/api/user/verify-otp";
const VERIFY_LOGIN_OTP: &str = "/api/user/verify-login-otp";
const RESEND_REGISTRATION_OTP: &str = "/api/user/resend-otp";
const RESEND_LOGIN_OTP: &str = "/api/user/resend-login-otp";
const VERIFY_RESET_TOKEN: &str = "/api/user/verify-reset-token";
const RESET_PASSWORD: &str = "/api/user/reset-password";
const LOGOUT: &str = "/api/user/logout";

/// Message the backend sends when registration must be confirmed by e-mail OTP.
pub const REGISTRATION_OTP_MESSAGE: &str =
	"OTP sent to your email. Please verify to complete registration.";

/// New account details.
#[derive(Clone, Serialize)]
pub struct Registration {
	/// Display name.
	pub name: String,
	/// Account e-mail.
	pub email: String,
	/// Chosen password.
	pub password: String,
}
impl Registration {
	/// Creates registration details.
	pub fn new(
		name: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self { name: name.into(), email: email.into(), password: password.into() }
	}
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Login credentials.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
	/// Account e-mail.
	pub email: String,
	/// Password.
	pub password: String,
	/// Captcha response, required by the backend after repeated failures.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub captcha_token: Option<String>,
}
impl Credentials {
	/// Creates credentials without a captcha response.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into(), captcha_token: None }
	}

	/// Attaches a captcha response.
	pub fn with_captcha(mut self, token: impl Into<String>) -> Self {
		self.captcha_token = Some(token.into());

		self
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("captcha_token_set", &self.captcha_token.is_some())
			.finish()
	}
}

/// New password submitted with a reset token.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
	/// Token from the reset e-mail.
	pub token: String,
	/// New password.
	pub password: String,
	/// Confirmation, checked again by the backend.
	pub confirm_password: String,
}
impl PasswordReset {
	/// Creates a reset request whose confirmation matches the password.
	pub fn new(token: impl Into<String>, password: impl Into<String>) -> Self {
		let password = password.into();

		Self { token: token.into(), confirm_password: password.clone(), password }
	}
}
impl Debug for PasswordReset {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordReset").field("token", &"<redacted>").finish_non_exhaustive()
	}
}

/// Result of [`ApiClient::register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
	/// The account is active and the session is logged in.
	Registered {
		/// Backend message, if any.
		message: Option<String>,
	},
	/// An OTP was e-mailed; finish with [`ApiClient::verify_registration_otp`].
	OtpSent {
		/// Backend message.
		message: String,
	},
}

/// Result of [`ApiClient::login`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
	/// The session is logged in.
	LoggedIn {
		/// Backend message, if any.
		message: Option<String>,
	},
	/// A second factor was e-mailed; finish with [`ApiClient::verify_login_otp`].
	OtpRequired {
		/// Backend message, if any.
		message: Option<String>,
	},
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
	#[serde(default)]
	requires_otp: bool,
}

#[derive(Serialize)]
struct OtpBody<'a> {
	email: &'a str,
	otp: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
	email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
	token: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates an account.
	pub async fn register(&self, registration: &Registration) -> Result<RegisterOutcome> {
		let response = self.post(REGISTER, registration).await?;
		let message = api::unwrap_ack(&response)?;

		match message {
			Some(message) if message == REGISTRATION_OTP_MESSAGE =>
				Ok(RegisterOutcome::OtpSent { message }),
			message => {
				self.session.set_logged_in(true);

				Ok(RegisterOutcome::Registered { message })
			},
		}
	}

	/// Logs in, or starts the e-mail second factor when the backend asks for it.
	pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
		let response = self.post(LOGIN, credentials).await?;
		let api::Reply { message, data } = api::unwrap_envelope::<LoginPayload>(&response)?;

		if data.requires_otp {
			return Ok(LoginOutcome::OtpRequired { message });
		}

		self.session.set_logged_in(true);

		Ok(LoginOutcome::LoggedIn { message })
	}

	/// Confirms a registration OTP. The patient logs in afterwards.
	pub async fn verify_registration_otp(&self, email: &str, otp: &str) -> Result<Option<String>> {
		let response = self.post(VERIFY_REGISTRATION_OTP, &OtpBody { email, otp }).await?;

		api::unwrap_ack(&response)
	}

	/// Confirms a login OTP and marks the session logged in.
	pub async fn verify_login_otp(&self, email: &str, otp: &str) -> Result<Option<String>> {
		let response = self.post(VERIFY_LOGIN_OTP, &OtpBody { email, otp }).await?;
		let message = api::unwrap_ack(&response)?;

		self.session.set_logged_in(true);

		Ok(message)
	}

	/// Re-sends the registration OTP.
	pub async fn resend_registration_otp(&self, email: &str) -> Result<Option<String>> {
		let response = self.post(RESEND_REGISTRATION_OTP, &EmailBody { email }).await?;

		api::unwrap_ack(&response)
	}

	/// Re-sends the login OTP.
	pub async fn resend_login_otp(&self, email: &str) -> Result<Option<String>> {
		let response = self.post(RESEND_LOGIN_OTP, &EmailBody { email }).await?;

		api::unwrap_ack(&response)
	}

	/// Checks that a password reset token is still valid.
	pub async fn verify_reset_token(&self, token: &str) -> Result<Option<String>> {
		let response = self.post(VERIFY_RESET_TOKEN, &TokenBody { token }).await?;

		api::unwrap_ack(&response)
	}

	/// Sets a new password using a reset token.
	pub async fn reset_password(&self, reset: &PasswordReset) -> Result<Option<String>> {
		let response = self.post(RESET_PASSWORD, reset).await?;

		api::unwrap_ack(&response)
	}

	/// Ends the session.
	///
	/// Local state is reset whatever the backend answers: the session is marked logged out and
	/// the anti-forgery token, which is bound to the old session, is dropped.
	pub async fn logout(&self) -> Result<Option<String>> {
		let result = self
			.post(LOGOUT, &serde_json::json!({}))
			.await
			.and_then(|response| api::unwrap_ack(&response));

		self.session.set_logged_in(false);
		self.csrf().clear_token();

		result
	}
}
