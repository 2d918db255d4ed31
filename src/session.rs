//! Hooks into the surrounding application's session state, notices, and navigation.
//!
//! The pipeline never owns session state. It reports what happened through [`SessionHooks`]:
//! flip "logged in" off when the backend says the session expired, raise a user-visible
//! [`Notice`], and ask for a redirect. [`MemorySession`] records all three in-process.

// self
use crate::_prelude::*;

/// Contract implemented by whatever holds session state for the application.
pub trait SessionHooks
where
	Self: Send + Sync,
{
	/// Sets the shared logged-in flag.
	fn set_logged_in(&self, logged_in: bool);

	/// Surfaces a user-visible notice (toast, snackbar, status line).
	fn notify(&self, notice: Notice);

	/// Requests navigation to an application route.
	fn redirect(&self, route: &str);
}

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
	/// Neutral information.
	Info,
	/// Operation succeeded.
	Success,
	/// Operation failed.
	Error,
}

/// User-visible message raised by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
	/// Severity.
	pub level: NoticeLevel,
	/// Message text.
	pub message: String,
	/// Instant the notice was raised.
	#[serde(with = "time::serde::rfc3339")]
	pub raised_at: OffsetDateTime,
}
impl Notice {
	/// Creates a notice stamped with the current time.
	pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
		Self { level, message: message.into(), raised_at: OffsetDateTime::now_utc() }
	}

	/// Shorthand for [`NoticeLevel::Info`].
	pub fn info(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Info, message)
	}

	/// Shorthand for [`NoticeLevel::Success`].
	pub fn success(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Success, message)
	}

	/// Shorthand for [`NoticeLevel::Error`].
	pub fn error(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Error, message)
	}
}

/// Point-in-time copy of a [`MemorySession`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
	/// Current logged-in flag.
	pub logged_in: bool,
	/// Notices in the order they were raised.
	pub notices: Vec<Notice>,
	/// Redirect intents in the order they were requested.
	pub redirects: Vec<String>,
	/// Number of times the logged-in flag was set to `false`.
	pub logouts: usize,
}

/// Thread-safe session state kept in-process for headless callers and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySession(Arc<RwLock<SessionSnapshot>>);
impl MemorySession {
	/// Creates a session that starts logged in.
	pub fn logged_in() -> Self {
		let session = Self::default();

		session.0.write().logged_in = true;

		session
	}

	/// Returns the current logged-in flag.
	pub fn is_logged_in(&self) -> bool {
		self.0.read().logged_in
	}

	/// Returns a copy of everything recorded so far.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.0.read().clone()
	}

	/// Returns recorded notices.
	pub fn notices(&self) -> Vec<Notice> {
		self.0.read().notices.clone()
	}

	/// Returns recorded redirect intents.
	pub fn redirects(&self) -> Vec<String> {
		self.0.read().redirects.clone()
	}

	/// Drains recorded notices, leaving the list empty.
	pub fn take_notices(&self) -> Vec<Notice> {
		std::mem::take(&mut self.0.write().notices)
	}
}
impl SessionHooks for MemorySession {
	fn set_logged_in(&self, logged_in: bool) {
		let mut state = self.0.write();

		if !logged_in {
			state.logouts += 1;
		}

		state.logged_in = logged_in;
	}

	fn notify(&self, notice: Notice) {
		self.0.write().notices.push(notice);
	}

	fn redirect(&self, route: &str) {
		self.0.write().redirects.push(route.to_owned());
	}
}
