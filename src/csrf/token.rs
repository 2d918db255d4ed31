//! Anti-forgery token wrapper that redacts its value.

// self
use crate::_prelude::*;

/// Opaque anti-forgery token. Formatting never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);
impl CsrfToken {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value for use as a header. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CsrfToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CsrfToken").field(&"<redacted>").finish()
	}
}
impl Display for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = CsrfToken::new("abc");

		assert_eq!(format!("{token:?}"), "CsrfToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.expose(), "abc");
	}
}
