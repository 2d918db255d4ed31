//! Request descriptors handed to the pipeline and replayed on retry.

// self
use crate::_prelude::*;

/// HTTP verbs exposed by the call surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// Read.
	Get,
	/// Create.
	Post,
	/// Replace.
	Put,
	/// Update.
	Patch,
	/// Delete.
	Delete,
}
impl Method {
	/// Whether the verb mutates backend state and therefore carries an anti-forgery token.
	pub const fn is_state_changing(self) -> bool {
		!matches!(self, Self::Get)
	}

	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Body sent with a request.
///
/// Bodies are kept as owned data rather than transport-specific builders so the pipeline can
/// replay the exact same call after a token refresh.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
	/// `application/json` payload.
	Json(serde_json::Value),
	/// `multipart/form-data` payload.
	Multipart(MultipartForm),
}
impl RequestBody {
	/// Serializes any [`Serialize`] value into a JSON body.
	pub fn json<B>(body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		serde_json::to_value(body).map(Self::Json).map_err(Error::Encode)
	}
}
impl From<MultipartForm> for RequestBody {
	fn from(form: MultipartForm) -> Self {
		Self::Multipart(form)
	}
}

/// Ordered multipart form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipartForm {
	/// Parts in submission order.
	pub parts: Vec<FormPart>,
}
impl MultipartForm {
	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(FormPart { name: name.into(), value: PartValue::Text(value.into()) });

		self
	}

	/// Appends a file field.
	pub fn file(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		mime: Option<String>,
		bytes: Vec<u8>,
	) -> Self {
		self.parts.push(FormPart {
			name: name.into(),
			value: PartValue::File { file_name: file_name.into(), mime, bytes },
		});

		self
	}

	/// Looks up the first text field with the given name.
	pub fn text_value(&self, name: &str) -> Option<&str> {
		self.parts.iter().find(|part| part.name == name).and_then(|part| match &part.value {
			PartValue::Text(value) => Some(value.as_str()),
			PartValue::File { .. } => None,
		})
	}
}

/// One named multipart field.
#[derive(Clone, Debug, PartialEq)]
pub struct FormPart {
	/// Field name.
	pub name: String,
	/// Field content.
	pub value: PartValue,
}

/// Content of a multipart field.
#[derive(Clone, PartialEq)]
pub enum PartValue {
	/// Plain text.
	Text(String),
	/// Binary upload.
	File {
		/// File name reported to the backend.
		file_name: String,
		/// Optional MIME type.
		mime: Option<String>,
		/// File content.
		bytes: Vec<u8>,
	},
}
impl Debug for PartValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
			Self::File { file_name, mime, bytes } => f
				.debug_struct("File")
				.field("file_name", file_name)
				.field("mime", mime)
				.field("len", &bytes.len())
				.finish(),
		}
	}
}

/// Per-call options supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Extra headers sent with the call.
	pub headers: BTreeMap<String, String>,
	/// Query pairs appended to the URL.
	pub query: Vec<(String, String)>,
	/// Timeout override for this call only.
	pub timeout: Option<Duration>,
}
impl RequestOptions {
	/// Adds a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Adds a query pair.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Overrides the timeout for this call.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}
}

/// Transient descriptor for one logical call, including its retry marker.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Path resolved against the configured base URL.
	pub path: String,
	/// Optional body.
	pub body: Option<RequestBody>,
	/// Caller-supplied options.
	pub options: RequestOptions,
	attached: BTreeMap<String, String>,
	retried: bool,
}
impl ApiRequest {
	/// Creates a descriptor without a body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			body: None,
			options: RequestOptions::default(),
			attached: BTreeMap::new(),
			retried: false,
		}
	}

	/// Shorthand for a `GET` descriptor.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` descriptor.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a `PUT` descriptor.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Shorthand for a `PATCH` descriptor.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Shorthand for a `DELETE` descriptor.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Sets the body.
	pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Serializes a JSON body.
	pub fn with_json<B>(self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		Ok(self.with_body(RequestBody::json(body)?))
	}

	/// Replaces the per-call options.
	pub fn with_options(mut self, options: RequestOptions) -> Self {
		self.options = options;

		self
	}

	/// Whether this descriptor has already been retried once.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	/// Sets the retry marker; returns `false` if it was already set.
	pub fn mark_retried(&mut self) -> bool {
		!std::mem::replace(&mut self.retried, true)
	}

	/// Attaches (or replaces) a pipeline-managed header.
	pub fn attach_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.attached.insert(name.into(), value.into());
	}

	/// Returns the value of a pipeline-managed header.
	pub fn attached_header(&self, name: &str) -> Option<&str> {
		self.attached
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Iterates over every header the call will carry: caller options first, then
	/// pipeline-managed headers, which win on conflicts.
	pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
		self.options
			.headers
			.iter()
			.filter(|(name, _)| self.attached_header(name).is_none())
			.chain(self.attached.iter())
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}
}
