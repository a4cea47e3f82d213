//! Request descriptors and per-call callbacks.

use crate::response::{Blob, BshResponse};
use crate::Error;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::fmt;

/// Everything the client needs to perform one call, apart from the HTTP verb.
///
/// `path` is appended verbatim to the client's host. Query strings must already
/// be encoded into it; see [`with_query`].
#[derive(Debug, Clone, Default)]
pub struct BshRequest {
    /// The logical path, e.g. `/api/entities/Product/42`.
    pub path: String,

    /// Caller-supplied headers. Auth headers are merged on top of these.
    pub headers: HeaderMap,

    /// The request body. Ignored for GET, DELETE and downloads.
    pub body: Option<RequestBody>,

    /// Symbolic operation id, e.g. `"entities.Product.findById"`.
    pub api: Option<String>,

    /// The entity this call targets, for generic entity operations.
    pub entity: Option<String>,
}

impl BshRequest {
    /// Creates a request for the given path with no body and no headers.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Replaces the caller headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets a JSON body, serialized once here and forwarded as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be represented as JSON.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        let text =
            serde_json::to_string(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        self.body = Some(RequestBody::Json(text));
        Ok(self)
    }

    /// Sets a multipart body. No `Content-Type` is forced; the transport picks the boundary.
    pub fn with_form(mut self, form: FormData) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    /// Tags the request with a symbolic operation id.
    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        self.api = Some(api.into());
        self
    }

    /// Records which entity the request targets.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

/// The body of a write request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON text, sent with `Content-Type: application/json`.
    Json(String),
    /// Passed through to the transport untouched.
    Form(FormData),
}

/// A multipart form container for uploads.
///
/// # Examples
///
/// ```
/// use bsh_engine::FormData;
///
/// let form = FormData::new()
///     .text("description", "company logo")
///     .file("file", b"\x89PNG".to_vec(), "logo.png", Some("image/png"));
///
/// assert_eq!(form.parts().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormPart)>,
}

/// One field of a [`FormData`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// A plain text field.
    Text(String),
    /// A file field.
    File {
        /// File contents.
        bytes: Bytes,
        /// File name reported to the server.
        filename: String,
        /// MIME type of the file, if known.
        content_type: Option<String>,
    },
}

impl FormData {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    /// Appends a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: Option<&str>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                bytes: bytes.into(),
                filename: filename.into(),
                content_type: content_type.map(str::to_string),
            },
        ));
        self
    }

    /// The fields in insertion order.
    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    /// Consumes the form and returns its fields.
    pub fn into_parts(self) -> Vec<(String, FormPart)> {
        self.parts
    }
}

/// Appends URL-encoded query parameters to `path`.
///
/// # Examples
///
/// ```
/// use bsh_engine::with_query;
///
/// let params = [("format", "csv"), ("filename", "q1 report")];
/// let path = with_query("/api/entities/Product/export", params);
/// assert_eq!(path, "/api/entities/Product/export?format=csv&filename=q1+report");
///
/// let untouched = with_query("/api/settings", std::iter::empty::<(&str, &str)>());
/// assert_eq!(untouched, "/api/settings");
/// ```
pub fn with_query<I, K, V>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        serializer.append_pair(key.as_ref(), value.as_ref());
        any = true;
    }
    if !any {
        return path.to_string();
    }
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, separator, serializer.finish())
}

type SuccessCallback<T> = Box<dyn FnOnce(BshResponse<T>) + Send>;
type ErrorCallback = Box<dyn FnOnce(Error) + Send>;
type DownloadCallback = Box<dyn FnOnce(Blob) + Send>;

/// Optional callbacks that consume a call's result instead of returning it.
///
/// When the callback matching the outcome is registered, the call invokes it
/// exactly once and resolves to [`Outcome::Consumed`](crate::Outcome::Consumed).
/// Otherwise the value is returned, or the error is propagated as `Err`.
///
/// # Examples
///
/// ```
/// use bsh_engine::Callbacks;
///
/// let callbacks: Callbacks = Callbacks::none()
///     .on_success(|response| println!("got {} items", response.data.len()))
///     .on_error(|err| eprintln!("failed: {}", err));
///
/// assert!(callbacks.has_on_success());
/// assert!(!callbacks.has_on_download());
/// ```
pub struct Callbacks<T = serde_json::Value> {
    pub(crate) on_success: Option<SuccessCallback<T>>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) on_download: Option<DownloadCallback>,
}

impl<T> Callbacks<T> {
    /// No callbacks: the call returns its value or its error.
    pub fn none() -> Self {
        Self {
            on_success: None,
            on_error: None,
            on_download: None,
        }
    }

    /// Registers the callback receiving a successful envelope.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(BshResponse<T>) + Send + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Registers the callback receiving an HTTP-level failure.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Error) + Send + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Registers the callback receiving a downloaded blob.
    pub fn on_download<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Blob) + Send + 'static,
    {
        self.on_download = Some(Box::new(f));
        self
    }

    /// Returns `true` if an `on_success` callback is registered.
    pub fn has_on_success(&self) -> bool {
        self.on_success.is_some()
    }

    /// Returns `true` if an `on_error` callback is registered.
    pub fn has_on_error(&self) -> bool {
        self.on_error.is_some()
    }

    /// Returns `true` if an `on_download` callback is registered.
    pub fn has_on_download(&self) -> bool {
        self.on_download.is_some()
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.has_on_success())
            .field("on_error", &self.has_on_error())
            .field("on_download", &self.has_on_download())
            .finish()
    }
}
