//! The response envelope shared by every BSH endpoint.
//!
//! Every call against the platform answers with the same [`BshResponse`] shape:
//! a `data` sequence (always a sequence, even for single-entity lookups) plus
//! status metadata. Downloads answer with a [`Blob`] instead. Whether a call hands
//! its result to a callback or returns it is captured by [`Outcome`].

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// The uniform envelope wrapping every BSH API response.
///
/// # Type Parameters
///
/// * `T` - The type of the items in `data`. Defaults to [`serde_json::Value`].
///
/// # Examples
///
/// ```
/// use bsh_engine::BshResponse;
///
/// let raw = r#"{"data":[{"id":1}],"code":200,"status":"OK","error":"","timestamp":1700000000000}"#;
/// let response: BshResponse = serde_json::from_str(raw).unwrap();
///
/// assert!(response.is_ok());
/// assert_eq!(response.data.len(), 1);
/// assert_eq!(response.data[0]["id"], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct BshResponse<T = serde_json::Value> {
    /// The result items. Never absent: a missing or `null` field decodes as empty.
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,

    /// HTTP-like status code reported by the server.
    #[serde(default)]
    pub code: u16,

    /// Short human readable status label, e.g. `"OK"` or `"NOT_FOUND"`.
    #[serde(default)]
    pub status: String,

    /// Error description, empty when the call succeeded.
    #[serde(default)]
    pub error: String,

    /// Epoch milliseconds at which the server built the envelope.
    #[serde(default)]
    pub timestamp: i64,

    /// Diagnostic information about how the request was served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,

    /// The logical path that produced this envelope. Filled in when an error is raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Symbolic operation identifier, e.g. `"entities.Product.findById"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,

    /// Field-level validation failures, usually alongside a 4xx `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<Vec<Validation>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> BshResponse<T> {
    /// Creates an envelope with the given items and code, stamped with the current time.
    pub fn new(data: Vec<T>, code: u16, status: impl Into<String>) -> Self {
        Self {
            data,
            code,
            status: status.into(),
            error: String::new(),
            timestamp: now_millis(),
            meta: None,
            endpoint: None,
            api: None,
            validations: None,
        }
    }

    /// Returns `true` if `code` lies in `[200, 300)`.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Returns the first item of `data`, which is where single-entity endpoints put their result.
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    /// Consumes the envelope and returns the first item of `data`.
    pub fn into_first(self) -> Option<T> {
        self.data.into_iter().next()
    }

    /// Returns `true` if the server reported any validation failures.
    pub fn has_validations(&self) -> bool {
        self.validations.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Maps every item of `data` while keeping the status metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bsh_engine::BshResponse;
    /// let response = BshResponse::new(vec![1, 2, 3], 200, "OK");
    /// let doubled = response.map(|n| n * 2);
    /// assert_eq!(doubled.data, vec![2, 4, 6]);
    /// ```
    pub fn map<U, F>(self, f: F) -> BshResponse<U>
    where
        F: FnMut(T) -> U,
    {
        BshResponse {
            data: self.data.into_iter().map(f).collect(),
            code: self.code,
            status: self.status,
            error: self.error,
            timestamp: self.timestamp,
            meta: self.meta,
            endpoint: self.endpoint,
            api: self.api,
            validations: self.validations,
        }
    }
}

impl<T> Default for BshResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            code: 0,
            status: String::new(),
            error: String::new(),
            timestamp: 0,
            meta: None,
            endpoint: None,
            api: None,
            validations: None,
        }
    }
}

/// Returns `true` if `response` is present and its `code` lies in `[200, 300)`.
///
/// # Examples
///
/// ```
/// use bsh_engine::{is_ok, BshResponse};
///
/// let created: BshResponse = BshResponse::new(vec![], 201, "CREATED");
/// let missing: BshResponse = BshResponse::new(vec![], 404, "NOT_FOUND");
///
/// assert!(is_ok(Some(&created)));
/// assert!(!is_ok(Some(&missing)));
/// assert!(!is_ok::<serde_json::Value>(None));
/// ```
pub fn is_ok<T>(response: Option<&BshResponse<T>>) -> bool {
    response.is_some_and(BshResponse::is_ok)
}

/// Diagnostic sub-object attached to some envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Information about the query the server executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,

    /// Hints keyed by topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<BTreeMap<String, String>>,

    /// Any other diagnostic keys the server sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// The offending field.
    pub field: String,
    /// Why the field was rejected.
    pub error: String,
}

/// Binary body returned by download endpoints such as entity export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// The raw bytes of the body.
    pub bytes: Bytes,
    /// The `Content-Type` the server declared, if any.
    pub content_type: Option<String>,
}

impl Blob {
    /// Creates a blob from raw bytes.
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Size of the body in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Interprets the body as UTF-8 text, e.g. for CSV or JSON exports.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }
}

/// What a call produced: either a callback consumed the result, or it is handed back.
///
/// Exactly one of the two happens per call. When the matching callback
/// (`on_success`, `on_download` or `on_error`) was supplied it has been invoked
/// and the call yields [`Outcome::Consumed`]; otherwise the value is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// A callback received the result.
    Consumed,
    /// No callback was registered for this result; here it is.
    Value(T),
}

impl<T> Outcome<T> {
    /// Returns `true` if a callback consumed the result.
    pub fn is_consumed(&self) -> bool {
        matches!(self, Outcome::Consumed)
    }

    /// Returns the value, or `None` if a callback consumed it.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Consumed => None,
            Outcome::Value(value) => Some(value),
        }
    }

    /// Borrows the value, or `None` if a callback consumed it.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Consumed => None,
            Outcome::Value(value) => Some(value),
        }
    }

    /// Maps the returned value, leaving `Consumed` untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Consumed => Outcome::Consumed,
            Outcome::Value(value) => Outcome::Value(f(value)),
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
