//! Error types for BSH API calls.
//!
//! HTTP-level failures (a non-2xx status) become an [`ApiError`] carrying the
//! status, the logical endpoint and the parsed envelope when one was available.
//! Transport-level failures are passed through untouched so callers can tell
//! "the server said no" apart from "the request never completed".

use crate::response::{BshResponse, Validation};
use http::StatusCode;
use std::fmt;

/// The main error type for BSH API calls.
///
/// # Examples
///
/// ```no_run
/// use bsh_engine::{BshClient, BshRequest, Callbacks, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = BshClient::builder().host("https://api.example.com").build()?;
///
/// match client.get::<serde_json::Value>(BshRequest::new("/api/status"), Callbacks::none()).await {
///     Ok(outcome) => println!("Success: {:?}", outcome.into_value()),
///     Err(Error::Api(err)) => {
///         eprintln!("HTTP error {} at {}", err.status, err.endpoint);
///         if let Some(envelope) = &err.response {
///             eprintln!("Server said: {}", envelope.error);
///         }
///     }
///     Err(e) => eprintln!("Request never completed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The default transport failed at the network layer (connection refused,
    /// DNS lookup failed, timeout, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A custom transport failed before producing a response.
    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// A successful response body could not be decoded as an envelope.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid configuration, such as a malformed header name or value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Wraps an arbitrary error raised by a custom transport.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(err.into())
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Returns the logical path that failed, for HTTP-level failures.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Error::Api(err) => Some(&err.endpoint),
            _ => None,
        }
    }

    /// Returns the envelope the server sent along with a failure, if it parsed.
    pub fn response(&self) -> Option<&BshResponse> {
        match self {
            Error::Api(err) => err.response.as_ref(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Api(err) => Some(&err.raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the field-level validation failures reported by the server.
    pub fn validations(&self) -> &[Validation] {
        self.response()
            .and_then(|r| r.validations.as_deref())
            .unwrap_or_default()
    }

    /// Returns `true` for a 401 answer, the signal a calling layer uses to refresh its token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// A non-2xx answer from the BSH platform.
///
/// The display message is the JSON form of the envelope the server sent. When
/// the failure body was not a valid envelope, `response` is `None` and the
/// body is still available in `raw_response`.
///
/// # Examples
///
/// ```
/// use bsh_engine::{ApiError, BshResponse};
/// use http::StatusCode;
///
/// let envelope: BshResponse = BshResponse::new(vec![], 404, "NOT_FOUND");
/// let err = ApiError::new(StatusCode::NOT_FOUND, "/api/users/42", Some(envelope), String::new());
///
/// // The envelope is stamped with the failing endpoint.
/// assert_eq!(err.response.as_ref().unwrap().endpoint.as_deref(), Some("/api/users/42"));
/// assert!(err.to_string().contains("\"code\":404"));
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The logical path that failed (without the host).
    pub endpoint: String,
    /// The parsed failure envelope, when the body was a valid one.
    pub response: Option<BshResponse>,
    /// The raw failure body.
    pub raw_response: String,
}

impl ApiError {
    /// Creates an error, stamping `response.endpoint` with `endpoint`.
    pub fn new(
        status: StatusCode,
        endpoint: impl Into<String>,
        response: Option<BshResponse>,
        raw_response: String,
    ) -> Self {
        let endpoint = endpoint.into();
        let response = response.map(|mut envelope| {
            envelope.endpoint = Some(endpoint.clone());
            envelope
        });
        Self {
            status,
            endpoint,
            response,
            raw_response,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .response
            .as_ref()
            .and_then(|r| serde_json::to_string(r).ok())
        {
            Some(json) => f.write_str(&json),
            None => write!(f, "HTTP error {} at {}", self.status, self.endpoint),
        }
    }
}

impl std::error::Error for ApiError {}

/// A specialized `Result` type for BSH API calls.
pub type Result<T> = std::result::Result<T, Error>;
