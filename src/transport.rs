//! The pluggable layer that actually puts requests on the wire.
//!
//! [`BshClient`](crate::BshClient) never talks to the network itself. It hands a
//! fully prepared [`TransportRequest`] to a [`Transport`] and normalizes whatever
//! [`TransportResponse`] comes back. [`ReqwestTransport`] is the default; tests
//! and embedders can swap in any closure with the right shape.

use crate::request::{FormData, FormPart};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::future::Future;
use std::time::Duration;

/// A request ready to be sent.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: Method,
    /// The fully-qualified URL (`host + path`).
    pub url: String,
    /// Caller headers with auth headers merged on top.
    pub headers: HeaderMap,
    /// The encoded body.
    pub body: TransportBody,
}

/// The encoded body of a [`TransportRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransportBody {
    /// No body is sent.
    Empty,
    /// JSON text.
    Text(String),
    /// A multipart form, encoded by the transport.
    Form(FormData),
}

impl TransportBody {
    /// Returns the body text, if this is a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TransportBody::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A raw response as produced by the transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Bytes,
}

impl TransportResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a response whose body is the JSON form of `value`.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }

    /// Returns the `Content-Type` header, if present and valid.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)?
            .to_str()
            .ok()
    }
}

/// Sends one request and returns the raw response.
///
/// Errors returned here are network-level failures. They reach the caller of
/// the client unchanged; only HTTP status codes are interpreted by the client.
///
/// Implemented for any `Fn(TransportRequest) -> impl Future<Output = Result<TransportResponse>>`.
///
/// # Examples
///
/// ```
/// use bsh_engine::{BshClient, TransportRequest, TransportResponse};
/// use http::StatusCode;
///
/// # fn example() -> Result<(), bsh_engine::Error> {
/// let client = BshClient::builder()
///     .host("https://api.example.com")
///     .transport(|request: TransportRequest| async move {
///         println!("{} {}", request.method, request.url);
///         let body = r#"{"data":[],"code":200}"#;
///         Ok::<_, bsh_engine::Error>(TransportResponse::new(StatusCode::OK, body))
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

#[async_trait]
impl<F, Fut> Transport for F
where
    F: Fn(TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse>> + Send,
{
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        (self)(request).await
    }
}

/// The default transport, backed by a pooled `reqwest::Client`.
///
/// # Examples
///
/// ```no_run
/// use bsh_engine::ReqwestTransport;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), bsh_engine::Error> {
/// let transport = ReqwestTransport::builder()
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a new `ReqwestTransportBuilder`.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.http_client.request(request.method, &request.url);

        // A request header replaces the default of the same name; repeated values are kept.
        let mut headers = self.default_headers.clone();
        headers.extend(request.headers);
        builder = builder.headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            TransportBody::Empty => builder,
            TransportBody::Text(text) => builder.body(text),
            TransportBody::Form(form) => builder.multipart(multipart_form(form)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn multipart_form(form: FormData) -> Result<reqwest::multipart::Form> {
    let mut multipart = reqwest::multipart::Form::new();
    for (name, part) in form.into_parts() {
        multipart = match part {
            FormPart::Text(value) => multipart.text(name, value),
            FormPart::File {
                bytes,
                filename,
                content_type,
            } => {
                let mut file = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename);
                if let Some(mime) = content_type {
                    file = file.mime_str(&mime).map_err(|e| {
                        Error::ConfigurationError(format!("Invalid content type {:?}: {}", mime, e))
                    })?;
                }
                multipart.part(name, file)
            }
        };
    }
    Ok(multipart)
}

/// Builder for configuring and creating a [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ReqwestTransportBuilder {
    /// Creates a new `ReqwestTransportBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header sent with every request. Request headers take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the per-request timeout. Without one, requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `ReqwestTransport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn build(self) -> Result<ReqwestTransport> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(ReqwestTransport {
            http_client,
            default_headers: self.default_headers,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response_sets_content_type() {
        let response = TransportResponse::json(StatusCode::OK, &json!({"data": []}));
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.body, Bytes::from_static(b"{\"data\":[]}"));
    }

    #[test]
    fn test_builder_rejects_invalid_default_header() {
        let result = ReqwestTransport::builder().default_header("x-ok", "bad\nvalue");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_multipart_form_accepts_text_and_file_parts() {
        let form = FormData::new()
            .text("alt", "logo")
            .file("file", vec![1u8, 2, 3], "logo.png", Some("image/png"));
        assert!(multipart_form(form).is_ok());
    }

    #[test]
    fn test_multipart_form_rejects_invalid_mime() {
        let form = FormData::new().file("file", vec![1u8], "x.bin", Some("not a mime"));
        match multipart_form(form) {
            Err(Error::ConfigurationError(message)) => assert!(message.contains("not a mime")),
            other => panic!("Expected ConfigurationError, got {:?}", other.map(|_| ())),
        }
    }
}
