//! The request client every domain service goes through.
//!
//! [`BshClient`] performs exactly one HTTP operation per call: it signs the
//! request, hands it to the configured [`Transport`], and turns the raw answer
//! into a [`BshResponse`], a [`Blob`], an [`Outcome::Consumed`] marker when a
//! callback took the result, or an [`Error`].
//!
//! Use [`BshClientBuilder`] to configure and create clients.

use crate::{
    auth::{sign_headers, AuthProvider, RefreshTokenProvider},
    error::ApiError,
    interceptor::{RequestInterceptor, ResponseInterceptor},
    request::{BshRequest, Callbacks, RequestBody},
    response::{Blob, BshResponse, Outcome},
    transport::{ReqwestTransport, Transport, TransportBody, TransportRequest, TransportResponse},
    Error, Result,
};
use http::{HeaderValue, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

/// A client for the BSH platform that normalizes every answer into an envelope.
///
/// The client is cheap to clone and safe to share across tasks. Its configuration
/// is read-only once built; concurrent calls never interact.
///
/// Every verb method follows the same contract:
///
/// - On a 2xx answer, the envelope is handed to `on_success` (yielding
///   [`Outcome::Consumed`]) or returned as [`Outcome::Value`].
/// - On any other status, an [`Error::Api`] is handed to `on_error` (yielding
///   [`Outcome::Consumed`]) or returned as `Err`.
/// - If the transport itself fails, its error is returned as-is and no callback runs.
///
/// # Examples
///
/// ```no_run
/// use bsh_engine::{BshClient, BshRequest, Callbacks, Credential};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct NewProduct {
///     name: String,
/// }
///
/// #[derive(Deserialize)]
/// struct Product {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), bsh_engine::Error> {
/// let client = BshClient::builder()
///     .host("https://api.example.com")
///     .auth(|| async { Some(Credential::jwt("token")) })
///     .build()?;
///
/// let created = client
///     .post::<Product>(
///         BshRequest::new("/api/entities/Product")
///             .with_json(&NewProduct { name: "Lamp".to_string() })?,
///         Callbacks::none(),
///     )
///     .await?;
///
/// if let Some(product) = created.into_value().and_then(|r| r.into_first()) {
///     println!("Created product {} ({})", product.id, product.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BshClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    host: String,
    transport: Arc<dyn Transport>,
    auth: Option<Arc<dyn AuthProvider>>,
    refresh_token_provider: Option<Arc<dyn RefreshTokenProvider>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl BshClient {
    /// Creates a new `BshClientBuilder` for configuring a client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bsh_engine::BshClient;
    ///
    /// # fn example() -> Result<(), bsh_engine::Error> {
    /// let client = BshClient::builder()
    ///     .host("https://api.example.com")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> BshClientBuilder {
        BshClientBuilder::new()
    }

    /// The host prepended to every request path.
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// Asks the refresh-token provider for the current refresh token.
    ///
    /// The client never uses this itself. It is here for a calling layer that
    /// reacts to [`Error::is_unauthorized`].
    pub async fn refresh_token(&self) -> Option<String> {
        match &self.inner.refresh_token_provider {
            Some(provider) => provider.refresh_token().await,
            None => None,
        }
    }

    /// Performs a GET request. Any body on `request` is ignored.
    pub async fn get<T>(
        &self,
        request: BshRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        self.call(Method::GET, request, callbacks).await
    }

    /// Performs a POST request.
    pub async fn post<T>(
        &self,
        request: BshRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        self.call(Method::POST, request, callbacks).await
    }

    /// Performs a PUT request.
    pub async fn put<T>(
        &self,
        request: BshRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        self.call(Method::PUT, request, callbacks).await
    }

    /// Performs a PATCH request.
    pub async fn patch<T>(
        &self,
        request: BshRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        self.call(Method::PATCH, request, callbacks).await
    }

    /// Performs a DELETE request. Any body on `request` is ignored.
    pub async fn delete<T>(
        &self,
        request: BshRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        self.call(Method::DELETE, request, callbacks).await
    }

    /// Performs a GET request whose successful body is binary.
    ///
    /// The blob goes to `on_download` when registered; failures follow the same
    /// path as every other verb.
    pub async fn download(
        &self,
        request: BshRequest,
        callbacks: Callbacks,
    ) -> Result<Outcome<Blob>> {
        let endpoint = request.path.clone();
        let api = request.api.clone();
        let response = self.dispatch(Method::GET, request).await?;
        parse_blob_outcome(response, &endpoint, api, callbacks)
    }

    async fn call<T>(
        &self,
        method: Method,
        request: BshRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let endpoint = request.path.clone();
        let api = request.api.clone();
        let response = self.dispatch(method, request).await?;
        parse_json_outcome(response, &endpoint, api, callbacks)
    }

    /// Signs, encodes and sends a single request.
    async fn dispatch(&self, method: Method, request: BshRequest) -> Result<TransportResponse> {
        let url = format!("{}{}", self.inner.host, request.path);
        let mut headers = request.headers;

        let sends_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
        let body = match request.body {
            Some(RequestBody::Json(text)) if sends_body => {
                if !headers.contains_key(http::header::CONTENT_TYPE) {
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                }
                TransportBody::Text(text)
            }
            Some(RequestBody::Form(form)) if sends_body => TransportBody::Form(form),
            _ => TransportBody::Empty,
        };

        let headers = sign_headers(self.inner.auth.as_deref(), headers).await?;

        let mut transport_request = TransportRequest {
            method,
            url,
            headers,
            body,
        };
        for interceptor in &self.inner.request_interceptors {
            interceptor.intercept(&mut transport_request)?;
        }

        tracing::debug!(
            method = %transport_request.method,
            url = %transport_request.url,
            api = request.api.as_deref().unwrap_or_default(),
            "Executing BSH request"
        );

        let start_time = Instant::now();
        let mut response = self.inner.transport.send(transport_request).await?;

        for interceptor in &self.inner.response_interceptors {
            interceptor.intercept(&mut response)?;
        }

        tracing::debug!(
            status = response.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            path = %request.path,
            "Received BSH response"
        );

        Ok(response)
    }
}

/// Normalizes a JSON answer: the envelope goes to `on_success` or the caller,
/// a failure to the shared error path.
fn parse_json_outcome<T>(
    response: TransportResponse,
    endpoint: &str,
    api: Option<String>,
    callbacks: Callbacks<T>,
) -> Result<Outcome<BshResponse<T>>>
where
    T: DeserializeOwned,
{
    if !response.status.is_success() {
        return failure(response, endpoint, api, callbacks);
    }

    let mut envelope = if response.body.is_empty() {
        // 204-style answers carry no envelope at all.
        BshResponse::new(Vec::new(), response.status.as_u16(), "")
    } else {
        serde_json::from_slice::<BshResponse<T>>(&response.body).map_err(|e| {
            let raw_response = String::from_utf8_lossy(&response.body).into_owned();
            tracing::error!(
                error = %e,
                raw_response = %raw_response,
                endpoint = endpoint,
                "Failed to deserialize BSH envelope"
            );
            Error::DeserializationFailed {
                raw_response,
                serde_error: e.to_string(),
                status: response.status,
            }
        })?
    };
    if envelope.api.is_none() {
        envelope.api = api;
    }

    match callbacks.on_success {
        Some(on_success) => {
            on_success(envelope);
            Ok(Outcome::Consumed)
        }
        None => Ok(Outcome::Value(envelope)),
    }
}

/// Normalizes a binary answer: the blob goes to `on_download` or the caller,
/// a failure to the shared error path.
fn parse_blob_outcome(
    response: TransportResponse,
    endpoint: &str,
    api: Option<String>,
    callbacks: Callbacks,
) -> Result<Outcome<Blob>> {
    if !response.status.is_success() {
        return failure(response, endpoint, api, callbacks);
    }

    let blob = Blob::new(
        response.body.clone(),
        response.content_type().map(str::to_string),
    );

    match callbacks.on_download {
        Some(on_download) => {
            on_download(blob);
            Ok(Outcome::Consumed)
        }
        None => Ok(Outcome::Value(blob)),
    }
}

/// Builds the [`ApiError`] for a non-2xx answer and routes it to `on_error` or the caller.
///
/// A body that is not a valid envelope leaves `response` empty; the raw text is kept.
fn failure<T, V>(
    response: TransportResponse,
    endpoint: &str,
    api: Option<String>,
    callbacks: Callbacks<T>,
) -> Result<Outcome<V>> {
    let status = response.status;
    let raw_response = String::from_utf8_lossy(&response.body).into_owned();
    let envelope = serde_json::from_slice::<BshResponse>(&response.body)
        .ok()
        .map(|mut envelope| {
            if envelope.api.is_none() {
                envelope.api = api;
            }
            envelope
        });

    if status.is_client_error() {
        tracing::warn!(
            status = status.as_u16(),
            endpoint = endpoint,
            parsed = envelope.is_some(),
            "Client error (4xx)"
        );
    } else {
        tracing::warn!(
            status = status.as_u16(),
            endpoint = endpoint,
            parsed = envelope.is_some(),
            "Server error"
        );
    }

    let error = Error::Api(ApiError::new(status, endpoint, envelope, raw_response));
    match callbacks.on_error {
        Some(on_error) => {
            on_error(error);
            Ok(Outcome::Consumed)
        }
        None => Err(error),
    }
}

/// Builder for configuring and creating a [`BshClient`].
///
/// # Examples
///
/// ```no_run
/// use bsh_engine::{BshClientBuilder, Credential, ReqwestTransport};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), bsh_engine::Error> {
/// let client = BshClientBuilder::new()
///     .host("https://api.example.com")
///     .transport(ReqwestTransport::builder().timeout(Duration::from_secs(30)).build()?)
///     .auth(Credential::api_key("my-key"))
///     .refresh_token_provider(|| async { Some("refresh-token".to_string()) })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct BshClientBuilder {
    host: String,
    transport: Option<Arc<dyn Transport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    refresh_token_provider: Option<Arc<dyn RefreshTokenProvider>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl BshClientBuilder {
    /// Creates a new `BshClientBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host prepended verbatim to every path. Defaults to empty, meaning
    /// paths must be absolute URLs.
    ///
    /// With the default transport a non-empty host must be an absolute URL. A
    /// custom [`Transport`] receives whatever prefix is configured, e.g. `/bsh`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the transport. Defaults to [`ReqwestTransport`].
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Some(Arc::new(transport)))
    }

    /// Sets the provider asked for a credential before every request.
    pub fn auth(self, provider: impl AuthProvider + 'static) -> Self {
        self.shared_auth(Some(Arc::new(provider)))
    }

    /// Sets the provider of refresh tokens exposed by [`BshClient::refresh_token`].
    pub fn refresh_token_provider(self, provider: impl RefreshTokenProvider + 'static) -> Self {
        self.shared_refresh_token_provider(Some(Arc::new(provider)))
    }

    /// Adds a request interceptor. Interceptors run in registration order.
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Adds a response interceptor. Interceptors run in registration order.
    pub fn response_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.response_interceptors.push(Arc::new(interceptor));
        self
    }

    pub(crate) fn shared_transport(mut self, transport: Option<Arc<dyn Transport>>) -> Self {
        self.transport = transport;
        self
    }

    pub(crate) fn shared_auth(mut self, auth: Option<Arc<dyn AuthProvider>>) -> Self {
        self.auth = auth;
        self
    }

    pub(crate) fn shared_refresh_token_provider(
        mut self,
        provider: Option<Arc<dyn RefreshTokenProvider>>,
    ) -> Self {
        self.refresh_token_provider = provider;
        self
    }

    pub(crate) fn shared_interceptors(
        mut self,
        request: Vec<Arc<dyn RequestInterceptor>>,
        response: Vec<Arc<dyn ResponseInterceptor>>,
    ) -> Self {
        self.request_interceptors = request;
        self.response_interceptors = response;
        self
    }

    /// Builds the configured `BshClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default transport is used with a non-empty host
    /// that is not an absolute URL, or if that transport cannot be built.
    pub fn build(self) -> Result<BshClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                if !self.host.is_empty() {
                    url::Url::parse(&self.host)?;
                }
                Arc::new(ReqwestTransport::new()?)
            }
        };

        Ok(BshClient {
            inner: Arc::new(ClientInner {
                host: self.host,
                transport,
                auth: self.auth,
                refresh_token_provider: self.refresh_token_provider,
                request_interceptors: self.request_interceptors,
                response_interceptors: self.response_interceptors,
            }),
        })
    }
}
