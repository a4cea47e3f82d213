//! The engine facade: one configuration, every domain service.
//!
//! [`BshEngine`] owns the host, auth and transport configuration and builds the
//! [`BshClient`] lazily on first use. Services are created on demand and share
//! that client; nothing here is process-global, so two engines never interfere.

use crate::auth::{AuthProvider, RefreshTokenProvider};
use crate::client::{BshClient, BshClientBuilder};
use crate::interceptor::{RequestInterceptor, ResponseInterceptor};
use crate::services::{
    ApiKeyService, AuthService, CachingService, EntityService, ImageService, MailingService,
    PluginService, SettingsService, StatusService, UserService,
};
use crate::transport::Transport;
use crate::Result;
use std::sync::{Arc, OnceLock};

/// Entry point composing configuration and the domain services.
///
/// Reconfiguration (`with_host`, `with_auth`, `with_transport`) takes `&mut self`
/// and drops the cached client, so it cannot interleave with calls borrowing the
/// engine. Services already handed out keep the client they were built with.
///
/// # Examples
///
/// ```no_run
/// use bsh_engine::{BshEngine, Callbacks, Credential};
///
/// # async fn example() -> Result<(), bsh_engine::Error> {
/// let engine = BshEngine::builder()
///     .host("https://api.example.com")
///     .auth(|| async { Some(Credential::api_key("my-key")) })
///     .build();
///
/// let health = engine.status()?.health::<serde_json::Value>(Callbacks::none()).await?;
/// println!("healthy: {}", health.value().is_some_and(|r| r.is_ok()));
///
/// let product = engine
///     .entities("Product")?
///     .find_by_id::<serde_json::Value>(42, Callbacks::none())
///     .await?;
/// println!("{:?}", product.into_value().and_then(|r| r.into_first()));
/// # Ok(())
/// # }
/// ```
pub struct BshEngine {
    config: EngineConfig,
    client: OnceLock<BshClient>,
}

#[derive(Clone, Default)]
struct EngineConfig {
    host: String,
    transport: Option<Arc<dyn Transport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    refresh_token_provider: Option<Arc<dyn RefreshTokenProvider>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl EngineConfig {
    fn client_builder(&self) -> BshClientBuilder {
        BshClient::builder()
            .host(self.host.as_str())
            .shared_transport(self.transport.clone())
            .shared_auth(self.auth.clone())
            .shared_refresh_token_provider(self.refresh_token_provider.clone())
            .shared_interceptors(
                self.request_interceptors.clone(),
                self.response_interceptors.clone(),
            )
    }
}

impl BshEngine {
    /// Creates a new `BshEngineBuilder`.
    pub fn builder() -> BshEngineBuilder {
        BshEngineBuilder::default()
    }

    /// The configured host.
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Replaces the host.
    pub fn with_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.config.host = host.into();
        self.invalidate();
        self
    }

    /// Replaces the auth provider.
    pub fn with_auth(&mut self, provider: impl AuthProvider + 'static) -> &mut Self {
        self.config.auth = Some(Arc::new(provider));
        self.invalidate();
        self
    }

    /// Removes the auth provider; subsequent requests are unsigned.
    pub fn without_auth(&mut self) -> &mut Self {
        self.config.auth = None;
        self.invalidate();
        self
    }

    /// Replaces the transport.
    pub fn with_transport(&mut self, transport: impl Transport + 'static) -> &mut Self {
        self.config.transport = Some(Arc::new(transport));
        self.invalidate();
        self
    }

    fn invalidate(&mut self) {
        self.client = OnceLock::new();
        tracing::debug!(host = %self.config.host, "BSH engine reconfigured");
    }

    /// The request client, built on first use and cached until reconfiguration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid URL or the default transport
    /// cannot be built.
    pub fn client(&self) -> Result<BshClient> {
        if let Some(client) = self.client.get() {
            return Ok(client.clone());
        }
        let client = self.config.client_builder().build()?;
        Ok(self.client.get_or_init(|| client).clone())
    }

    /// The generic CRUD service for `entity`.
    pub fn entities(&self, entity: impl Into<String>) -> Result<EntityService> {
        Ok(EntityService::new(self.client()?, entity))
    }

    /// Login, registration and account recovery.
    pub fn auth(&self) -> Result<AuthService> {
        Ok(AuthService::new(self.client()?))
    }

    /// The current user and user administration.
    pub fn users(&self) -> Result<UserService> {
        Ok(UserService::new(self.client()?))
    }

    /// Platform settings.
    pub fn settings(&self) -> Result<SettingsService> {
        Ok(SettingsService::new(self.client()?))
    }

    /// Image uploads.
    pub fn images(&self) -> Result<ImageService> {
        Ok(ImageService::new(self.client()?))
    }

    /// Transactional mail.
    pub fn mailing(&self) -> Result<MailingService> {
        Ok(MailingService::new(self.client()?))
    }

    /// Server-side cache inspection.
    pub fn caching(&self) -> Result<CachingService> {
        Ok(CachingService::new(self.client()?))
    }

    /// API key management.
    pub fn api_keys(&self) -> Result<ApiKeyService> {
        Ok(ApiKeyService::new(self.client()?))
    }

    /// Plugin installation.
    pub fn plugins(&self) -> Result<PluginService> {
        Ok(PluginService::new(self.client()?))
    }

    /// Liveness and version information.
    pub fn status(&self) -> Result<StatusService> {
        Ok(StatusService::new(self.client()?))
    }
}

/// Builder for configuring and creating a [`BshEngine`].
#[derive(Default)]
pub struct BshEngineBuilder {
    config: EngineConfig,
}

impl BshEngineBuilder {
    /// Sets the host prepended to every path.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the provider asked for a credential before every request.
    pub fn auth(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.config.auth = Some(Arc::new(provider));
        self
    }

    /// Sets the refresh-token provider exposed by [`BshClient::refresh_token`].
    pub fn refresh_token_provider(mut self, provider: impl RefreshTokenProvider + 'static) -> Self {
        self.config.refresh_token_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the transport. Defaults to [`ReqwestTransport`](crate::ReqwestTransport).
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.config.transport = Some(Arc::new(transport));
        self
    }

    /// Adds a request interceptor.
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.config.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Adds a response interceptor.
    pub fn response_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.config.response_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Builds the engine. The client itself is built on first use.
    pub fn build(self) -> BshEngine {
        BshEngine {
            config: self.config,
            client: OnceLock::new(),
        }
    }
}
