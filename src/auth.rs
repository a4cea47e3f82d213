//! Credentials and the providers that supply them.
//!
//! The client asks its [`AuthProvider`] for a [`Credential`] before every request
//! and never caches the answer, so rotating tokens need no coordination.

use crate::Error;
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "x-bsh-apikey";

/// The kind of credential presented to the platform.
///
/// `APIKEY` is the canonical wire tag; `API_KEY` is accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    /// A JSON Web Token, sent as `Authorization: Bearer <token>`.
    #[serde(rename = "JWT")]
    Jwt,
    /// An API key, sent as `X-BSH-APIKEY: <token>`.
    #[serde(rename = "APIKEY", alias = "API_KEY")]
    ApiKey,
}

/// A credential used to sign one request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// What kind of token this is.
    #[serde(rename = "type")]
    pub auth_type: AuthType,
    /// The token itself.
    pub token: String,
}

impl Credential {
    /// A JWT credential.
    pub fn jwt(token: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::Jwt,
            token: token.into(),
        }
    }

    /// An API key credential.
    pub fn api_key(token: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::ApiKey,
            token: token.into(),
        }
    }

    /// The header this credential is sent under, and its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue), Error> {
        let (name, value) = match self.auth_type {
            AuthType::Jwt => (http::header::AUTHORIZATION, format!("Bearer {}", self.token)),
            AuthType::ApiKey => (HeaderName::from_static(API_KEY_HEADER), self.token.clone()),
        };
        let mut value = HeaderValue::try_from(value)
            .map_err(|e| Error::ConfigurationError(format!("Invalid credential token: {}", e)))?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("auth_type", &self.auth_type)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Supplies the credential for the next request, or `None` to send it unsigned.
///
/// Implemented for any `Fn() -> impl Future<Output = Option<Credential>>`, and
/// for a fixed [`Credential`].
///
/// # Examples
///
/// ```
/// use bsh_engine::{AuthProvider, Credential};
///
/// # async fn example() {
/// let provider = || async { Some(Credential::jwt("token")) };
/// assert_eq!(provider.credential().await, Some(Credential::jwt("token")));
/// # }
/// ```
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the credential to sign the next request with.
    async fn credential(&self) -> Option<Credential>;
}

#[async_trait]
impl<F, Fut> AuthProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<Credential>> + Send,
{
    async fn credential(&self) -> Option<Credential> {
        (self)().await
    }
}

#[async_trait]
impl AuthProvider for Credential {
    async fn credential(&self) -> Option<Credential> {
        Some(self.clone())
    }
}

/// Supplies the refresh token a calling layer exchanges after a 401.
///
/// The client only stores it; it never refreshes on its own.
#[async_trait]
pub trait RefreshTokenProvider: Send + Sync {
    /// Returns the current refresh token, if any.
    async fn refresh_token(&self) -> Option<String>;
}

#[async_trait]
impl<F, Fut> RefreshTokenProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send,
{
    async fn refresh_token(&self) -> Option<String> {
        (self)().await
    }
}

/// Merges the provider's current credential on top of `headers`.
///
/// Without a provider, or when it yields `None`, `headers` is returned untouched.
/// On a key collision the auth header wins.
pub(crate) async fn sign_headers(
    provider: Option<&dyn AuthProvider>,
    mut headers: HeaderMap,
) -> Result<HeaderMap, Error> {
    let Some(provider) = provider else {
        return Ok(headers);
    };
    if let Some(credential) = provider.credential().await {
        let (name, value) = credential.header()?;
        headers.insert(name, value);
    }
    Ok(headers)
}
