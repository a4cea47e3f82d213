//! Login, registration and account recovery.

use super::{collect_params, tagged, Params};
use crate::request::Callbacks;
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

/// Credentials for `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The token pair issued by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived JWT to send as `Authorization: Bearer`.
    pub access: String,
    /// Long-lived token exchanged at `/api/auth/refresh`.
    pub refresh: String,
}

/// `/api/auth/*` endpoints. All of them are POST.
#[derive(Clone)]
pub struct AuthService {
    client: BshClient,
    params: Params,
}

impl AuthService {
    /// Creates the service.
    pub fn new(client: BshClient) -> Self {
        Self {
            client,
            params: Params::new(),
        }
    }

    /// Returns a copy of the service that appends `params` to every path.
    pub fn with_params<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            client: self.client.clone(),
            params: collect_params(params),
        }
    }

    /// `POST /api/auth/login`
    pub async fn login(
        &self,
        credentials: &LoginRequest,
        callbacks: Callbacks<AuthTokens>,
    ) -> Result<Outcome<BshResponse<AuthTokens>>> {
        let request =
            tagged("/api/auth/login", "auth.login", &self.params).with_json(credentials)?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/auth/register`
    pub async fn register<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request =
            tagged("/api/auth/register", "auth.register", &self.params).with_json(payload)?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/auth/refresh`: exchanges a refresh token for a new pair.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        callbacks: Callbacks<AuthTokens>,
    ) -> Result<Outcome<BshResponse<AuthTokens>>> {
        let request = tagged("/api/auth/refresh", "auth.refresh", &self.params)
            .with_json(&json!({ "refresh": refresh_token }))?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/auth/forget-password`: mails a reset code to `email`.
    pub async fn forget_password<T>(
        &self,
        email: &str,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/auth/forget-password", "auth.forgetPassword", &self.params)
            .with_json(&json!({ "email": email }))?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/auth/reset-password`
    pub async fn reset_password<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/auth/reset-password", "auth.resetPassword", &self.params)
            .with_json(payload)?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/auth/activate-account`
    pub async fn activate_account<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/auth/activate-account", "auth.activateAccount", &self.params)
            .with_json(payload)?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/auth/resend-activation-email`
    pub async fn resend_activation_email<T>(
        &self,
        email: &str,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let path = "/api/auth/resend-activation-email";
        let request = tagged(path, "auth.resendActivationEmail", &self.params)
            .with_json(&json!({ "email": email }))?;
        self.client.post(request, callbacks).await
    }
}
