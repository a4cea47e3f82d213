//! The current user, user administration and profile management.

use super::{collect_params, tagged, Params};
use crate::request::{Callbacks, FormData};
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// Body of `PUT /api/users/password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The password in use today.
    pub current_password: String,
    /// The replacement.
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}

/// `/api/users/*` endpoints.
#[derive(Clone)]
pub struct UserService {
    client: BshClient,
    params: Params,
}

impl UserService {
    /// Creates the service.
    pub fn new(client: BshClient) -> Self {
        Self {
            client,
            params: Params::new(),
        }
    }

    /// Returns a copy of the service that appends `params` to every path.
    ///
    /// ```no_run
    /// # async fn example(users: bsh_engine::UserService) -> Result<(), bsh_engine::Error> {
    /// use bsh_engine::{BshSearch, Callbacks};
    ///
    /// let second_page = users
    ///     .with_params([("offset", "20"), ("size", "20")])
    ///     .search::<serde_json::Value, _>(&BshSearch::new(), Callbacks::none())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
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

    /// `GET /api/users/me`: the user the current credential belongs to.
    pub async fn me<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/users/me", "users.me", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `POST /api/users/init`: creates the first administrator of a fresh installation.
    pub async fn init<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/users/init", "users.init", &self.params).with_json(payload)?;
        self.client.post(request, callbacks).await
    }

    /// `PUT /api/users/profile`
    pub async fn update_profile<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/users/profile", "users.updateProfile", &self.params)
            .with_json(payload)?;
        self.client.put(request, callbacks).await
    }

    /// `POST /api/users/picture` as multipart.
    pub async fn update_picture<T>(
        &self,
        form: FormData,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request =
            tagged("/api/users/picture", "users.updatePicture", &self.params).with_form(form);
        self.client.post(request, callbacks).await
    }

    /// `PUT /api/users/password`
    pub async fn change_password<T>(
        &self,
        payload: &ChangePasswordRequest,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/users/password", "users.changePassword", &self.params)
            .with_json(payload)?;
        self.client.put(request, callbacks).await
    }

    /// `POST /api/users/search`
    pub async fn search<T, S>(
        &self,
        search: &S,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let request = tagged("/api/users/search", "users.search", &self.params).with_json(search)?;
        self.client.post(request, callbacks).await
    }

    /// `GET /api/users/{id}`
    pub async fn find_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged(format!("/api/users/{}", id), "users.findById", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `PUT /api/users/{id}`
    pub async fn update<T, B>(
        &self,
        id: impl fmt::Display,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged(format!("/api/users/{}", id), "users.update", &self.params)
            .with_json(payload)?;
        self.client.put(request, callbacks).await
    }

    /// `DELETE /api/users/{id}`
    pub async fn delete_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged(format!("/api/users/{}", id), "users.deleteById", &self.params);
        self.client.delete(request, callbacks).await
    }
}
