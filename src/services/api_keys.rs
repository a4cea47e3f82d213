use super::{collect_params, tagged, Params};
use crate::request::Callbacks;
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Management of API keys: CRUD, revocation and search under `/api/api-keys`.
#[derive(Clone)]
pub struct ApiKeyService {
    client: BshClient,
    params: Params,
}

impl ApiKeyService {
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

    /// `POST /api/api-keys`. The secret is only returned by this call.
    pub async fn create<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/api-keys", "apiKeys.create", &self.params).with_json(payload)?;
        self.client.post(request, callbacks).await
    }

    /// `GET /api/api-keys/{id}`
    pub async fn find_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged(format!("/api/api-keys/{}", id), "apiKeys.findById", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `PUT /api/api-keys`
    pub async fn update<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/api-keys", "apiKeys.update", &self.params).with_json(payload)?;
        self.client.put(request, callbacks).await
    }

    /// `DELETE /api/api-keys/{id}`
    pub async fn delete_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged(format!("/api/api-keys/{}", id), "apiKeys.deleteById", &self.params);
        self.client.delete(request, callbacks).await
    }

    /// `POST /api/api-keys/{id}/revoke`
    pub async fn revoke<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let path = format!("/api/api-keys/{}/revoke", id);
        let request = tagged(path, "apiKeys.revoke", &self.params);
        self.client.post(request, callbacks).await
    }

    /// `POST /api/api-keys/search`
    pub async fn search<T, S>(
        &self,
        search: &S,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let request =
            tagged("/api/api-keys/search", "apiKeys.search", &self.params).with_json(search)?;
        self.client.post(request, callbacks).await
    }
}
