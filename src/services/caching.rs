//! Inspection and eviction of the server-side caches.

use super::{collect_params, tagged, Params};
use crate::request::Callbacks;
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// `/api/caching/*` endpoints.
#[derive(Clone)]
pub struct CachingService {
    client: BshClient,
    params: Params,
}

impl CachingService {
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

    /// `GET /api/caching/{id}`: the entries of one cache.
    pub async fn find_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged(format!("/api/caching/{}", id), "caching.findById", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `POST /api/caching/search`
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
            tagged("/api/caching/search", "caching.search", &self.params).with_json(search)?;
        self.client.post(request, callbacks).await
    }

    /// `GET /api/caching/names`: the names of every cache.
    pub async fn names<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/caching/names", "caching.names", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `DELETE /api/caching/clearById/{id}`
    pub async fn clear_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let path = format!("/api/caching/clearById/{}", id);
        let request = tagged(path, "caching.clearById", &self.params);
        self.client.delete(request, callbacks).await
    }

    /// `DELETE /api/caching/clearAll`
    pub async fn clear_all<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/caching/clearAll", "caching.clearAll", &self.params);
        self.client.delete(request, callbacks).await
    }
}
