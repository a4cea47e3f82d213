//! Platform-wide settings.

use super::{collect_params, tagged, Params};
use crate::request::Callbacks;
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Serialize};

/// `GET`/`PUT /api/settings`.
#[derive(Clone)]
pub struct SettingsService {
    client: BshClient,
    params: Params,
}

impl SettingsService {
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

    /// `GET /api/settings`
    pub async fn get<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/settings", "settings.get", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `PUT /api/settings`
    pub async fn update<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/settings", "settings.update", &self.params).with_json(payload)?;
        self.client.put(request, callbacks).await
    }
}
