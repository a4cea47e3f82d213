use super::{collect_params, tagged, Params};
use crate::request::Callbacks;
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::de::DeserializeOwned;

/// Liveness and version information. Neither endpoint needs a credential.
#[derive(Clone)]
pub struct StatusService {
    client: BshClient,
    params: Params,
}

impl StatusService {
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

    /// `GET /api/status`
    pub async fn status<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/status", "status.status", &self.params);
        self.client.get(request, callbacks).await
    }

    /// `GET /api/status/health`
    pub async fn health<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/status/health", "status.health", &self.params);
        self.client.get(request, callbacks).await
    }
}
