use super::{collect_params, tagged, Params};
use crate::request::{Callbacks, FormData};
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Plugin installation.
#[derive(Clone)]
pub struct PluginService {
    client: BshClient,
    params: Params,
}

impl PluginService {
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

    /// `POST /api/plugins/install/zip`: uploads a packaged plugin as multipart.
    pub async fn install_zip<T>(
        &self,
        form: FormData,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request =
            tagged("/api/plugins/install/zip", "plugins.installZip", &self.params).with_form(form);
        self.client.post(request, callbacks).await
    }

    /// `POST /api/plugins/install/core`: installs a plugin shipped with the platform.
    pub async fn install_core<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = tagged("/api/plugins/install/core", "plugins.installCore", &self.params)
            .with_json(payload)?;
        self.client.post(request, callbacks).await
    }
}
