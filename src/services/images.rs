use super::{collect_params, tagged, Params};
use crate::request::{Callbacks, FormData};
use crate::response::{BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::de::DeserializeOwned;

/// Image uploads.
#[derive(Clone)]
pub struct ImageService {
    client: BshClient,
    params: Params,
}

impl ImageService {
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

    /// `POST /api/images/upload` as multipart. The transport sets the boundary.
    pub async fn upload<T>(
        &self,
        form: FormData,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = tagged("/api/images/upload", "images.upload", &self.params).with_form(form);
        self.client.post(request, callbacks).await
    }
}
