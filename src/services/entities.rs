//! The generic entity CRUD service.

use super::{collect_params, tagged, Params};
use crate::request::{with_query, BshRequest, Callbacks};
use crate::response::{Blob, BshResponse, Outcome};
use crate::{BshClient, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// File formats offered by the entity export endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma separated values.
    Csv,
    /// A JSON array.
    Json,
    /// An Excel workbook.
    Excel,
}

impl ExportFormat {
    /// The value of the `format` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD, search, count and export operations for one named entity.
///
/// All paths live under `/api/entities/{entity}`. Every operation tags its
/// request as `entities.{entity}.{operation}`.
///
/// # Examples
///
/// ```no_run
/// use bsh_engine::{BshClient, BshSearch, Callbacks, EntityService, FilterOperator};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Product {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), bsh_engine::Error> {
/// let client = BshClient::builder().host("https://api.example.com").build()?;
/// let products = EntityService::new(client, "Product");
///
/// let search = BshSearch::new()
///     .filter("name", FilterOperator::Like, "lamp")
///     .page(0, 20);
/// let found = products.search::<Product, _>(&search, Callbacks::none()).await?;
/// for product in found.into_value().map(|r| r.data).unwrap_or_default() {
///     println!("{}: {}", product.id, product.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EntityService {
    client: BshClient,
    entity: String,
    params: Params,
}

impl EntityService {
    /// Creates a service for `entity` backed by `client`.
    pub fn new(client: BshClient, entity: impl Into<String>) -> Self {
        Self {
            client,
            entity: entity.into(),
            params: Params::new(),
        }
    }

    /// Returns a copy of the service that appends `params` to every path,
    /// e.g. `offset` and `size` for paging.
    pub fn with_params<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            client: self.client.clone(),
            entity: self.entity.clone(),
            params: collect_params(params),
        }
    }

    /// The entity name this service targets.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    fn request(&self, suffix: &str, operation: &str) -> BshRequest {
        tagged(
            format!("/api/entities/{}{}", self.entity, suffix),
            format!("entities.{}.{}", self.entity, operation),
            &self.params,
        )
        .with_entity(self.entity.as_str())
    }

    /// `GET /api/entities/{entity}/{id}`
    pub async fn find_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = self.request(&format!("/{}", id), "findById");
        self.client.get(request, callbacks).await
    }

    /// `POST /api/entities/{entity}`
    pub async fn create<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request("", "create").with_json(payload)?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/entities/{entity}/batch`
    pub async fn create_batch<T, B>(
        &self,
        payloads: &[B],
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = self.request("/batch", "createBatch").with_json(payloads)?;
        self.client.post(request, callbacks).await
    }

    /// `PUT /api/entities/{entity}`
    pub async fn update<T, B>(
        &self,
        payload: &B,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request("", "update").with_json(payload)?;
        self.client.put(request, callbacks).await
    }

    /// `PUT /api/entities/{entity}/batch`
    pub async fn update_batch<T, B>(
        &self,
        payloads: &[B],
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = self.request("/batch", "updateBatch").with_json(payloads)?;
        self.client.put(request, callbacks).await
    }

    /// `POST /api/entities/{entity}/search`
    pub async fn search<T, S>(
        &self,
        search: &S,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let request = self.request("/search", "search").with_json(search)?;
        self.client.post(request, callbacks).await
    }

    /// `POST /api/entities/{entity}/delete`: deletes every row matching `search`.
    pub async fn delete<T, S>(
        &self,
        search: &S,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let request = self.request("/delete", "delete").with_json(search)?;
        self.client.post(request, callbacks).await
    }

    /// `DELETE /api/entities/{entity}/{id}`
    pub async fn delete_by_id<T>(
        &self,
        id: impl fmt::Display,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = self.request(&format!("/{}", id), "deleteById");
        self.client.delete(request, callbacks).await
    }

    /// `GET /api/entities/{entity}/columns`
    pub async fn columns<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = self.request("/columns", "columns");
        self.client.get(request, callbacks).await
    }

    /// `GET /api/entities/{entity}/count`: counts every row.
    pub async fn count<T>(&self, callbacks: Callbacks<T>) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
    {
        let request = self.request("/count", "count");
        self.client.get(request, callbacks).await
    }

    /// `POST /api/entities/{entity}/count`: counts rows matching `search`.
    pub async fn count_matching<T, S>(
        &self,
        search: &S,
        callbacks: Callbacks<T>,
    ) -> Result<Outcome<BshResponse<T>>>
    where
        T: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let request = self.request("/count", "countFiltered").with_json(search)?;
        self.client.post(request, callbacks).await
    }

    /// `GET /api/entities/{entity}/export?format=..&filename=..`, downloaded as a [`Blob`].
    pub async fn export(
        &self,
        format: ExportFormat,
        filename: Option<&str>,
        callbacks: Callbacks,
    ) -> Result<Outcome<Blob>> {
        let mut params = vec![("format", format.as_str())];
        if let Some(filename) = filename {
            params.push(("filename", filename));
        }
        let mut request = self.request("/export", "export");
        request.path = with_query(&request.path, params);
        self.client.download(request, callbacks).await
    }
}
