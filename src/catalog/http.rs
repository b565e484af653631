//! HTTP-backed workspace catalog against the builder's internal API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::AppError;

use super::{ScreenMeta, TableMeta, WorkspaceCatalog};

/// Convert any displayable error into `AppError::Catalog`.
fn catalog_err(e: impl std::fmt::Display) -> AppError {
    AppError::Catalog(e.to_string())
}

/// Client for the builder's metadata endpoints.
pub struct HttpCatalog {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCatalog {
    /// Create a catalog client for the given base URL (no trailing slash).
    ///
    /// The underlying `reqwest::Client` carries a 10-second timeout; the
    /// builder API answers from its own store, so anything slower is down.
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Build a GET request, bearer-authenticated when a key is configured.
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let req = self.http.get(format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Send a request, check the status code, and deserialize the JSON response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        req.send()
            .await
            .map_err(catalog_err)?
            .error_for_status()
            .map_err(catalog_err)?
            .json()
            .await
            .map_err(catalog_err)
    }
}

#[async_trait]
impl WorkspaceCatalog for HttpCatalog {
    /// `GET /api/apps/{appId}/tables`
    async fn tables(&self, app_id: &str) -> Result<Vec<TableMeta>, AppError> {
        self.send_json(self.get(&format!("/api/apps/{}/tables", app_id)))
            .await
    }

    /// `GET /api/apps/{appId}/screens`
    async fn screens(&self, app_id: &str) -> Result<Vec<ScreenMeta>, AppError> {
        self.send_json(self.get(&format!("/api/apps/{}/screens", app_id)))
            .await
    }
}
