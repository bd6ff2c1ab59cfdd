//! Catalog API client.
//!
//! One shared reqwest client with an explicit per-request timeout. Fetches
//! fan out concurrently and are reassembled in input-identifier order, so
//! the rendered document is deterministic regardless of completion order.

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;

use crate::catalog::markdown::render_markdown;
use crate::catalog::product::{transform, validate};
use crate::config::CatalogConfig;
use crate::error::{PipelinrError, Result};

/// HTTP client for the product catalog API.
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new catalog client from config.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PipelinrError::Catalog(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    /// Product IDs used when the caller supplies none.
    pub fn default_product_ids(&self) -> &[u32] {
        &self.config.product_ids
    }

    /// Fetch a single product by ID.
    ///
    /// GETs `{base_url}{id}` with the configured bearer credential when
    /// present. Returns the JSON body on a 2xx response; any HTTP error
    /// status or transport failure is logged and yields `None` so the
    /// remaining identifiers keep going.
    pub async fn fetch_product(&self, base_url: &str, id: u32) -> Option<Value> {
        let url = format!("{}{}", base_url, id);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error retrieving product ID {}: {}", id, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::error!("Failed to retrieve product ID {}: HTTP {}", id, status);
            return None;
        }

        match response.json::<Value>().await {
            Ok(data) => {
                log::info!("Successfully retrieved product ID {}", id);
                Some(data)
            }
            Err(e) => {
                log::error!("Failed to parse product ID {}: {}", id, e);
                None
            }
        }
    }

    /// Fetch all IDs concurrently over the shared connection pool.
    ///
    /// join_all indexes results by input position, so output order is input
    /// order no matter which request finishes first.
    pub async fn fetch_products(&self, base_url: &str, ids: &[u32]) -> Vec<Option<Value>> {
        join_all(ids.iter().map(|&id| self.fetch_product(base_url, id))).await
    }

    /// Fetch, validate, transform, and render the catalog as Markdown.
    ///
    /// Returns `None` without touching the network when the base URL is
    /// unset, and `None` when no identifier survives fetching and
    /// validation. Per-item failures are logged and dropped; nothing in
    /// this path propagates an error to the caller.
    pub async fn retrieve(&self, ids: &[u32]) -> Option<String> {
        let Some(base_url) = self.config.base_url.clone() else {
            log::warn!("Catalog base URL not set, skipping retrieval");
            return None;
        };

        let raw = self.fetch_products(&base_url, ids).await;

        let mut display = Vec::new();
        for (slot, id) in raw.iter().zip(ids) {
            let Some(value) = slot else { continue };
            match validate(value) {
                Ok(product) => display.push(transform(product)),
                Err(e) => log::error!("Validation error for product ID {}: {}", id, e),
            }
        }

        render_markdown(&display)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_ms", &self.config.timeout_ms)
            .finish()
    }
}
