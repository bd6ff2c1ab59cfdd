//! Space listings retrieval.
//!
//! The spaces API returns a JSON array of rows, each row itself an array of
//! columns. Only the first row is surfaced, formatted as a single
//! human-readable line.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::config::FilterConfig;
use crate::error::{PipelinrError, Result};

// Column layout of a space row
const COL_ID: usize = 0;
const COL_LOCATION: usize = 2;
const COL_PRICE: usize = 3;
const COL_TYPE: usize = 6;

/// HTTP client for the space listings API.
pub struct SpaceClient {
    client: Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl SpaceClient {
    /// Create a new space client from the filter config.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PipelinrError::Catalog(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.space_api_url.clone(),
            api_key: config.space_api_key.clone(),
        })
    }

    /// Retrieve and format the first available space listing.
    ///
    /// `None` when the URL is unset, the request fails, or the payload is
    /// empty or malformed; failures are logged, never propagated.
    pub async fn retrieve_space_data(&self) -> Option<String> {
        let Some(api_url) = &self.api_url else {
            log::warn!("Space API URL not set, skipping retrieval");
            return None;
        };

        log::info!("Calling space API at: {}", api_url);

        let mut request = self.client.get(api_url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key)]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error occurred while calling the space API: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::error!("Failed to retrieve space data. Status code: {}", status);
            return None;
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                log::error!("Failed to parse space data: {}", e);
                return None;
            }
        };

        format_space_info(&data)
    }
}

/// Format the first row of a list-of-lists spaces payload.
fn format_space_info(data: &Value) -> Option<String> {
    let rows = data.as_array()?;
    let first = rows.first()?.as_array()?;

    if first.len() <= COL_TYPE {
        log::warn!("Malformed space record: expected at least {} columns, got {}", COL_TYPE + 1, first.len());
        return None;
    }

    Some(format!(
        "ID: {}, Location: {}, Price: ${} per month, Type: {}",
        display_cell(&first[COL_ID]),
        display_cell(&first[COL_LOCATION]),
        display_cell(&first[COL_PRICE]),
        display_cell(&first[COL_TYPE]),
    ))
}

// Strings render without quotes; everything else uses JSON display
fn display_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_first_row() {
        let data = json!([
            [7, "2024-01-01", "Downtown", 1200, "available", "x", "office"],
            [8, "2024-01-02", "Uptown", 900, "available", "x", "studio"]
        ]);

        let info = format_space_info(&data).unwrap();
        assert_eq!(info, "ID: 7, Location: Downtown, Price: $1200 per month, Type: office");
    }

    #[test]
    fn test_format_empty_payload_is_none() {
        assert_eq!(format_space_info(&json!([])), None);
        assert_eq!(format_space_info(&json!({"not": "a list"})), None);
    }

    #[test]
    fn test_format_short_row_is_none() {
        let data = json!([[1, "a", "b"]]);
        assert_eq!(format_space_info(&data), None);
    }

    #[tokio::test]
    async fn test_retrieve_without_url_is_none() {
        let client = SpaceClient::new(&FilterConfig::default()).unwrap();
        assert_eq!(client.retrieve_space_data().await, None);
    }
}
