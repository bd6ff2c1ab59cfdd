//! Product schema validation and transformation.
//!
//! The remote API returns untyped JSON records. [`validate`] turns one into
//! a [`RawProduct`] or an enumerated [`ValidationError`]; [`transform`]
//! reshapes a validated record into the [`DisplayProduct`] consumed by
//! rendering. Both are pure and synchronous.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Name used when a description carries no colon-delimited suffix.
pub const PLACEHOLDER_NAME: &str = "Unknown Product";

/// Why a raw product record was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The record body is not a JSON object
    #[error("product record is not a JSON object")]
    NotAnObject,

    /// A required string field is missing or has the wrong type
    #[error("missing or non-string field: {0}")]
    MissingField(&'static str),

    /// image_url does not parse as an absolute http(s) URL
    #[error("image_url is not a valid URL: {0}")]
    InvalidImageUrl(String),
}

/// A product record as received from the remote API, after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub content: String,
    pub description: String,
    pub image_url: String,
}

/// Display-ready product derived from a [`RawProduct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayProduct {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Validate an untyped API record against the product schema.
///
/// `content` and `description` must be string fields and `image_url` must
/// be an absolute http(s) URL. A rejected record is dropped by the caller;
/// it never aborts the surrounding batch.
pub fn validate(raw: &Value) -> Result<RawProduct, ValidationError> {
    let record = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let field = |name: &'static str| -> Result<&str, ValidationError> {
        record
            .get(name)
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField(name))
    };

    let content = field("content")?;
    let description = field("description")?;
    let image_url = field("image_url")?;

    let parsed = Url::parse(image_url).map_err(|_| ValidationError::InvalidImageUrl(image_url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidImageUrl(image_url.to_string()));
    }

    Ok(RawProduct {
        content: content.to_string(),
        description: description.to_string(),
        image_url: image_url.to_string(),
    })
}

/// Reshape a validated product for display.
///
/// The name is the trimmed substring after the FIRST colon of the
/// description; descriptions with several colons keep everything after the
/// first one. No colon (or nothing after it) yields [`PLACEHOLDER_NAME`].
pub fn transform(raw: RawProduct) -> DisplayProduct {
    let name = match raw.description.split_once(':') {
        Some((_, suffix)) => {
            let trimmed = suffix.trim();
            if trimmed.is_empty() {
                PLACEHOLDER_NAME.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => PLACEHOLDER_NAME.to_string(),
    };

    DisplayProduct {
        name,
        description: format!("{} - {}", raw.content, raw.description),
        image: raw.image_url,
    }
}
