//! Product catalog retrieval and formatting.
//!
//! Fetches product records by numeric ID from a remote HTTP API, validates
//! and reshapes each into a display-ready structure, and renders the
//! collection as a single Markdown document for insertion into a
//! conversation as system context.

pub mod client;
pub mod markdown;
pub mod product;

pub use client::CatalogClient;
pub use markdown::{CATALOG_HEADING, render_markdown};
pub use product::{DisplayProduct, PLACEHOLDER_NAME, RawProduct, ValidationError, transform, validate};
