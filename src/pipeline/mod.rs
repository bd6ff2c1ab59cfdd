//! Pipeline plugin surface.
//!
//! Two plugin shapes, matching the hosting framework's protocol:
//! - [`Pipeline`]: owns the whole turn; receives the conversation and
//!   returns the assistant reply.
//! - [`FilterPipeline`]: rewrites the request body on its way to the model.

pub mod product;
pub mod space_filter;

pub use product::ProductPipeline;
pub use space_filter::SpaceDataFilter;

use async_trait::async_trait;

use crate::chat::{Message, RequestBody, UserInfo};
use crate::error::Result;

/// A pipeline that handles a chat turn end to end.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Display name of the pipeline
    fn name(&self) -> &str;

    /// Called when the hosting server starts
    async fn on_startup(&self) -> Result<()> {
        log::info!("Pipeline startup: {}", self.name());
        Ok(())
    }

    /// Called when the hosting server stops
    async fn on_shutdown(&self) -> Result<()> {
        log::info!("Pipeline shutdown: {}", self.name());
        Ok(())
    }

    /// Process one request and produce the assistant reply.
    async fn pipe(&self, user_message: &str, model_id: &str, messages: Vec<Message>, body: &RequestBody)
    -> Result<String>;
}

/// A filter that rewrites the request body before the completion call.
#[async_trait]
pub trait FilterPipeline: Send + Sync {
    /// Display name of the filter
    fn name(&self) -> &str;

    /// Inspect and rewrite the inbound request body.
    async fn inlet(&self, body: RequestBody, user: Option<&UserInfo>) -> Result<RequestBody>;
}
