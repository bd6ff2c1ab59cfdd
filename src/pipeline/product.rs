//! Product catalog pipeline.
//!
//! Retrieves the catalog, renders it as Markdown, injects it as system
//! context ahead of the caller's conversation, and forwards the whole thing
//! to the completion collaborator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::CatalogClient;
use crate::chat::{Message, RequestBody};
use crate::config::PipelinrConfig;
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::pipeline::Pipeline;

/// Instructional preamble placed ahead of the catalog data.
pub const ASSISTANT_PREAMBLE: &str =
    "You are an assistant helping customers discover and purchase luxury products from prestigious brands.";

/// Context substituted when no catalog data could be retrieved. The turn
/// still proceeds to the completion call with this in place of the catalog.
pub const UNAVAILABLE_NOTICE: &str = "Product information could not be retrieved at this time.";

/// Pipeline that enriches conversations with product catalog context.
pub struct ProductPipeline {
    name: String,
    config: PipelinrConfig,
    catalog: CatalogClient,
    llm: Arc<dyn LlmClient>,
}

impl ProductPipeline {
    /// Create the pipeline with an injected completion client.
    pub fn new(config: PipelinrConfig, llm: Arc<dyn LlmClient>) -> Result<Self> {
        let catalog = CatalogClient::new(config.catalog.clone())?;

        Ok(Self {
            name: "Product Tools Pipeline".to_string(),
            config,
            catalog,
            llm,
        })
    }

    /// Build the system context around the catalog Markdown (or the
    /// unavailable notice).
    fn build_context(markdown: &str) -> String {
        format!(
            "{ASSISTANT_PREAMBLE}\n\n\
             Use the following product data to assist the user:\n\n\
             {markdown}\n\n\
             Remember to follow the instructions and provide responses in a conversational manner."
        )
    }

    fn resolve_model(&self, model_id: &str) -> String {
        if !self.config.llm.model.is_empty() {
            self.config.llm.model.clone()
        } else {
            model_id.to_string()
        }
    }
}

#[async_trait]
impl Pipeline for ProductPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    async fn pipe(
        &self,
        user_message: &str,
        model_id: &str,
        messages: Vec<Message>,
        _body: &RequestBody,
    ) -> Result<String> {
        log::info!("Pipe function called - Processing Request");
        log::debug!("user_message: {}", user_message);
        log::debug!("model_id: {}", model_id);

        let markdown = self.catalog.retrieve(&self.config.catalog.product_ids).await;
        let context = match markdown.as_deref() {
            Some(md) => Self::build_context(md),
            None => {
                log::warn!("No catalog data retrieved, substituting fallback context");
                Self::build_context(UNAVAILABLE_NOTICE)
            }
        };

        let request = CompletionRequest::new(context)
            .with_messages(messages)
            .with_model(self.resolve_model(model_id))
            .with_max_tokens(self.config.llm.max_tokens)
            .with_temperature(self.config.llm.temperature);

        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}
