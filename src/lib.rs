//! Pipelinr - chat-completion middleware pipelines
//!
//! A pipeline intercepts a chat request, fetches data from a third-party
//! REST API (product catalog or space listings), formats it as Markdown,
//! injects it into the conversation context, and forwards the result to a
//! language-model completion call.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod spaces;
pub mod tools;

pub use error::{PipelinrError, Result};
