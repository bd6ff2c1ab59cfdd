//! LLM completion layer.
//!
//! This module provides:
//! - Completion request/response types
//! - LlmClient trait for API abstraction
//! - OpenAiClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod openai;

pub use client::{CompletionRequest, CompletionResponse, LlmClient, MockLlmClient, Usage};
pub use openai::{OpenAiClient, OpenAiConfig};
