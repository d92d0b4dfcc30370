//! LLM completion backend.
//!
//! The aggregator only needs "prompt in, text out"; [`CompletionBackend`]
//! is that seam, and [`ChatClient`] is the HTTP implementation.

pub mod client;

pub use client::{ChatClient, ChatConfig};

use crate::error::LlmError;
use async_trait::async_trait;

/// A text-completion service with a generation configuration fixed at construction.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a single prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging and report metadata.
    fn model_name(&self) -> &str;
}
