//! Embedding generation
//!
//! This module provides an abstraction over embedding providers with:
//! - A trait the ingestion pipeline is written against
//! - An HTTP backend for the Gemini `embedContent` API

mod gemini;

pub use gemini::*;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}
