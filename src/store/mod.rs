//! Knowledge store integration
//!
//! This module defines the store contract the pipeline writes through and
//! a PostgREST (Supabase) implementation of it:
//! - Source upsert keyed by project-relative path
//! - Bulk chunk delete by source
//! - Chunk insert
//! - Similarity search over chunk embeddings

mod records;
mod supabase;

pub use records::*;
pub use supabase::*;

use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Parameters for a similarity search
#[derive(Debug, Clone)]
pub struct MatchQuery {
    pub embedding: Vec<f32>,
    pub threshold: f32,
    pub count: usize,
    pub organization_id: Uuid,
}

/// Contract between the ingestion pipeline and the knowledge store
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Insert the source, replacing any row with the same id
    async fn upsert_source(&self, source: &SourceRecord) -> Result<()>;

    /// Delete every chunk belonging to `source_id`
    async fn delete_chunks(&self, source_id: &str) -> Result<()>;

    /// Insert one chunk
    async fn insert_chunk(&self, chunk: &ChunkRecord) -> Result<()>;

    /// Chunks most similar to the query embedding
    async fn match_chunks(&self, query: &MatchQuery) -> Result<Vec<ChunkMatch>>;
}
