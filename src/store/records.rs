//! Row shapes written to and read from the knowledge store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind tag stored on every source row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
}

/// Metadata stored with a source row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Project-relative path
    pub path: String,

    /// When the source was (re-)ingested
    pub last_modified: DateTime<Utc>,

    /// blake3 of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// One ingested file. `id` is the project-relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub content: String,
    pub metadata: SourceMetadata,
    pub organization_id: Uuid,
}

/// Metadata stored with a chunk row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Ordinal of the chunk within its source
    pub index: usize,

    /// Project-relative path of the source
    pub source: String,
}

/// One chunk of a source with its embedding. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub source_id: String,
    pub organization_id: Uuid,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// Store-assigned chunk identity: a serial or a UUID depending on the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    Serial(i64),
    Text(String),
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkId::Serial(n) => write!(f, "{}", n),
            ChunkId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A chunk returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMatch {
    pub id: ChunkId,
    #[serde(default)]
    pub source_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<ChunkMetadata>,
    pub similarity: f32,
}
