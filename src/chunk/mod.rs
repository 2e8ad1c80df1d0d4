//! Line-aligned text chunking
//!
//! Documents are split into chunks that:
//! - Never break a line in two
//! - Stay under `max_chars` unless a single line is itself longer
//! - Are deterministic for a given text and configuration

use crate::config::ChunkConfig;
use blake3::Hasher;

/// A text chunk ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Chunk text, including the trailing newline of each line
    pub text: String,

    /// Position among the kept chunks of the document (0-based)
    pub index: usize,
}

/// Split `text` into line-aligned chunks without dropping small ones.
///
/// A line is appended whole. The buffer is flushed before a line only when
/// it is non-empty and the line would push it past `max_chars`. A line
/// longer than `max_chars` is never cut, so its chunk exceeds the bound.
pub fn split_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if current_len > 0 && current_len + line_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current.push('\n');
        current_len += line_len + 1;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Chunk a document, dropping chunks whose trimmed length is at or below
/// `min_chars`
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<TextChunk> {
    split_lines(text, config.max_chars)
        .into_iter()
        .filter(|c| c.trim().chars().count() > config.min_chars)
        .enumerate()
        .map(|(index, text)| TextChunk { text, index })
        .collect()
}

/// Compute a stable hash for document content
pub fn compute_text_hash(text: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(text.as_bytes());
    hasher.finalize().to_hex().to_string()
}
