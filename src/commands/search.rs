//! Search command implementation

use crate::config::Config;
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::store::{ChunkMatch, KnowledgeStore, MatchQuery};
use serde::Serialize;
use tracing::{debug, info};

/// Search options; unset fields fall back to the `[search]` config
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    pub threshold: Option<f32>,
}

/// Search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub threshold: f32,
    pub results: Vec<ChunkMatch>,
}

/// Embed `query` and return the closest chunks of the configured organization
pub async fn cmd_search(
    config: &Config,
    embedder: &dyn Embedder,
    store: &dyn KnowledgeStore,
    query: &str,
    options: SearchOptions,
) -> Result<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::Config("Search query is empty".to_string()));
    }

    let threshold = options.threshold.unwrap_or(config.search.threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::Config(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    let count = options.limit.unwrap_or(config.search.count);

    info!("Searching: {}", query);
    let embedding = embedder.embed(query).await?;
    debug!("Query embedded to {} dims", embedding.len());

    let results = store
        .match_chunks(&MatchQuery {
            embedding,
            threshold,
            count,
            organization_id: config.organization_uuid()?,
        })
        .await?;

    Ok(SearchResult {
        query: query.to_string(),
        threshold,
        results,
    })
}

/// Print search results to stdout
pub fn print_search_results(result: &SearchResult) {
    println!("\n🔍 Query: {}\n", result.query);
    println!("Found {} results:\n", result.results.len());

    for (i, r) in result.results.iter().enumerate() {
        let source = r
            .source_id
            .as_deref()
            .or_else(|| r.metadata.as_ref().map(|m| m.source.as_str()))
            .unwrap_or("<unknown>");
        println!("{}. [similarity: {:.3}] {}", i + 1, r.similarity, source);

        let text = r.content.trim();
        let preview = match text.char_indices().nth(200) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        };
        println!("   {}\n", preview.replace('\n', " "));
    }
}
