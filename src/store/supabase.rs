use super::{ChunkMatch, ChunkRecord, KnowledgeStore, MatchQuery, SourceRecord};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

const PREFER_MERGE: &str = "resolution=merge-duplicates,return=minimal";
const PREFER_MINIMAL: &str = "return=minimal";

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
    filter_organization_id: Uuid,
}

/// Knowledge store backed by a Supabase project's REST API
pub struct SupabaseStore {
    client: Client,
    rest_url: Url,
    sources_table: String,
    chunks_table: String,
    match_function: String,
}

impl SupabaseStore {
    /// Build a store client for the project at `url` using `key` for both
    /// the `apikey` header and bearer auth
    pub fn new(url: &str, key: &str, config: &StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(key.trim())
            .map_err(|e| Error::Config(format!("Invalid store key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", key.trim()))
            .map_err(|e| Error::Config(format!("Invalid store key: {}", e)))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        let rest_url = Url::parse(&format!("{}/rest/v1/", url.trim_end_matches('/')))?;
        debug!("Knowledge store at {}", rest_url);

        Ok(Self {
            client,
            rest_url,
            sources_table: config.sources_table.clone(),
            chunks_table: config.chunks_table.clone(),
            match_function: config.match_function.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.rest_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid store URL: {}", e)))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        Err(Error::Store {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl KnowledgeStore for SupabaseStore {
    async fn upsert_source(&self, source: &SourceRecord) -> Result<()> {
        let mut url = self.endpoint(&self.sources_table)?;
        url.query_pairs_mut().append_pair("on_conflict", "id");

        debug!("Upserting source {}", source.id);
        let response = self
            .client
            .post(url)
            .header("Prefer", PREFER_MERGE)
            .json(source)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_chunks(&self, source_id: &str) -> Result<()> {
        let mut url = self.endpoint(&self.chunks_table)?;
        url.query_pairs_mut()
            .append_pair("source_id", &format!("eq.{}", source_id));

        debug!("Deleting chunks of {}", source_id);
        let response = self.client.delete(url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn insert_chunk(&self, chunk: &ChunkRecord) -> Result<()> {
        let url = self.endpoint(&self.chunks_table)?;
        let response = self
            .client
            .post(url)
            .header("Prefer", PREFER_MINIMAL)
            .json(chunk)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn match_chunks(&self, query: &MatchQuery) -> Result<Vec<ChunkMatch>> {
        let url = self.endpoint(&format!("rpc/{}", self.match_function))?;
        let request = MatchRequest {
            query_embedding: &query.embedding,
            match_threshold: query.threshold,
            match_count: query.count,
            filter_organization_id: query.organization_id,
        };

        let response = self.client.post(url).json(&request).send().await?;
        let matches = Self::check(response).await?.json::<Vec<ChunkMatch>>().await?;
        debug!("Found {} matching chunks", matches.len());
        Ok(matches)
    }
}
