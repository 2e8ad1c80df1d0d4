//! Ingest command implementation

use crate::chunk::{chunk_text, compute_text_hash, TextChunk};
use crate::config::{ChunkConfig, Config};
use crate::embed::Embedder;
use crate::error::Result;
use crate::progress::chunk_progress;
use crate::store::{
    ChunkMetadata, ChunkRecord, KnowledgeStore, SourceKind, SourceMetadata, SourceRecord,
};
use crate::throttle::Throttle;
use crate::walk::{source_id, SourceWalker};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Statistics from an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub files_seen: usize,
    pub files_ingested: usize,
    pub files_empty: usize,
    pub files_unreadable: usize,
    pub files_failed: usize,
    pub chunks_inserted: usize,
    pub chunks_failed: usize,
    pub missing_files: usize,
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Source upserted and chunks replaced; some chunks may have failed
    Ingested { inserted: usize, failed: usize },
    /// No chunk survived chunking, nothing written
    Empty,
    /// The file could not be read as text
    Unreadable,
    /// The source upsert or chunk cleanup failed
    Failed,
}

impl IngestStats {
    fn record(&mut self, outcome: FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Ingested { inserted, failed } => {
                self.files_ingested += 1;
                self.chunks_inserted += inserted;
                self.chunks_failed += failed;
            }
            FileOutcome::Empty => self.files_empty += 1,
            FileOutcome::Unreadable => self.files_unreadable += 1,
            FileOutcome::Failed => self.files_failed += 1,
        }
    }
}

/// Writes files into the knowledge store, one at a time
pub struct Ingestor<'a> {
    project_root: PathBuf,
    organization_id: Uuid,
    chunk: ChunkConfig,
    embedder: &'a dyn Embedder,
    store: &'a dyn KnowledgeStore,
    throttle: &'a Throttle,
}

impl<'a> Ingestor<'a> {
    pub fn new(
        project_root: &Path,
        organization_id: Uuid,
        chunk: ChunkConfig,
        embedder: &'a dyn Embedder,
        store: &'a dyn KnowledgeStore,
        throttle: &'a Throttle,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            organization_id,
            chunk,
            embedder,
            store,
            throttle,
        }
    }

    /// Read, chunk, and store one file.
    ///
    /// Failures never escape: they are logged and reported as the outcome so
    /// the caller can move on to the next file.
    pub async fn ingest_file(&self, path: &Path) -> FileOutcome {
        let id = source_id(&self.project_root, path);
        info!("Processing: {}", id);

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                error!("Error reading file {}: {}", path.display(), e);
                return FileOutcome::Unreadable;
            }
        };

        let chunks = chunk_text(&content, &self.chunk);
        if chunks.is_empty() {
            debug!("No chunks generated for: {}", id);
            return FileOutcome::Empty;
        }

        let source = self.source_record(&id, path, content);
        if let Err(e) = self.store.upsert_source(&source).await {
            error!("Error upserting source {}: {}", id, e);
            return FileOutcome::Failed;
        }

        if let Err(e) = self.store.delete_chunks(&id).await {
            error!("Error deleting old chunks for {}: {}", id, e);
            return FileOutcome::Failed;
        }

        let (inserted, failed) = self.embed_and_insert(&id, chunks).await;
        info!("Stored {} chunks for {} ({} failed)", inserted, id, failed);
        FileOutcome::Ingested { inserted, failed }
    }

    fn source_record(&self, id: &str, path: &Path, content: String) -> SourceRecord {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());

        SourceRecord {
            id: id.to_string(),
            name,
            kind: SourceKind::File,
            metadata: SourceMetadata {
                path: id.to_string(),
                last_modified: Utc::now(),
                content_hash: Some(compute_text_hash(&content)),
            },
            content,
            organization_id: self.organization_id,
        }
    }

    /// Embed and insert chunks in order, skipping any chunk whose embedding
    /// or insert fails
    async fn embed_and_insert(&self, id: &str, chunks: Vec<TextChunk>) -> (usize, usize) {
        let bar = chunk_progress(chunks.len() as u64, id);
        let mut inserted = 0;
        let mut failed = 0;

        for chunk in chunks {
            self.throttle.before_request().await;
            let embedding = self.embedder.embed(&chunk.text).await;
            self.throttle.after_request().await;
            bar.inc(1);

            let embedding = match embedding {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!("Embedding error for {} chunk {}: {}", id, chunk.index, e);
                    failed += 1;
                    continue;
                }
            };

            let record = ChunkRecord {
                source_id: id.to_string(),
                organization_id: self.organization_id,
                content: chunk.text,
                embedding,
                metadata: ChunkMetadata {
                    index: chunk.index,
                    source: id.to_string(),
                },
            };

            match self.store.insert_chunk(&record).await {
                Ok(()) => inserted += 1,
                Err(e) => {
                    warn!("Error inserting {} chunk {}: {}", id, chunk.index, e);
                    failed += 1;
                }
            }
        }

        bar.finish_and_clear();
        (inserted, failed)
    }
}

/// Walk the configured sources and ingest every file found
pub async fn cmd_ingest(
    config: &Config,
    project_root: &Path,
    embedder: &dyn Embedder,
    store: &dyn KnowledgeStore,
    throttle: &Throttle,
) -> Result<IngestStats> {
    let organization_id = config.organization_uuid()?;
    info!("Starting ingestion");
    info!("Root: {}", project_root.display());
    debug!(
        "Embedding with {} ({} dims)",
        embedder.model_name(),
        embedder.dimension()
    );

    let ingestor = Ingestor::new(
        project_root,
        organization_id,
        config.chunk.clone(),
        embedder,
        store,
        throttle,
    );

    let mut stats = IngestStats::default();
    let mut walker = SourceWalker::new(project_root, &config.scan);
    for path in walker.by_ref() {
        let outcome = ingestor.ingest_file(&path).await;
        stats.record(outcome);
    }
    stats.missing_files = walker.stats().missing_files;

    info!(
        "Ingestion complete: {} files ingested, {} chunks stored, {} chunks failed, {} files skipped",
        stats.files_ingested,
        stats.chunks_inserted,
        stats.chunks_failed,
        stats.files_empty + stats.files_unreadable + stats.files_failed
    );

    Ok(stats)
}

/// Chunk plan for one file in a dry run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSource {
    pub source_id: String,
    pub chunks: usize,
}

/// Walk and chunk without calling the provider or the store
pub async fn cmd_ingest_dry_run(
    config: &Config,
    project_root: &Path,
) -> Result<Vec<PlannedSource>> {
    info!("Dry run: nothing will be embedded or stored");

    let mut planned = Vec::new();
    for path in SourceWalker::new(project_root, &config.scan) {
        let id = source_id(project_root, &path);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let chunks = chunk_text(&content, &config.chunk).len();
                info!("{}: {} chunks", id, chunks);
                planned.push(PlannedSource {
                    source_id: id,
                    chunks,
                });
            }
            Err(e) => warn!("Error reading file {}: {}", path.display(), e),
        }
    }

    Ok(planned)
}

/// Print ingestion stats to stdout
pub fn print_ingest_stats(stats: &IngestStats) {
    println!("\n📥 Ingestion Complete\n");
    println!("Files processed: {}", stats.files_seen);
    println!("Files ingested: {}", stats.files_ingested);
    println!("Chunks stored: {}", stats.chunks_inserted);
    if stats.chunks_failed > 0 {
        println!("Chunks failed: {}", stats.chunks_failed);
    }
    if stats.files_empty > 0 {
        println!("Files without chunks: {}", stats.files_empty);
    }
    if stats.files_unreadable + stats.files_failed > 0 {
        println!(
            "Files skipped on error: {}",
            stats.files_unreadable + stats.files_failed
        );
    }
    if stats.missing_files > 0 {
        println!("Configured files not found: {}", stats.missing_files);
    }
}

/// Print a dry-run plan to stdout
pub fn print_ingest_plan(planned: &[PlannedSource]) {
    println!("\n📋 Dry run: {} files\n", planned.len());
    for source in planned {
        println!("  {} ({} chunks)", source.source_id, source.chunks);
    }
    let total: usize = planned.iter().map(|s| s.chunks).sum();
    println!("\nChunks that would be embedded: {}", total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::error::Error;
    use crate::store::{ChunkMatch, MatchQuery};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Embeds to a one-element vector; fails on calls whose 1-based number is listed
    struct StubEmbedder {
        fail_on_calls: Vec<usize>,
        calls: Mutex<usize>,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self::failing_on(&[])
        }

        fn failing_on(calls: &[usize]) -> Self {
            Self {
                fail_on_calls: calls.to_vec(),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.fail_on_calls.contains(&calls) {
                return Err(Error::Embedding("provider unavailable".to_string()));
            }
            Ok(vec![text.len() as f32])
        }

        fn dimension(&self) -> usize {
            1
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        sources: Mutex<HashMap<String, SourceRecord>>,
        chunks: Mutex<Vec<ChunkRecord>>,
        reject_source: Option<String>,
        reject_delete: bool,
        /// 1-based insert calls that fail
        reject_insert_on: Vec<usize>,
        insert_calls: Mutex<usize>,
    }

    impl MemoryStore {
        fn chunks_of(&self, source_id: &str) -> Vec<(usize, String)> {
            self.chunks
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.source_id == source_id)
                .map(|c| (c.metadata.index, c.content.clone()))
                .collect()
        }

        fn indices_of(&self, source_id: &str) -> Vec<usize> {
            self.chunks_of(source_id)
                .into_iter()
                .map(|(i, _)| i)
                .collect()
        }
    }

    #[async_trait]
    impl KnowledgeStore for MemoryStore {
        async fn upsert_source(&self, source: &SourceRecord) -> Result<()> {
            if self.reject_source.as_deref() == Some(source.id.as_str()) {
                return Err(Error::Store {
                    status: 400,
                    body: "column does not exist".to_string(),
                });
            }
            self.sources
                .lock()
                .unwrap()
                .insert(source.id.clone(), source.clone());
            Ok(())
        }

        async fn delete_chunks(&self, source_id: &str) -> Result<()> {
            if self.reject_delete {
                return Err(Error::Store {
                    status: 401,
                    body: "permission denied".to_string(),
                });
            }
            self.chunks
                .lock()
                .unwrap()
                .retain(|c| c.source_id != source_id);
            Ok(())
        }

        async fn insert_chunk(&self, chunk: &ChunkRecord) -> Result<()> {
            let mut calls = self.insert_calls.lock().unwrap();
            *calls += 1;
            if self.reject_insert_on.contains(&calls) {
                return Err(Error::Store {
                    status: 409,
                    body: "duplicate key".to_string(),
                });
            }
            self.chunks.lock().unwrap().push(chunk.clone());
            Ok(())
        }

        async fn match_chunks(&self, _query: &MatchQuery) -> Result<Vec<ChunkMatch>> {
            Ok(Vec::new())
        }
    }

    fn ingested(inserted: usize, failed: usize) -> FileOutcome {
        FileOutcome::Ingested { inserted, failed }
    }

    fn paragraph(tag: &str) -> String {
        format!("{} {}\n", tag, "lorem ipsum dolor sit amet ".repeat(3))
    }

    /// Three lines that each become their own chunk at max_chars = 100
    fn three_chunk_doc() -> String {
        format!("{}{}{}", paragraph("one"), paragraph("two"), paragraph("three"))
    }

    fn chunk_config() -> ChunkConfig {
        ChunkConfig {
            max_chars: 100,
            min_chars: 50,
        }
    }

    fn ingestor<'a>(
        root: &Path,
        embedder: &'a dyn Embedder,
        store: &'a dyn KnowledgeStore,
        throttle: &'a Throttle,
    ) -> Ingestor<'a> {
        Ingestor::new(root, Uuid::nil(), chunk_config(), embedder, store, throttle)
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_only_that_chunk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::failing_on(&[2]);
        let store = MemoryStore::default();
        let throttle = Throttle::none();

        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, ingested(2, 1));
        assert_eq!(embedder.calls(), 3);
        assert_eq!(store.indices_of("doc.md"), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_source_record_fields() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        let path = tmp.path().join("docs/guide.md");
        let content = three_chunk_doc();
        fs::write(&path, &content).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore::default();
        let throttle = Throttle::none();
        ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        let sources = store.sources.lock().unwrap();
        let source = sources.get("docs/guide.md").unwrap();
        assert_eq!(source.name, "guide.md");
        assert_eq!(source.kind, SourceKind::File);
        assert_eq!(source.content, content);
        assert_eq!(source.metadata.path, "docs/guide.md");
        let hash = compute_text_hash(&content);
        assert_eq!(source.metadata.content_hash, Some(hash));

        let chunks = store.chunks.lock().unwrap();
        assert!(chunks.iter().all(|c| c.metadata.source == "docs/guide.md"));
        assert!(chunks.iter().all(|c| c.organization_id == Uuid::nil()));
    }

    #[tokio::test]
    async fn test_reingest_unchanged_file_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore::default();
        let throttle = Throttle::none();
        let ingestor = ingestor(tmp.path(), &embedder, &store, &throttle);

        ingestor.ingest_file(&path).await;
        let first = store.chunks_of("doc.md");
        ingestor.ingest_file(&path).await;
        let second = store.chunks_of("doc.md");

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(store.sources.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reingest_shrunk_file_leaves_no_orphans() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore::default();
        let throttle = Throttle::none();
        let ingestor = ingestor(tmp.path(), &embedder, &store, &throttle);

        ingestor.ingest_file(&path).await;
        assert_eq!(store.chunks_of("doc.md").len(), 3);

        fs::write(&path, paragraph("only")).unwrap();
        ingestor.ingest_file(&path).await;

        let chunks = store.chunks_of("doc.md");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].0, 0);
        assert_eq!(chunks[0].1.trim(), paragraph("only").trim());
    }

    #[tokio::test]
    async fn test_file_without_chunks_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tiny.md");
        fs::write(&path, "short\n").unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore::default();
        let throttle = Throttle::none();
        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, FileOutcome::Empty);
        assert!(store.sources.lock().unwrap().is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore::default();
        let throttle = Throttle::none();
        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, FileOutcome::Unreadable);
        assert!(store.sources.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_failure_keeps_old_chunks_and_skips_embedding() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore {
            reject_source: Some("doc.md".to_string()),
            ..MemoryStore::default()
        };
        store.chunks.lock().unwrap().push(ChunkRecord {
            source_id: "doc.md".to_string(),
            organization_id: Uuid::nil(),
            content: "previous".to_string(),
            embedding: vec![1.0],
            metadata: ChunkMetadata {
                index: 0,
                source: "doc.md".to_string(),
            },
        });
        let throttle = Throttle::none();

        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, FileOutcome::Failed);
        assert_eq!(embedder.calls(), 0);
        assert_eq!(store.chunks_of("doc.md"), vec![(0, "previous".to_string())]);
    }

    #[tokio::test]
    async fn test_delete_failure_aborts_file_before_embedding() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore {
            reject_delete: true,
            ..MemoryStore::default()
        };
        let throttle = Throttle::none();

        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, FileOutcome::Failed);
        assert_eq!(embedder.calls(), 0);
        assert!(store.chunks_of("doc.md").is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_skips_only_that_chunk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::new();
        let store = MemoryStore {
            reject_insert_on: vec![2],
            ..MemoryStore::default()
        };
        let throttle = Throttle::none();

        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, ingested(2, 1));
        assert_eq!(embedder.calls(), 3);
        assert_eq!(store.indices_of("doc.md"), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_fixed_delay_follows_failed_embeddings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, three_chunk_doc()).unwrap();

        let embedder = StubEmbedder::failing_on(&[1, 2, 3]);
        let store = MemoryStore::default();
        let delay = Duration::from_millis(40);
        let throttle = Throttle::FixedDelay(delay);

        let start = Instant::now();
        let outcome = ingestor(tmp.path(), &embedder, &store, &throttle)
            .ingest_file(&path)
            .await;

        assert_eq!(outcome, ingested(0, 3));
        assert!(start.elapsed() >= delay * 3);
        assert!(store.chunks_of("doc.md").is_empty());
    }

    #[tokio::test]
    async fn test_cmd_ingest_continues_past_failures() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("docs/assets")).unwrap();
        fs::write(tmp.path().join("README.md"), three_chunk_doc()).unwrap();
        fs::write(tmp.path().join("docs/bad.md"), three_chunk_doc()).unwrap();
        fs::write(tmp.path().join("docs/good.md"), three_chunk_doc()).unwrap();
        fs::write(tmp.path().join("docs/blob.md"), [0xff, 0xfe]).unwrap();
        fs::write(tmp.path().join("docs/assets/logo.png"), three_chunk_doc()).unwrap();

        let config = Config {
            project_root: tmp.path().display().to_string(),
            organization_id: Uuid::nil().to_string(),
            scan: ScanConfig {
                files: vec!["README.md".to_string(), "CHANGELOG.md".to_string()],
                dirs: vec!["docs".to_string()],
                ignore: vec!["*.png".to_string()],
            },
            chunk: chunk_config(),
            ..Config::default()
        };

        let embedder = StubEmbedder::new();
        let store = MemoryStore {
            reject_source: Some("docs/bad.md".to_string()),
            ..MemoryStore::default()
        };
        let throttle = Throttle::none();

        let stats = cmd_ingest(&config, tmp.path(), &embedder, &store, &throttle)
            .await
            .unwrap();

        assert_eq!(stats.files_seen, 4);
        assert_eq!(stats.files_ingested, 2);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.files_unreadable, 1);
        assert_eq!(stats.chunks_inserted, 6);
        assert_eq!(stats.missing_files, 1);

        assert_eq!(store.chunks_of("README.md").len(), 3);
        assert_eq!(store.chunks_of("docs/good.md").len(), 3);
        assert!(store.chunks_of("docs/bad.md").is_empty());
        assert!(store.chunks_of("docs/assets/logo.png").is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_counts_chunks() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), three_chunk_doc()).unwrap();

        let config = Config {
            scan: ScanConfig {
                files: vec!["README.md".to_string()],
                dirs: Vec::new(),
                ignore: Vec::new(),
            },
            chunk: chunk_config(),
            ..Config::default()
        };

        let planned = cmd_ingest_dry_run(&config, tmp.path()).await.unwrap();
        assert_eq!(
            planned,
            vec![PlannedSource {
                source_id: "README.md".to_string(),
                chunks: 3,
            }]
        );
    }

    #[tokio::test]
    async fn test_ingest_over_http_clients() {
        use crate::config::{EmbeddingConfig, StoreConfig};
        use crate::embed::GeminiEmbedder;
        use crate::store::SupabaseStore;
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/text-embedding-004:embedContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "embedding": { "values": [0.1, 0.2, 0.3] } })),
            )
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/knowledge_sources"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/document_chunks"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/document_chunks"))
            .respond_with(ResponseTemplate::new(201))
            .expect(3)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), three_chunk_doc()).unwrap();

        let config = Config {
            scan: ScanConfig {
                files: vec!["README.md".to_string()],
                dirs: Vec::new(),
                ignore: Vec::new(),
            },
            chunk: chunk_config(),
            embedding: EmbeddingConfig {
                base_url: server.uri(),
                dimension: 3,
                ..EmbeddingConfig::default()
            },
            ..Config::default()
        };

        let embedder = GeminiEmbedder::new(&config.embedding, "gemini-key").unwrap();
        let store =
            SupabaseStore::new(&server.uri(), "service-key", &StoreConfig::default()).unwrap();
        let throttle = Throttle::none();

        let stats = cmd_ingest(&config, tmp.path(), &embedder, &store, &throttle)
            .await
            .unwrap();
        assert_eq!(stats.files_ingested, 1);
        assert_eq!(stats.chunks_inserted, 3);
    }
}
