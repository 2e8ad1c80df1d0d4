//! Default values for configuration

/// Default project root (the current directory)
pub fn default_project_root() -> String {
    ".".to_string()
}

/// Default organization that owns every ingested record
pub fn default_organization_id() -> String {
    "392ecec2-e769-4db2-810f-ccd5bd09d92a".to_string()
}

/// Default env file, relative to the project root
pub fn default_env_file() -> String {
    ".env.local".to_string()
}

/// Default explicit files to ingest
pub fn default_scan_files() -> Vec<String> {
    vec![
        "README.md".to_string(),
        "CalculaTu/package.json".to_string(),
        "portality/package.json".to_string(),
        "portality/vectorizar/FUNNEL ASESORIA.md".to_string(),
        "portality/vectorizar/Landing Asesoria.md".to_string(),
        "portality/vectorizar/Notion agencia propuesta.md".to_string(),
        "portality/vectorizar/¿Que\u{301} es A\u{301}GORA y co\u{301}mo funciona.md".to_string(),
    ]
}

/// Default directory roots to scan
pub fn default_scan_dirs() -> Vec<String> {
    [
        "CalculaTu/src",
        "CalculaTu/hooks",
        "CalculaTu/services",
        "CalculaTu/types",
        "CalculaTu/conductor",
        "portality/components",
        "portality/hooks",
        "portality/services",
        "portality/types",
        "portality/conductor",
        "portality/marketing",
        "context",
        "conductor",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default ignore rules (exact names and `*.ext` suffixes)
pub fn default_ignore_patterns() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "dist",
        ".DS_Store",
        ".env",
        "pnpm-lock.yaml",
        "yarn.lock",
        "package-lock.json",
        "*.png",
        "*.jpg",
        "*.jpeg",
        "*.gif",
        "*.svg",
        "*.ico",
        "*.woff",
        "*.woff2",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default maximum characters per chunk
pub fn default_chunk_max_chars() -> usize {
    1000
}

/// Default minimum trimmed characters for a chunk to be kept
pub fn default_chunk_min_chars() -> usize {
    50
}

/// Default embedding API base URL
pub fn default_embedding_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// Default embedding model
pub fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

/// Default embedding dimension for text-embedding-004
pub fn default_embedding_dimension() -> usize {
    768
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    30
}

/// Default table holding source records
pub fn default_sources_table() -> String {
    "knowledge_sources".to_string()
}

/// Default table holding chunk records
pub fn default_chunks_table() -> String {
    "document_chunks".to_string()
}

/// Default RPC used for similarity search
pub fn default_match_function() -> String {
    "match_documents".to_string()
}

/// Default delay after each embedding request (milliseconds)
pub fn default_throttle_delay_ms() -> u64 {
    500
}

/// Default request budget in token-bucket mode
pub fn default_requests_per_minute() -> u32 {
    120
}

/// Default minimum similarity for search results
pub fn default_match_threshold() -> f32 {
    0.5
}

/// Default number of search results
pub fn default_match_count() -> usize {
    5
}
