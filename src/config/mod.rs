//! Configuration management for aureon-ingest
//!
//! Handles loading, saving, and validating the TOML configuration, plus
//! resolving credentials from the project's env file.

mod defaults;
mod env_file;

pub use defaults::*;
pub use env_file::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root that source identities are made relative to
    #[serde(default = "default_project_root")]
    pub project_root: String,

    /// Organization that owns every written record
    #[serde(default = "default_organization_id")]
    pub organization_id: String,

    /// Env file with credentials, relative to the project root
    #[serde(default = "default_env_file")]
    pub env_file: String,

    /// What to ingest
    #[serde(default)]
    pub scan: ScanConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Knowledge store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Embedding request pacing
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Similarity search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Path the config was loaded from (internal)
    #[serde(skip)]
    pub config_file: PathBuf,
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Explicit files, relative to the project root
    #[serde(default = "default_scan_files")]
    pub files: Vec<String>,

    /// Directory roots to walk recursively, relative to the project root
    #[serde(default = "default_scan_dirs")]
    pub dirs: Vec<String>,

    /// Entry names to skip: exact names or `*.ext`
    #[serde(default = "default_ignore_patterns")]
    pub ignore: Vec<String>,
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Soft maximum characters per chunk
    #[serde(default = "default_chunk_max_chars")]
    pub max_chars: usize,

    /// Chunks at or below this trimmed length are dropped
    #[serde(default = "default_chunk_min_chars")]
    pub min_chars: usize,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector length
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Knowledge store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_sources_table")]
    pub sources_table: String,

    #[serde(default = "default_chunks_table")]
    pub chunks_table: String,

    /// RPC function used for similarity search
    #[serde(default = "default_match_function")]
    pub match_function: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// How embedding requests are paced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThrottleMode {
    /// Sleep a fixed delay after every request
    #[default]
    Fixed,
    /// Wait for a token-bucket permit before every request
    TokenBucket,
}

/// Throttle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default)]
    pub mode: ThrottleMode,

    /// Delay after each request in `fixed` mode (milliseconds)
    #[serde(default = "default_throttle_delay_ms")]
    pub delay_ms: u64,

    /// Sustained budget in `token-bucket` mode
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum similarity (0.0 - 1.0)
    #[serde(default = "default_match_threshold")]
    pub threshold: f32,

    /// Default number of results
    #[serde(default = "default_match_count")]
    pub count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            organization_id: default_organization_id(),
            env_file: default_env_file(),
            scan: ScanConfig::default(),
            chunk: ChunkConfig::default(),
            embedding: EmbeddingConfig::default(),
            store: StoreConfig::default(),
            throttle: ThrottleConfig::default(),
            search: SearchConfig::default(),
            config_file: PathBuf::new(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            files: default_scan_files(),
            dirs: default_scan_dirs(),
            ignore: default_ignore_patterns(),
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: default_chunk_max_chars(),
            min_chars: default_chunk_min_chars(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sources_table: default_sources_table(),
            chunks_table: default_chunks_table(),
            match_function: default_match_function(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            mode: ThrottleMode::default(),
            delay_ms: default_throttle_delay_ms(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_match_threshold(),
            count: default_match_count(),
        }
    }
}

impl Config {
    /// Get the default base directory (~/.aureon)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aureon")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("ingest.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.config_file = config_path.to_path_buf();

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location, falling
    /// back to built-in defaults when no default file exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Self::default_config_path();
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            debug!("No config file found, using defaults");
            let config = Config {
                config_file: default_path,
                ..Config::default()
            };
            config.validate()?;
            Ok(config)
        }
    }

    /// Save configuration to `self.config_file`
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.config_file, content)?;
        info!("Saved config to {:?}", self.config_file);
        Ok(())
    }

    /// Absolute, canonical project root
    pub fn resolved_project_root(&self) -> Result<PathBuf> {
        PathBuf::from(&self.project_root)
            .canonicalize()
            .map_err(|e| Error::InvalidPath(format!("{}: {}", self.project_root, e)))
    }

    /// Env file location, relative paths resolved against `project_root`
    pub fn env_file_path(&self, project_root: &Path) -> PathBuf {
        let path = PathBuf::from(&self.env_file);
        if path.is_absolute() {
            path
        } else {
            project_root.join(path)
        }
    }

    /// Load the env file and resolve store and embedding credentials
    pub fn credentials(&self, project_root: &Path) -> Result<Credentials> {
        let path = self.env_file_path(project_root);
        let env = EnvFile::load(&path)?;
        Credentials::resolve(&env, &path)
    }

    /// Organization id as a UUID
    pub fn organization_uuid(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.organization_id).map_err(|e| {
            Error::Config(format!(
                "organization_id '{}' is not a UUID: {}",
                self.organization_id, e
            ))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.organization_uuid()?;

        if self.chunk.max_chars == 0 {
            return Err(Error::Config("chunk.max_chars must be positive".to_string()));
        }

        if self.chunk.min_chars >= self.chunk.max_chars {
            return Err(Error::Config(
                "chunk.min_chars must be < chunk.max_chars".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(Error::Config(
                "embedding.dimension must be positive".to_string(),
            ));
        }

        if self.throttle.mode == ThrottleMode::TokenBucket && self.throttle.requests_per_minute == 0
        {
            return Err(Error::Config(
                "throttle.requests_per_minute must be positive in token-bucket mode".to_string(),
            ));
        }

        if self.search.threshold < 0.0 || self.search.threshold > 1.0 {
            return Err(Error::Config(
                "search.threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}
