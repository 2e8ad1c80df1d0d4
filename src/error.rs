//! Custom error types for aureon-ingest

use thiserror::Error;

/// Main error type for ingestion operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required settings in {env_file}: {}", .missing.join(", "))]
    MissingCredential {
        env_file: String,
        missing: Vec<String>,
    },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Store error ({status}): {body}")]
    Store { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Result type alias for aureon-ingest
pub type Result<T> = std::result::Result<T, Error>;
