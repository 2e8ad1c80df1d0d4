//! `KEY=VALUE` env file loading and credential resolution

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Lookup order for the store endpoint
pub const STORE_URL_KEYS: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL"];

/// Lookup order for the store credential, most privileged first
pub const STORE_KEY_KEYS: &[&str] = &[
    "SUPABASE_SERVICE_ROLE_KEY",
    "VITE_SUPABASE_SERVICE_ROLE_KEY",
    "VITE_SUPABASE_ANON_KEY",
    "VITE_SUPABASE_PUBLISHABLE_DEFAULT_KEY",
    "SUPABASE_KEY",
];

/// Lookup order for the embedding provider credential
pub const EMBEDDING_KEY_KEYS: &[&str] = &["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([^#=]+)=(.*)$").expect("valid regex"))
}

fn quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^["'](.*)["']$"#).expect("valid regex"))
}

/// Parsed contents of an env file
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Parse env file text. Lines that are not `KEY=VALUE` are ignored.
    pub fn parse(content: &str) -> Self {
        let mut vars = HashMap::new();
        for line in content.lines() {
            let Some(caps) = line_pattern().captures(line) else {
                continue;
            };
            let key = caps[1].trim();
            if key.is_empty() {
                continue;
            }
            let value = caps[2].trim();
            let value = match quoted_pattern().captures(value) {
                Some(inner) => inner[1].to_string(),
                None => value.to_string(),
            };
            vars.insert(key.to_string(), value);
        }
        Self { vars }
    }

    /// Load an env file; a missing file yields an empty set
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No env file at {:?}", path);
            return Ok(Self::default());
        }
        info!("Loading env from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// First non-empty value among `keys`, checking the file before the
    /// process environment
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|k| self.get(k).filter(|v| !v.is_empty()).map(str::to_string))
            .or_else(|| {
                keys.iter().find_map(|k| {
                    std::env::var(k).ok().filter(|v| !v.is_empty())
                })
            })
    }
}

/// Credentials needed to reach the store and the embedding provider
#[derive(Clone)]
pub struct Credentials {
    pub store_url: String,
    pub store_key: String,
    pub embedding_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("store_url", &self.store_url)
            .field("store_key", &"<redacted>")
            .field("embedding_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve all credentials, reporting every missing one at once
    pub fn resolve(env: &EnvFile, env_path: &Path) -> Result<Self> {
        let store_url = env.first_of(STORE_URL_KEYS);
        let store_key = env.first_of(STORE_KEY_KEYS);
        let embedding_key = env.first_of(EMBEDDING_KEY_KEYS);

        match (store_url, store_key, embedding_key) {
            (Some(store_url), Some(store_key), Some(embedding_key)) => Ok(Self {
                store_url,
                store_key,
                embedding_key,
            }),
            (store_url, store_key, embedding_key) => {
                let mut missing = Vec::new();
                if store_url.is_none() {
                    missing.push(STORE_URL_KEYS[0].to_string());
                }
                if store_key.is_none() {
                    missing.push(STORE_KEY_KEYS[0].to_string());
                }
                if embedding_key.is_none() {
                    missing.push(EMBEDDING_KEY_KEYS[0].to_string());
                }
                Err(Error::MissingCredential {
                    env_file: env_path.display().to_string(),
                    missing,
                })
            }
        }
    }
}
