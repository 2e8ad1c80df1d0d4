//! aureon-ingest - Knowledge-base ingestion for the Aureon project
//!
//! This crate provides:
//! - A source walker over configured files and directory roots
//! - Line-aligned chunking of text documents
//! - Embedding through the Gemini API and storage in a Supabase project
//! - Similarity search over what was stored

pub mod chunk;
pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod progress;
pub mod store;
pub mod throttle;
pub mod walk;

pub use config::Config;
pub use error::{Error, Result};
