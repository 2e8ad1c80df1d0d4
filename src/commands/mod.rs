//! CLI commands implementation

pub mod ingest;
pub mod init;
pub mod search;

pub use ingest::*;
pub use init::*;
pub use search::*;
