//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub config_path: PathBuf,
    pub force: bool,
    /// Project root to record instead of the default
    pub project_root: Option<PathBuf>,
}

/// Write a default configuration file
pub fn cmd_init(options: InitOptions) -> Result<Config> {
    let InitOptions {
        config_path,
        force,
        project_root,
    } = options;

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    let mut config = Config {
        config_file: config_path,
        ..Config::default()
    };
    if let Some(root) = project_root {
        config.project_root = absolute(&root)?.display().to_string();
    }

    config.validate()?;
    config.save()?;
    info!("Created config at {:?}", config.config_file);

    Ok(config)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| Error::InvalidPath(format!("{}: {}", path.display(), e)))
}

/// Print next steps after init
pub fn print_init_summary(config: &Config) {
    println!("✓ Initialized aureon-ingest");
    println!("\nConfiguration: {:?}", config.config_file);
    println!("Project root: {}", config.project_root);
    println!("Credentials: {}", config.env_file);
    println!("\nNext steps:");
    println!("  aureon-ingest ingest --dry-run      # Preview what would be ingested");
    println!("  aureon-ingest ingest                # Embed and store the knowledge base");
    println!("  aureon-ingest search \"how to X\"     # Search the knowledge base");
}
