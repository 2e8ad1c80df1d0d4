//! aureon-ingest CLI entry point

use aureon_ingest::{
    commands::{
        cmd_ingest, cmd_ingest_dry_run, cmd_init, cmd_search, print_ingest_plan,
        print_ingest_stats, print_init_summary, print_search_results, InitOptions, SearchOptions,
    },
    config::{Config, Credentials},
    embed::GeminiEmbedder,
    error::Result,
    progress::LogWriterFactory,
    store::SupabaseStore,
    throttle::Throttle,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "aureon-ingest")]
#[command(version, about = "Chunk project documents and push embeddings to the Aureon knowledge base", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "AUREON_INGEST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Project root (overrides the config file)
    #[arg(long, global = true, env = "AUREON_PROJECT_ROOT")]
    root: Option<PathBuf>,

    /// Env file with credentials (overrides the config file)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Chunk, embed, and store every configured source
    Ingest {
        /// Walk and chunk only; nothing is embedded or stored
        #[arg(long)]
        dry_run: bool,
    },

    /// Search the knowledge base
    Search {
        /// The search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum similarity (0-1)
        #[arg(short, long)]
        threshold: Option<f32>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory::default()))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { force } => {
            let options = InitOptions {
                config_path: cli.config.unwrap_or_else(Config::default_config_path),
                force,
                project_root: cli.root,
            };
            let config = cmd_init(options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_init_summary(&config);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "aureon-ingest", &mut std::io::stdout());
        }

        Commands::Ingest { dry_run } => {
            let config = load_config(cli.config.as_deref(), cli.root.as_deref(), cli.env_file)?;
            let project_root = config.resolved_project_root()?;

            if dry_run {
                let planned = cmd_ingest_dry_run(&config, &project_root).await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&planned)?);
                } else {
                    print_ingest_plan(&planned);
                }
                return Ok(());
            }

            let credentials = config.credentials(&project_root)?;
            let (embedder, store) = connect(&config, &credentials)?;
            let throttle = Throttle::from_config(&config.throttle);

            let stats = cmd_ingest(&config, &project_root, &embedder, &store, &throttle).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_ingest_stats(&stats);
            }
        }

        Commands::Search {
            query,
            limit,
            threshold,
        } => {
            let config = load_config(cli.config.as_deref(), cli.root.as_deref(), cli.env_file)?;
            let project_root = config.resolved_project_root()?;
            let credentials = config.credentials(&project_root)?;
            let (embedder, store) = connect(&config, &credentials)?;

            let options = SearchOptions { limit, threshold };
            let result = cmd_search(&config, &embedder, &store, &query, options).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_search_results(&result);
            }
        }
    }

    Ok(())
}

/// Load the config and apply command-line overrides
fn load_config(
    path: Option<&Path>,
    root: Option<&Path>,
    env_file: Option<PathBuf>,
) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;

    if let Some(root) = root {
        config.project_root = root.display().to_string();
    }
    if let Some(env_file) = env_file {
        config.env_file = env_file.display().to_string();
    }

    debug!("Using config {:?}", config.config_file);
    Ok(config)
}

/// Build the provider and store clients for this run
fn connect(config: &Config, credentials: &Credentials) -> Result<(GeminiEmbedder, SupabaseStore)> {
    let embedder = GeminiEmbedder::new(&config.embedding, &credentials.embedding_key)?;
    let store = SupabaseStore::new(&credentials.store_url, &credentials.store_key, &config.store)?;
    info!("Knowledge store: {}", credentials.store_url);
    Ok((embedder, store))
}
