//! Larder CLI - Command line interface for the recipe graph

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{category, completions, ingredient, recipe, search};
use config::{BackendKind, Config};
use larder_graph::RecipeGraph;
use larder_storage::{MemoryStorage, StorageBackend};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "larder")]
#[command(author, version, about = "Recipes, categories and ingredients that stay consistent")]
pub struct Cli {
    /// Data directory
    #[arg(short, long, global = true, env = "LARDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(short, long, value_enum, global = true)]
    pub backend: Option<BackendKind>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage ingredients
    Ingredient(ingredient::IngredientArgs),
    /// Manage recipe categories
    Category(category::CategoryArgs),
    /// Manage recipes and their ingredient lines
    Recipe(recipe::RecipeArgs),
    /// Search names across the store
    Search(search::SearchArgs),
    /// Manage CLI configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the opened graph
pub struct AppContext {
    pub graph: RecipeGraph,
    pub format: OutputFormat,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
        let backend = cli.backend.unwrap_or(config.backend);

        let storage = open_backend(backend, &data_dir)?;
        let graph = RecipeGraph::open(storage).await?;

        Ok(Self {
            graph,
            format: cli.format.unwrap_or(config.output),
        })
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

fn open_backend(kind: BackendKind, data_dir: &Path) -> anyhow::Result<Arc<dyn StorageBackend>> {
    if kind == BackendKind::Memory {
        tracing::debug!("Using in-memory storage; nothing will be kept");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    std::fs::create_dir_all(data_dir)?;
    match kind {
        #[cfg(feature = "redb")]
        BackendKind::Redb => {
            let path = data_dir.join("larder.redb");
            tracing::debug!("Using database at: {:?}", path);
            Ok(Arc::new(larder_storage::RedbStorage::open(&path)?))
        }
        #[cfg(feature = "sqlite")]
        BackendKind::Sqlite => {
            let path = data_dir.join("larder.db");
            tracing::debug!("Using database at: {:?}", path);
            Ok(Arc::new(larder_storage::SqliteStorage::open(&path)?))
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("The {} backend is not compiled into this build", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting larder CLI");

    // Commands that never touch the store
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load();
    let ctx = AppContext::new(&cli, &config).await?;

    match &cli.command {
        Commands::Ingredient(args) => ingredient::run(args, &ctx).await?,
        Commands::Category(args) => category::run(args, &ctx).await?,
        Commands::Recipe(args) => recipe::run(args, &ctx).await?,
        Commands::Search(args) => search::run(args, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    ctx.graph.close().await?;
    Ok(())
}
