//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::blog::SortMode;
use folio_core::config;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::posts::OutputFormat;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Browse a blog post index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to load the post index from.
#[derive(clap::Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Post index URL or path (default: `posts_source` from config)
    #[arg(short, long, value_name = "URL|PATH")]
    source: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Query the post index
    Posts {
        #[command(subcommand)]
        command: PostsCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum PostsCommands {
    /// Lists posts after filtering, searching and sorting
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Only posts in this category (or tag); "all" disables the filter
        #[arg(short, long)]
        category: Option<String>,

        /// Only posts whose title, excerpt or tags contain this text
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Sort order (date-desc, date-asc)
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortMode>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Lists the categories offered by the category filter
    Categories {
        #[command(flatten)]
        source: SourceArgs,

        /// Include post tags
        #[arg(long)]
        with_tags: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults
    Generate,
}

fn parse_sort(raw: &str) -> Result<SortMode, String> {
    raw.parse()
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Posts { command } => {
            let config = config::Config::load().context("load config")?;
            match command {
                PostsCommands::List {
                    source,
                    category,
                    search,
                    sort,
                    format,
                } => {
                    let query = commands::posts::ListQuery {
                        category,
                        search,
                        sort,
                        format,
                    };
                    commands::posts::list(&config, source.source.as_deref(), &query).await
                }
                PostsCommands::Categories { source, with_tags } => {
                    commands::posts::categories(&config, source.source.as_deref(), with_tags)
                        .await
                }
            }
        }
        Commands::Config { command } => {
            let config_path = config::paths::config_path();
            match command {
                ConfigCommands::Path => {
                    commands::config::path(&config_path);
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(&config_path),
                ConfigCommands::Generate => commands::config::generate(),
            }
        }
    }
}
