//! GridFin CLI
//!
//! Main entry point for the gridfin command-line tool.
//! Provides commands for querying and ingesting financial data with RAG.

mod commands;

use clap::{Parser, Subcommand};
use commands::{IngestCommand, QueryCommand, ServeCommand, StatsCommand};
use gridfin_core::{config::AppConfig, logging, AppResult};

/// GridFin CLI - retrieval-augmented Q&A over financial data
#[derive(Parser, Debug)]
#[command(name = "gridfin")]
#[command(about = "Retrieval-augmented Q&A over financial data", long_about = None)]
#[command(version)]
struct Cli {
    /// Vector index namespace
    #[arg(short, long, global = true, env = "GRIDFIN_NAMESPACE")]
    namespace: Option<String>,

    /// Number of matches to retrieve per query
    #[arg(short = 'k', long, global = true, env = "GRIDFIN_TOP_K")]
    top_k: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question over the ingested financial data
    Query(QueryCommand),

    /// Format, embed, and upsert records into the vector index
    Ingest(IngestCommand),

    /// Run the HTTP query API
    Serve(ServeCommand),

    /// Show vector index statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.namespace,
        cli.top_k,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("GridFin CLI starting");
    tracing::debug!("Namespace: {}", config.namespace);
    tracing::debug!("Top-k: {}", config.top_k);

    let command_name = match &cli.command {
        Commands::Query(_) => "query",
        Commands::Ingest(_) => "ingest",
        Commands::Serve(_) => "serve",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Query(cmd) => cmd.execute(&config).await,
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
