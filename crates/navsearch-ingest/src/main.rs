//! navsearch-populate - message data populate tool

use anyhow::Result;
use clap::Parser;
use navsearch_common::logging::{init_logging, LogConfig, LogLevel};
use navsearch_common::types::MessageType;
use navsearch_ingest::message::{resolve_years, MessagePipeline, PgMessageStore};
use navsearch_ingest::IngestConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

/// Default database URL for local development.
const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/navsearch";

#[derive(Parser, Debug)]
#[command(name = "navsearch-populate")]
#[command(author, version, about = "Navy Search message populate tool")]
struct Cli {
    /// Message type to populate
    #[arg(short = 't', long = "type", default_value = "NAVADMIN")]
    message_type: String,

    /// Two-digit year to populate (repeatable)
    #[arg(short, long = "year", default_value = "16")]
    years: Vec<String>,

    /// Additional years
    #[arg(trailing_var_arg = true)]
    extra_years: Vec<String>,

    /// Source domain override
    #[arg(long)]
    domain: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over CLI-derived settings
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("navsearch-populate".to_string())
        .build()
        .with_env_overrides()?;

    init_logging(&log_config)?;

    let message_type: MessageType = cli.message_type.parse()?;
    let years = resolve_years(&cli.years, &cli.extra_years);
    if years.is_empty() {
        anyhow::bail!("No valid years requested");
    }

    let mut config = IngestConfig::from_env()?;
    if let Some(domain) = cli.domain {
        config = config.with_domain(domain);
        config.validate()?;
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("Database connection pool established");

    sqlx::migrate!("../../migrations").run(&pool).await?;

    let store = PgMessageStore::new(pool.clone());
    let pipeline = MessagePipeline::new(&config, store)?;

    let result = pipeline.run(message_type, &years).await;

    // Release the pool on every exit path
    pool.close().await;

    match result {
        Ok(stats) => {
            info!(
                persisted = stats.persisted,
                failed = stats.failed,
                "COMPLETE ~ {} messages added",
                stats.persisted
            );
            Ok(())
        },
        Err(err) => {
            error!(error = %err, "Populate run failed");
            std::process::exit(1);
        },
    }
}
