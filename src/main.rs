//! Library Console - Library Management System
//!
//! Interactive console front end over the library catalog.

use std::path::Path;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tokio::io::BufReader;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use library_console::{
    config::{AppConfig, DatabaseConfig, LoggingConfig},
    Console, Repository, Services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_tracing(&config.logging)?;

    tracing::info!("Starting Library Console v{}", env!("CARGO_PKG_VERSION"));

    let (repository, pool) = open_repository(&config.database).await?;
    let services = Services::new(repository);

    let mut console = Console::new(
        services,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    let outcome = console.run().await;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connection closed");
    }

    outcome.context("Console session failed")
}

/// Connect to the configured backend. The pool is returned so it can be
/// closed explicitly on exit.
async fn open_repository(
    config: &DatabaseConfig,
) -> anyhow::Result<(Repository, Option<Pool<Postgres>>)> {
    if config.is_memory() {
        tracing::warn!("Using the in-memory store; nothing will be persisted");
        return Ok((Repository::in_memory(), None));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await
        .context("Database connection failed")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    Ok((Repository::postgres(pool.clone()), Some(pool)))
}

/// Install the global subscriber. Logs go to stderr, or to `logging.file`
/// when set, so they never interleave with the menu on stdout.
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_console={}", config.level).into());

    let (writer, guard, ansi) = match &config.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("logging.file {:?} has no file name", file))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            (BoxMakeWriter::new(writer), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let layer = match config.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();

    Ok(guard)
}
