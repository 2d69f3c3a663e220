//! CLI entry point for the exoplanet catalog tool.
//!
//! Provides subcommands for ingesting the NASA Exoplanet Archive catalog
//! into a local SQLite database, searching it, listing distinct column
//! values, and computing binned scatter-plot data with a trend line.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use exoplanet_catalog::archive::ArchiveClient;
use exoplanet_catalog::catalog::{CatalogStore, Column, SearchFilter, SqliteCatalog};
use exoplanet_catalog::fetch::{BasicClient, fetch_bytes};
use exoplanet_catalog::output::{append_search_csv, print_json, print_search_table, write_plot_csv};
use exoplanet_catalog::parser::parse_catalog_csv;
use exoplanet_catalog::plot::build_plot;
use exoplanet_catalog::trend::DEFAULT_BIN_COUNT;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "exoplanet_catalog")]
#[command(about = "Browse and plot a local copy of the NASA exoplanet catalog", long_about = None)]
struct Cli {
    /// SQLite database file holding the catalog
    #[arg(long, global = true, default_value = "exoplanets.db")]
    database: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the catalog and load it into the local database
    Ingest {
        /// Local CSV file or URL to ingest instead of the live TAP service
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Search the catalog by planet identity columns
    Search {
        /// Planet name (exact match)
        #[arg(long)]
        name: Option<String>,

        /// Year of discovery
        #[arg(long)]
        year: Option<i64>,

        /// Discovery method, e.g. "Transit"
        #[arg(long)]
        method: Option<String>,

        /// Host star name
        #[arg(long)]
        host: Option<String>,

        /// Discovery facility
        #[arg(long)]
        facility: Option<String>,

        /// CSV file to append results to instead of printing a table
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List distinct values of a column (completer/picker source)
    Distinct {
        /// Column to list
        #[arg(value_enum)]
        column: Column,
    },
    /// Compute binned scatter-plot data and a trend line for two columns
    Plot {
        /// X-axis column
        #[arg(value_enum)]
        x_axis: Column,

        /// Y-axis column
        #[arg(value_enum)]
        y_axis: Column,

        /// Number of bins along the x-axis
        #[arg(short, long, default_value_t = DEFAULT_BIN_COUNT)]
        bins: u32,

        /// CSV file to write bin centers and means to (JSON to stdout
        /// otherwise)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/exoplanet_catalog.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("exoplanet_catalog.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { source } => {
            ingest(&cli.database, source.as_deref()).await?;
        }
        Commands::Search {
            name,
            year,
            method,
            host,
            facility,
            output,
        } => {
            let filter = SearchFilter {
                name,
                year,
                method,
                host,
                facility,
            };
            if filter.is_empty() {
                bail!("no search fields selected; provide at least one of --name, --year, --method, --host, --facility");
            }

            let store = SqliteCatalog::open(&cli.database)?;
            let hits = store.search(&filter)?;
            info!(matches = hits.len(), "Search complete");

            if hits.is_empty() {
                warn!("No exoplanets matched the given filters");
            } else if let Some(path) = output {
                append_search_csv(&path, &hits)?;
                info!(path, "Results appended");
            } else {
                print_search_table(&hits);
            }
        }
        Commands::Distinct { column } => {
            let store = SqliteCatalog::open(&cli.database)?;
            let values = store.distinct_values(column)?;
            info!(
                column = column.sql_name(),
                count = values.len(),
                "Distinct values fetched"
            );
            for value in values {
                println!("{value}");
            }
        }
        Commands::Plot {
            x_axis,
            y_axis,
            bins,
            output,
        } => {
            let store = SqliteCatalog::open(&cli.database)?;
            let plot = build_plot(&store, x_axis, y_axis, bins)?;

            if let Some(path) = output {
                write_plot_csv(&path, &plot)?;
                info!(path, "Plot data written");
            } else {
                print_json(&plot)?;
            }
        }
    }

    Ok(())
}

/// Loads catalog CSV from the live TAP service, a URL, or a local file,
/// and inserts the parsed records into the database.
#[tracing::instrument(skip(source), fields(database))]
async fn ingest(database: &str, source: Option<&str>) -> Result<()> {
    let bytes = match source {
        None => {
            ArchiveClient::new(BasicClient::new())
                .fetch_catalog_csv()
                .await?
        }
        Some(url) if url.starts_with("http") => {
            let client = BasicClient::new();
            fetch_bytes(&client, url).await?
        }
        Some(path) => std::fs::read(path)?,
    };

    let records = parse_catalog_csv(&bytes)?;
    info!(records = records.len(), "Catalog CSV parsed");

    let mut store = SqliteCatalog::open(database)?;
    let inserted = store.insert_records(&records)?;
    let total = store.record_count()?;
    info!(inserted, total, "Catalog ingest complete");

    Ok(())
}
