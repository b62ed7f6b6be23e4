mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use bigcommerce_lib::{FetcherConfig, PaginatedFetcher, RateLimitCoordinator, StoreConfig};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::commands::Context;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "bcexport")]
#[command(about = "Export paginated collections from a BigCommerce store")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Re-run a throttled fetch up to this many times
    #[arg(long, default_value_t = 3, global = true)]
    max_retries: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export all orders matching the filters
    Orders(commands::orders::OrdersArgs),
    /// Fetch every page of an arbitrary collection (e.g. v3/catalog/products)
    Fetch(commands::fetch::FetchArgs),
    /// Orders created in a date range, with totals
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bigcommerce=info".parse()?)
                .add_directive("bcexport=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let store = StoreConfig::from_env()?;
    let coordinator = Arc::new(RateLimitCoordinator::new());
    let fetcher = PaginatedFetcher::with_config(
        store.client()?,
        &store.store_hash,
        Arc::clone(&coordinator),
        FetcherConfig::from_env(),
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling fetch");
            on_interrupt.cancel();
        }
    });

    let ctx = Context {
        fetcher: &fetcher,
        format: &format,
        max_retries: cli.max_retries,
        cancel: &cancel,
    };

    let result = match &cli.command {
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Fetch(args) => commands::fetch::run(args, &ctx).await,
        Commands::Report(args) => commands::report::run(args, &ctx).await,
    };

    for summary in coordinator.summaries() {
        match format {
            OutputFormat::Json => match serde_json::to_string(&summary) {
                Ok(json) => tracing::info!("request summary: {}", json),
                Err(e) => tracing::warn!("Failed to serialize request summary: {}", e),
            },
            OutputFormat::Table => tracing::info!(
                "{}: {} requests ({} ok, {} throttled, {} failed), {} pause(s) totalling {:.1}s, lowest quota left {}",
                summary.store,
                summary.requests,
                summary.succeeded,
                summary.throttled,
                summary.failed,
                summary.pauses,
                summary.paused_secs,
                summary
                    .lowest_requests_left
                    .map(|left| left.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            ),
        }
    }

    result
}
