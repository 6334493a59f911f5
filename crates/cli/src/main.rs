use clap::{Parser, Subcommand};
use funding_binance::{BinanceAdapter, BinanceClient};
use funding_bybit::{BybitAdapter, BybitClient};
use funding_core::{AppConfig, ConfigLoader, VenueAdapter, VenueCode};
use funding_data::{Repositories, VenueStore};
use funding_hyperliquid::{HyperliquidAdapter, HyperliquidClient};
use funding_mexc::{MexcAdapter, MexcClient};
use funding_sync_scheduler::{PipelineKind, SyncScheduler};
use funding_web_api::ApiServer;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "funding-rates")]
#[command(about = "Perpetual funding-rate synchronization service", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed venues, then run all sync jobs and the query API
    Run,
    /// Run one pipeline once for one venue and exit
    Sync {
        /// Venue code (BINANCE, BYBIT, HYPERLIQUID, MEXC)
        #[arg(long)]
        venue: String,
        /// Pipeline to run: history or online
        #[arg(long, default_value = "history")]
        pipeline: String,
    },
    /// Start the query API only
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::load_from(&cli.config)?;

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Sync { venue, pipeline } => sync_once(config, &venue, &pipeline).await,
        Commands::Serve => serve(config).await,
    }
}

fn build_adapters(config: &AppConfig) -> Vec<Arc<dyn VenueAdapter>> {
    vec![
        Arc::new(BinanceAdapter::new(BinanceClient::new(
            config.venues.binance.api_url.clone(),
        ))),
        Arc::new(BybitAdapter::new(BybitClient::new(
            config.venues.bybit.api_url.clone(),
        ))),
        Arc::new(HyperliquidAdapter::new(HyperliquidClient::new(
            config.venues.hyperliquid.api_url.clone(),
        ))),
        Arc::new(MexcAdapter::new(MexcClient::new(
            config.venues.mexc.api_url.clone(),
        ))),
    ]
}

async fn connect_repos(config: &AppConfig) -> anyhow::Result<Repositories> {
    let pool = funding_data::connect(&config.database).await?;
    let repos = Repositories::new(pool);
    repos.venues.seed().await?;
    Ok(repos)
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let repos = connect_repos(&config).await?;
    let adapters = build_adapters(&config);
    let scheduler = SyncScheduler::new(config.scheduler.clone(), repos.clone(), adapters);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    let api = ApiServer::new(repos);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    tokio::select! {
        result = scheduler.start(cancel.clone()) => result?,
        result = api.serve(&addr) => result?,
    }

    Ok(())
}

async fn sync_once(config: AppConfig, venue: &str, pipeline: &str) -> anyhow::Result<()> {
    let venue: VenueCode = venue.parse()?;
    let kind = match pipeline {
        "history" => PipelineKind::History,
        "online" => PipelineKind::Online,
        other => anyhow::bail!("unknown pipeline '{other}', expected history or online"),
    };

    let repos = connect_repos(&config).await?;
    let adapters = build_adapters(&config);
    let scheduler = SyncScheduler::new(config.scheduler.clone(), repos, adapters);

    let report = scheduler.run_once(venue, kind).await?;
    tracing::info!(
        "{}: {} inserted, {} created, {} updated, {} skipped, {} failed",
        venue,
        report.inserted,
        report.created,
        report.updated,
        report.skipped,
        report.failed
    );

    Ok(())
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let repos = connect_repos(&config).await?;
    let api = ApiServer::new(repos);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    api.serve(&addr).await
}
