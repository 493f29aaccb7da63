use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use bookscout::app::{AppState, router};
use bookscout::catalog::CatalogClient;
use bookscout::cli::OpenaiArgs;
use bookscout::config::CatalogConfig;
use bookscout::summary::{SummaryEngine, Summarizer};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Catalog base URL (default: $BOOKSCOUT_CATALOG_URL or https://www.gutenberg.org).
    #[arg(long)]
    catalog_url: Option<String>,

    /// Engine behind /api/text-analysis.
    #[arg(long, value_enum, default_value_t = SummaryEngine::Openai)]
    summary_engine: SummaryEngine,

    #[command(flatten)]
    openai: OpenaiArgs,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    bookscout::logging::init()?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting bookscout-app");

    let config = match args.catalog_url.as_deref() {
        Some(url) => CatalogConfig::new(url).context("parse --catalog-url")?,
        None => CatalogConfig::from_env()?,
    };
    let catalog = CatalogClient::new(&config)?;

    let summarizer = match args.summary_engine {
        SummaryEngine::Noop => Summarizer::noop(catalog.clone()),
        SummaryEngine::Openai => Summarizer::openai(catalog.clone(), &args.openai.to_config())
            .context("configure summary engine")?,
    };
    tracing::info!(
        catalog = %config.base_url,
        engine = ?summarizer.engine(),
        "summary engine ready"
    );

    let app = router(AppState {
        catalog,
        summarizer: Arc::new(summarizer),
    });

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "listen for ctrl-c failed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
