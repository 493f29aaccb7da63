use anyhow::Context as _;

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,html5ever=error";

/// Installs the stderr subscriber; `RUST_LOG` replaces [`DEFAULT_FILTER`].
pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
