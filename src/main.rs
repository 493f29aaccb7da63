use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    bookscout::logging::init().context("init logging")?;

    let cli = bookscout::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let workspace = bookscout::commands::Workspace::open(&cli).context("open workspace")?;

    match &cli.command {
        bookscout::cli::Command::Show(args) => {
            bookscout::commands::show(&workspace, args).await?;
        }
        bookscout::cli::Command::Viewed(args) => {
            bookscout::commands::viewed(&workspace, args).await?;
        }
        bookscout::cli::Command::Summary(args) => {
            bookscout::commands::summary(&workspace, args).await?;
        }
    }

    Ok(())
}
