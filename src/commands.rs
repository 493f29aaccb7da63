use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context as _;

use crate::catalog::CatalogClient;
use crate::cli::{Cli, ShowArgs, SummaryArgs, ViewedArgs};
use crate::collection::{CollectionManager, list_excluding};
use crate::config::CatalogConfig;
use crate::extract::extract;
use crate::store::LocalFsStore;
use crate::summary::{SummaryEngine, Summarizer};
use crate::view::{RECENTLY_VIEWED_LIMIT, render_cards, render_details};

/// What every subcommand works against: the catalog and the local store.
pub struct Workspace {
    pub catalog: CatalogClient,
    pub books: CollectionManager,
}

impl Workspace {
    pub fn open(cli: &Cli) -> anyhow::Result<Self> {
        let config = match cli.catalog_url.as_deref() {
            Some(url) => CatalogConfig::new(url).context("parse --catalog-url")?,
            None => CatalogConfig::from_env()?,
        };
        let catalog = CatalogClient::new(&config)?;
        let store = Arc::new(LocalFsStore::new(&cli.data_dir));
        Ok(Self {
            catalog,
            books: CollectionManager::new(store),
        })
    }
}

pub async fn show(workspace: &Workspace, args: &ShowArgs) -> anyhow::Result<()> {
    let book = extract(&workspace.catalog, &args.id).await?;

    let summary = match workspace.books.load_summary(&book.id).await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::warn!(id = %book.id, error = %err, "cached summary unavailable");
            None
        }
    };

    // The book is printed even when the saved collection can't be updated.
    {
        let mut stdout = std::io::stdout().lock();
        if args.json {
            let json = serde_json::to_string_pretty(&book).context("serialize book")?;
            writeln!(stdout, "{json}")?;
        } else {
            let details = render_details(&book, workspace.catalog.base_url(), summary.as_deref());
            write!(stdout, "{details}")?;
        }
        stdout.flush()?;
    }

    let collection = workspace
        .books
        .upsert(book.clone())
        .await
        .context("save to recently viewed")?;
    if args.json {
        return Ok(());
    }

    let recent = list_excluding(&collection, Some(&book.id))
        .into_iter()
        .take(RECENTLY_VIEWED_LIMIT)
        .collect::<Vec<_>>();
    if !recent.is_empty() {
        write!(
            std::io::stdout().lock(),
            "\n{}",
            render_cards("Recently Viewed", &recent)
        )?;
    }
    Ok(())
}

pub async fn viewed(workspace: &Workspace, args: &ViewedArgs) -> anyhow::Result<()> {
    let collection = workspace.books.load_all().await?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let json = serde_json::to_string_pretty(&collection).context("serialize books")?;
        writeln!(stdout, "{json}")?;
        return Ok(());
    }

    if collection.is_empty() {
        writeln!(stdout, "No books viewed yet.")?;
        return Ok(());
    }
    let books = list_excluding(&collection, None);
    write!(stdout, "{}", render_cards("Recently Viewed", &books))?;
    Ok(())
}

pub async fn summary(workspace: &Workspace, args: &SummaryArgs) -> anyhow::Result<()> {
    let id = args.id.trim();
    if id.is_empty() {
        anyhow::bail!("Book Id is required");
    }

    if !args.refresh
        && let Some(cached) = workspace.books.load_summary(id).await?
    {
        tracing::debug!(id, "using cached summary");
        writeln!(std::io::stdout().lock(), "{cached}")?;
        return Ok(());
    }

    let summarizer = match args.engine {
        SummaryEngine::Noop => Summarizer::noop(workspace.catalog.clone()),
        SummaryEngine::Openai => {
            Summarizer::openai(workspace.catalog.clone(), &args.openai.to_config())?
        }
    };

    let summary = summarizer.summarize(id).await?;
    workspace
        .books
        .save_summary(id, &summary)
        .await
        .context("cache summary")?;

    writeln!(std::io::stdout().lock(), "{summary}")?;
    Ok(())
}
