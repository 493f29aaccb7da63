use scraper::{Html, Selector};

use crate::catalog::{CatalogClient, FetchError};
use crate::config::OpenaiConfig;
use crate::extract::content_link;
use crate::openai::ResponsesClient;

const SUMMARY_INSTRUCTIONS: &str = "\
You summarize books. Write a summary of no more than 150 words that covers \
the main plot and the overall theme of the story. Leave out side plots and \
minor details, and close with a short concluding sentence.";

const NOOP_SUMMARY_WORDS: usize = 150;
const SAMPLE_WINDOWS: usize = 8;
const SAMPLE_SEPARATOR: &str = "\n[...]\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SummaryEngine {
    Noop,
    Openai,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Book Id is required")]
    MissingId,

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("no full-text link found on the catalog page for book {id}")]
    ContentLinkMissing { id: String },

    #[error("full text is empty: {url}")]
    EmptyText { url: String },

    #[error("{0}")]
    Llm(String),
}

enum Backend {
    Noop,
    Openai {
        client: ResponsesClient,
        max_chars: usize,
    },
}

/// Fetches a book's full text through the catalog and condenses it.
pub struct Summarizer {
    catalog: CatalogClient,
    backend: Backend,
}

impl Summarizer {
    /// Returns an excerpt of the opening words instead of calling an LLM.
    pub fn noop(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            backend: Backend::Noop,
        }
    }

    pub fn openai(catalog: CatalogClient, config: &OpenaiConfig) -> anyhow::Result<Self> {
        if config.api_key.trim().is_empty() {
            anyhow::bail!("OPENAI_API_KEY is not set");
        }
        if config.max_chars == 0 {
            anyhow::bail!("openai max chars must be > 0");
        }
        Ok(Self {
            catalog,
            backend: Backend::Openai {
                client: ResponsesClient::new(config)?,
                max_chars: config.max_chars,
            },
        })
    }

    pub fn engine(&self) -> SummaryEngine {
        match self.backend {
            Backend::Noop => SummaryEngine::Noop,
            Backend::Openai { .. } => SummaryEngine::Openai,
        }
    }

    pub async fn summarize(&self, id: &str) -> Result<String, SummaryError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SummaryError::MissingId);
        }

        let page = self.catalog.fetch_book_page(id).await?;
        let link = content_link(&page)
            .and_then(|href| self.catalog.resolve(&href))
            .ok_or_else(|| SummaryError::ContentLinkMissing { id: id.to_owned() })?;

        let raw = self.catalog.fetch_text(&link).await?;
        let text = if looks_like_html(&raw) {
            html_to_text(&raw)
        } else {
            raw
        };
        if text.trim().is_empty() {
            return Err(SummaryError::EmptyText {
                url: link.to_string(),
            });
        }

        tracing::info!(
            id,
            url = %link,
            chars = text.chars().count(),
            engine = ?self.engine(),
            "summarize book"
        );

        match &self.backend {
            Backend::Noop => Ok(opening_words(&text, NOOP_SUMMARY_WORDS)),
            Backend::Openai { client, max_chars } => {
                let input = sample_excerpt(&text, *max_chars);
                client
                    .complete(SUMMARY_INSTRUCTIONS, &input)
                    .await
                    .map_err(|err| SummaryError::Llm(format!("{err:#}")))
            }
        }
    }
}

fn opening_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Evenly spaced windows across the whole text, so beginning, middle and
/// end all reach the model when the book is longer than `max_chars`.
fn sample_excerpt(text: &str, max_chars: usize) -> String {
    let chars = text.chars().collect::<Vec<_>>();
    let total = chars.len();
    if total <= max_chars {
        return text.to_owned();
    }

    let windows = SAMPLE_WINDOWS.min(max_chars).max(1);
    let window = max_chars / windows;
    let span = total - window;
    let gaps = (windows - 1).max(1);

    (0..windows)
        .map(|i| {
            let start = i * span / gaps;
            chars[start..start + window].iter().collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(SAMPLE_SEPARATOR)
}

fn looks_like_html(body: &str) -> bool {
    let head = body
        .trim_start()
        .chars()
        .take(512)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.contains("<html")
}

fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = match Selector::parse("body") {
        Ok(body) => match document.select(&body).next() {
            Some(body) => body.text().collect::<Vec<_>>().join(" "),
            None => document.root_element().text().collect::<Vec<_>>().join(" "),
        },
        Err(_) => document.root_element().text().collect::<Vec<_>>().join(" "),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
