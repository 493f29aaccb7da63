use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};

use crate::catalog::{CatalogClient, FetchError};
use crate::schema::{BookCandidate, BookRecord, FieldErrors};

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Book id is required")]
    InvalidId,

    #[error("catalog unreachable: {0}")]
    Transport(#[source] FetchError),

    #[error("Book data not found: {id} (HTTP {status})")]
    NotFound { id: String, status: StatusCode },

    #[error("Validation error: {0}")]
    Validation(FieldErrors),
}

impl ExtractionError {
    pub(crate) fn from_fetch(id: &str, err: FetchError) -> Self {
        match err {
            FetchError::Status { status, .. } => Self::NotFound {
                id: id.to_owned(),
                status,
            },
            err @ FetchError::Transport { .. } => Self::Transport(err),
        }
    }
}

/// Fetches the catalog detail page for `id` and returns its validated
/// metadata. The record carries `id` exactly as given; it is only trimmed
/// to reject blank ids.
pub async fn extract(catalog: &CatalogClient, id: &str) -> Result<BookRecord, ExtractionError> {
    if id.trim().is_empty() {
        return Err(ExtractionError::InvalidId);
    }

    let html = catalog
        .fetch_book_page(id)
        .await
        .map_err(|err| ExtractionError::from_fetch(id, err))?;

    let candidate = parse_book_page(id, &html);
    let book = candidate.validate().map_err(|errors| {
        tracing::warn!(id, %errors, "catalog page is missing landmarks");
        ExtractionError::Validation(errors)
    })?;

    tracing::info!(id, title = %book.title, "extracted book metadata");
    Ok(book)
}

/// Reads the metadata landmarks out of a detail page. Missing or empty
/// landmarks come back as `None`.
pub fn parse_book_page(id: &str, html: &str) -> BookCandidate {
    let document = Html::parse_document(html);

    BookCandidate {
        id: Some(id.to_owned()),
        title: text_of_all(&document, "h1[itemprop='name']"),
        author: text_of_all(&document, "a[itemprop='creator']"),
        published_date: text_of_all(&document, "td[itemprop='datePublished']"),
        cover_art: attr_of_first(&document, "img.cover-art", "src"),
        download_link: attr_of_first(&document, "a[type='application/zip']", "href"),
        read_online_link: attr_of_first(&document, "a[type='text/html']", "href"),
        language: text_of_all(&document, "tr[itemprop='inLanguage'] td"),
        updated_date: text_of_all(&document, "td[itemprop='dateModified']"),
    }
}

/// The text of the cell following the read-online link's cell. On the
/// catalog's detail page this is the plain URL of the full text.
pub fn content_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[type='text/html']").ok()?;
    let anchor = document.select(&selector).next()?;
    let parent = anchor.parent().and_then(ElementRef::wrap)?;
    let next = parent.next_siblings().find_map(ElementRef::wrap)?;

    let text = next.text().collect::<String>();
    non_empty(text.trim().to_owned())
}

fn text_of_all(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let text = document
        .select(&selector)
        .flat_map(|el| el.text())
        .collect::<String>();
    non_empty(text)
}

fn attr_of_first(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let value = document.select(&selector).next()?.value().attr(attr)?;
    non_empty(value.to_owned())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
