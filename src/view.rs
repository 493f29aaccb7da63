use std::fmt::Write as _;

use url::Url;

use crate::schema::BookRecord;

const UNKNOWN: &str = "Unknown";
pub const RECENTLY_VIEWED_LIMIT: usize = 8;

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { UNKNOWN } else { value }
}

/// Catalog titles read "<title> by <author>"; the details table shows only
/// the title part.
pub fn bare_title(title: &str) -> &str {
    match title.find(" by ") {
        Some(idx) => &title[..idx],
        None => title,
    }
}

fn absolute_link(base_url: &Url, href: &str) -> String {
    if href.is_empty() {
        return UNKNOWN.to_owned();
    }
    base_url
        .join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_owned())
}

pub fn render_details(book: &BookRecord, base_url: &Url, summary: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", or_unknown(&book.title));
    if let Some(summary) = summary {
        let _ = writeln!(out, "\n{summary}");
    }

    let rows = [
        ("Author", or_unknown(&book.author).to_owned()),
        ("Title", or_unknown(bare_title(&book.title)).to_owned()),
        ("Language", or_unknown(&book.language).to_owned()),
        ("Book Number", or_unknown(&book.id).to_owned()),
        ("Release Date", or_unknown(&book.published_date).to_owned()),
        ("Most Recently Updated", or_unknown(&book.updated_date).to_owned()),
        ("Cover", absolute_link(base_url, &book.cover_art)),
        ("Download", absolute_link(base_url, &book.download_link)),
        ("Read Online", absolute_link(base_url, &book.read_online_link)),
    ];
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let _ = writeln!(out, "\nAbout this Book");
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }
    out
}

/// One line per book: published date, title, id.
pub fn render_cards(heading: &str, books: &[BookRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{heading}");
    for book in books {
        let _ = writeln!(
            out,
            "  [{}] {} (published {})",
            or_unknown(&book.id),
            or_unknown(&book.title),
            or_unknown(&book.published_date)
        );
    }
    out
}
