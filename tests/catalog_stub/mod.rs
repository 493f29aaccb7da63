use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub const PRIDE_TEXT: &str = "It is a truth universally acknowledged, that a single man in \
possession of a good fortune, must be in want of a wife.";

#[allow(dead_code)]
pub const FRANKENSTEIN_TEXT: &str = "You will rejoice to hear that no disaster has accompanied \
the commencement of an enterprise which you have regarded with such evil forebodings.";

/// Serves a few catalog detail pages shaped like the real catalog's markup:
///
/// - `/ebooks/1342`, `/ebooks/84`: complete pages with a full-text link
/// - `/ebooks/500`: page without the creator and language landmarks
/// - `/ebooks/77`: complete page without a full-text link cell
/// - anything else: 404
pub struct CatalogStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CatalogStub {
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start catalog stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");
        let server_base = base_url.clone();

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().split('?').next().unwrap_or_default().to_owned();
                let (status, content_type, body) = match path.as_str() {
                    "/ebooks/1342" => (
                        200,
                        "text/html; charset=utf-8",
                        detail_page(&DetailPage {
                            id: "1342",
                            title: "Pride and Prejudice",
                            author: Some("Jane Austen"),
                            language: Some("English"),
                            published: "Jun 1, 1998",
                            updated: "Oct 1, 2024",
                            text_url: Some(format!("{server_base}/cache/epub/1342/pg1342.txt")),
                        }),
                    ),
                    "/ebooks/84" => (
                        200,
                        "text/html; charset=utf-8",
                        detail_page(&DetailPage {
                            id: "84",
                            title: "Frankenstein; Or, The Modern Prometheus",
                            author: Some("Mary Wollstonecraft Shelley"),
                            language: Some("English"),
                            published: "Oct 1, 1993",
                            updated: "Mar 1, 2024",
                            text_url: Some(format!("{server_base}/cache/epub/84/pg84.txt")),
                        }),
                    ),
                    "/ebooks/500" => (
                        200,
                        "text/html; charset=utf-8",
                        detail_page(&DetailPage {
                            id: "500",
                            title: "The Adventures of Pinocchio",
                            author: None,
                            language: None,
                            published: "Apr 1, 1996",
                            updated: "Jan 1, 2021",
                            text_url: None,
                        }),
                    ),
                    "/ebooks/77" => (
                        200,
                        "text/html; charset=utf-8",
                        detail_page(&DetailPage {
                            id: "77",
                            title: "The House of the Seven Gables",
                            author: Some("Nathaniel Hawthorne"),
                            language: Some("English"),
                            published: "Sep 1, 1994",
                            updated: "Feb 1, 2023",
                            text_url: None,
                        }),
                    ),
                    "/cache/epub/1342/pg1342.txt" => {
                        (200, "text/plain; charset=utf-8", PRIDE_TEXT.to_owned())
                    }
                    "/cache/epub/84/pg84.txt" => (
                        200,
                        "text/html; charset=utf-8",
                        format!(
                            "<!DOCTYPE html><html><head><title>Frankenstein</title></head>\
                             <body><p>{FRANKENSTEIN_TEXT}</p></body></html>"
                        ),
                    ),
                    _ => (404, "text/plain", "not found".to_owned()),
                };

                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                        .expect("build header");
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct DetailPage {
    id: &'static str,
    title: &'static str,
    author: Option<&'static str>,
    language: Option<&'static str>,
    published: &'static str,
    updated: &'static str,
    text_url: Option<String>,
}

fn detail_page(page: &DetailPage) -> String {
    let id = page.id;
    let author_row = match page.author {
        Some(author) => format!(
            r#"<tr><th>Author</th><td><a href="/ebooks/author/1" itemprop="creator">{author}</a></td></tr>"#
        ),
        None => String::new(),
    };
    let language_row = match page.language {
        Some(language) => {
            format!(r#"<tr itemprop="inLanguage"><th>Language</th><td>{language}</td></tr>"#)
        }
        None => String::new(),
    };
    let text_cell = match &page.text_url {
        Some(url) => format!("<td>{url}</td>"),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>{title} | Project Gutenberg</title></head>
<body>
<div id="content">
<h1 itemprop="name">{title}</h1>
<img class="cover-art" src="/cache/epub/{id}/pg{id}.cover.medium.jpg" alt="Book Cover">
<table class="bibrec">
{author_row}
<tr><th>Title</th><td>{title}</td></tr>
{language_row}
<tr><th>Release Date</th><td itemprop="datePublished">{published}</td></tr>
<tr><th>Most Recently Updated</th><td itemprop="dateModified">{updated}</td></tr>
</table>
<table class="files">
<tr><td><a href="/ebooks/{id}.html.images" type="text/html">Read online (web)</a></td>{text_cell}</tr>
<tr><td><a href="/cache/epub/{id}/pg{id}-h.zip" type="application/zip">Download HTML (zip)</a></td></tr>
</table>
</div>
</body>
</html>
"#,
        title = page.title,
        published = page.published,
        updated = page.updated,
    )
}
