use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::config::CatalogConfig;

const CATALOG_USER_AGENT: &str = "bookscout/0.1";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {url}: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url}: HTTP {status}")]
    Status { url: Url, status: StatusCode },
}

/// HTTP access to the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build catalog http client: {err}"))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/ebooks/{id}` with `id` as a single encoded path segment.
    pub fn book_page_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("ebooks").push(id);
        }
        url
    }

    /// Resolves `href` against the catalog base; absolute hrefs pass through.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.base_url.join(href).ok()
    }

    pub async fn fetch_book_page(&self, id: &str) -> Result<String, FetchError> {
        let url = self.book_page_url(id);
        self.get_text(&url, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .await
    }

    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        self.get_text(url, "text/plain,text/html;q=0.9,*/*;q=0.8")
            .await
    }

    async fn get_text(&self, url: &Url, accept: &'static str) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "catalog fetch");
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, CATALOG_USER_AGENT)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        response.text().await.map_err(transport)
    }
}
