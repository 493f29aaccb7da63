use std::time::Duration;

use anyhow::Context as _;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://www.gutenberg.org";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    /// Reads `BOOKSCOUT_CATALOG_URL` and `BOOKSCOUT_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = env_non_empty("BOOKSCOUT_CATALOG_URL")
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_owned());
        let mut config = Self::new(&raw).context("invalid BOOKSCOUT_CATALOG_URL")?;

        if let Some(raw) = env_non_empty("BOOKSCOUT_HTTP_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().with_context(|| {
                format!("invalid BOOKSCOUT_HTTP_TIMEOUT_SECS={raw:?}. expected whole seconds")
            })?;
            if secs == 0 {
                anyhow::bail!("BOOKSCOUT_HTTP_TIMEOUT_SECS must be > 0");
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct OpenaiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_chars: usize,
}

impl OpenaiConfig {
    pub fn default_temperature() -> f32 {
        0.2
    }

    pub fn default_max_chars() -> usize {
        48_000
    }

    /// Reads `OPENAI_API_KEY`; everything else comes from the caller.
    pub fn api_key_from_env() -> Option<String> {
        env_non_empty("OPENAI_API_KEY")
    }
}

/// Accepts `https://host` and `https://host/prefix`; the result always ends
/// with `/` so relative joins keep the prefix.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).with_context(|| format!("parse url: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("url must be http/https: {url}");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
