use crate::config::{FetchConfig, ListingConfig};
use crate::error::FetchError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .with_context(|| format!("invalid user agent {}", config.user_agent))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let failure = |source: reqwest::Error| FetchError::FetchFailure {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(failure)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().map_err(failure)?;
        debug!(%url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }
}

impl PageSource for StaticPageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

pub fn listing_page_urls(listing: &ListingConfig) -> Result<Vec<String>> {
    (listing.first_page..=listing.last_page)
        .map(|page| build_paged_url(&listing.base_url, &listing.page_param, &page.to_string()))
        .collect()
}

pub fn build_paged_url(base_url: &str, param: &str, page: &str) -> Result<String> {
    let mut url = Url::parse(base_url).with_context(|| format!("invalid base_url {base_url}"))?;

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    match pairs.iter().position(|(k, _)| k == param) {
        Some(idx) => pairs[idx].1 = page.to_string(),
        None => pairs.push((param.to_string(), page.to_string())),
    }

    {
        let mut qp = url.query_pairs_mut();
        qp.clear();
        for (k, v) in pairs {
            qp.append_pair(&k, &v);
        }
    }

    Ok(url.to_string())
}
