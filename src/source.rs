//! Journal document sources.
//!
//! A [`JournalSource`] lists the journal documents of a chamber and session
//! and retrieves each one as plain text. [`HttpJournalSource`] scrapes the
//! legislature's journal index page; [`DirectorySource`] reads text files
//! that were converted ahead of time.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{FetchError, ScrapeError};
use crate::journal::{Chamber, SourceLocators};

/// Raw journals are published as PDF; only converted text can be parsed.
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Where journal text comes from.
#[allow(async_fn_in_trait)]
pub trait JournalSource {
    /// Journal documents for a chamber and session, in publication order.
    async fn list_documents(
        &self,
        chamber: Chamber,
        session: &str,
    ) -> Result<Vec<SourceLocators>, ScrapeError>;

    /// Plain text of one document.
    async fn fetch_text(&self, locators: &SourceLocators) -> Result<String, FetchError>;
}

/// Lists journals from the legislature's index page and downloads them.
pub struct HttpJournalSource {
    client: Client,
    config: ScraperConfig,
}

impl HttpJournalSource {
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let network = |source| FetchError::Network {
            locator: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                locator: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with(PDF_CONTENT_TYPE) {
            return Err(FetchError::NotText {
                locator: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
        response.text().await.map_err(network)
    }
}

impl JournalSource for HttpJournalSource {
    async fn list_documents(
        &self,
        chamber: Chamber,
        session: &str,
    ) -> Result<Vec<SourceLocators>, ScrapeError> {
        let index = self.config.index_url(chamber, session)?;
        let html = self.get_text(&index).await?;
        let links = document_links(&html, &index, &self.config.document_link_filter);
        debug!(index = %index, documents = links.len(), "listed journal documents");

        Ok(links
            .into_iter()
            .map(|document| SourceLocators {
                document,
                index: index.clone(),
            })
            .collect())
    }

    async fn fetch_text(&self, locators: &SourceLocators) -> Result<String, FetchError> {
        self.get_text(&locators.document).await
    }
}

/// Absolute URLs of `<a href>` links containing `filter`, in page order,
/// without duplicates.
pub fn document_links(html: &str, base: &str, filter: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("valid selector");
    let base = Url::parse(base).ok();

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(filter))
        .map(|href| match &base {
            Some(base) => base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        })
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Reads pre-converted `*.txt` journals from a local directory.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl JournalSource for DirectorySource {
    async fn list_documents(
        &self,
        _chamber: Chamber,
        _session: &str,
    ) -> Result<Vec<SourceLocators>, ScrapeError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let index = self.dir.display().to_string();
        Ok(paths
            .into_iter()
            .map(|path| SourceLocators {
                document: path.display().to_string(),
                index: index.clone(),
            })
            .collect())
    }

    async fn fetch_text(&self, locators: &SourceLocators) -> Result<String, FetchError> {
        tokio::fs::read_to_string(&locators.document)
            .await
            .map_err(|source| FetchError::Io {
                locator: locators.document.clone(),
                source,
            })
    }
}
