//! Index page scraper
//!
//! Fetches the remote HTML index for a (type, year) pair and yields candidate
//! records: identifier fields plus source URL, no body yet. Scraping is
//! single-shot per (type, year); network or parse failures propagate to the
//! caller rather than being retried here.

use crate::config::IngestConfig;
use crate::message::codec::{parse_message_uri_with, CodeRegistry};
use crate::message::{IngestError, Result};
use navsearch_common::types::{MessageRecord, MessageType};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Document extension listed on the index pages
const DOC_EXTENSION: &str = ".txt";

/// Scraper for message index pages
pub struct IndexScraper {
    client: Client,
    domain: String,
    registry: CodeRegistry,
}

impl IndexScraper {
    /// Create a new scraper from configuration
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("navy-search-populate/0.1")
            .build()?;

        Ok(Self {
            client,
            domain: config.domain.trim_end_matches('/').to_string(),
            registry: CodeRegistry::default(),
        })
    }

    /// URL of the index page for a (type, year) pair
    pub fn index_url(&self, message_type: MessageType, year: &str) -> String {
        let t = message_type.as_str();
        format!(
            "{}/bupers-npc/reference/messages/{}S/Pages/{}20{}.aspx",
            self.domain, t, t, year
        )
    }

    /// Scrape one year's index into candidate records.
    ///
    /// Accepts a 2- or 4-digit year and normalizes to the trailing two
    /// digits. Anchors whose href does not end in the document extension,
    /// and paths with unknown source codes, are skipped.
    pub async fn scrape(
        &self,
        message_type: MessageType,
        year: &str,
    ) -> Result<Vec<MessageRecord>> {
        let year = normalize_year(year)?;
        let url = self.index_url(message_type, &year);

        debug!(%url, "Fetching message index page");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::Scrape(format!(
                "Index page {} returned {}",
                url,
                response.status()
            )));
        }
        let html = response.text().await?;

        let records = self.extract_candidates(&html);

        info!(
            message_type = %message_type,
            year = %year,
            count = records.len(),
            "Scraped index page"
        );

        Ok(records)
    }

    /// Extract candidate records from index page HTML
    fn extract_candidates(&self, html: &str) -> Vec<MessageRecord> {
        let document = Html::parse_document(html);

        // The anchor selector is a literal and always parses
        #[allow(clippy::expect_used)]
        let link_selector = Selector::parse("a").expect("valid anchor selector");

        let mut records = Vec::new();

        for element in document.select(&link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !href.ends_with(DOC_EXTENSION) {
                continue;
            }

            let path = self.strip_domain(href);
            match parse_message_uri_with(path, &self.domain, &self.registry) {
                Some(record) => records.push(record),
                None => {
                    debug!(href = %href, "Skipping link with unknown source code");
                },
            }
        }

        records
    }

    /// Reduce an href to the path below the source domain.
    ///
    /// Index pages link with absolute URLs on the source domain; relative
    /// links are kept as-is.
    fn strip_domain<'a>(&self, href: &'a str) -> &'a str {
        if let Some(path) = href.strip_prefix(&self.domain) {
            return path;
        }
        if let Some((_, path)) = href.split_once("mil") {
            if path.starts_with('/') {
                return path;
            }
        }
        href
    }
}

/// Normalize a year argument to its trailing two digits
pub(crate) fn normalize_year(year: &str) -> Result<String> {
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(IngestError::Validation(format!(
            "Year must be numeric: {}",
            year
        )));
    }
    match year.len() {
        2 => Ok(year.to_string()),
        4 => Ok(year[2..].to_string()),
        _ => Err(IngestError::Validation(format!(
            "Year must be 2 or 4 digits: {}",
            year
        ))),
    }
}
