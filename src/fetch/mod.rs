// src/fetch/mod.rs

pub mod index;
pub mod page;

pub use index::{parse_country_list, CountryLink};
pub use page::{heading_rules, parse_country_page, HeadingRule};

use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::{path::Path, time::Duration};
use tokio::time::sleep;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{REQUEST_TIMEOUT, SCRAPE_SOURCE, SCRAPE_VERSION, USER_AGENT};
use crate::corpus::{write_document, Accumulator, AggregateOutputDocument, RunStats};
use crate::record::{BuildOutcome, NormalizedCountryRecord};

/// Fixed pause between successive requests; the first goes out at once.
#[derive(Debug)]
struct Pacer {
    delay: Duration,
    primed: bool,
}

impl Pacer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    /// Wait until the next request may be sent.
    async fn ready(&mut self) {
        if self.primed && !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.primed = true;
    }
}

/// Sequential scraper for the live Factbook site.
pub struct Scraper {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl Scraper {
    /// `base_url` is the Factbook root (e.g. `https://www.cia.gov/the-world-factbook`).
    pub fn new(base_url: impl Into<String>, delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            delay,
        })
    }

    pub fn index_url(&self) -> String {
        format!("{}/countries", self.base_url)
    }

    async fn get_text(&self, url: &Url) -> Result<String> {
        debug!("Fetching text from {}", url);
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .text()
            .await
            .with_context(|| format!("Reading text from {}", url))
    }

    /// Fetch and parse the country index. Any failure here is fatal.
    #[instrument(level = "info", skip(self))]
    pub async fn country_list(&self) -> Result<Vec<CountryLink>> {
        let index = Url::parse(&self.index_url())
            .with_context(|| format!("invalid index URL {}", self.index_url()))?;
        let html = self.get_text(&index).await?;
        let links = parse_country_list(&html, &self.base_url);
        info!(count = links.len(), "found countries");
        Ok(links)
    }

    /// Fetch one detail page and build its record.
    pub async fn scrape_country(&self, link: &CountryLink) -> Result<NormalizedCountryRecord> {
        let html = self.get_text(&link.url).await?;
        Ok(parse_country_page(&html, &link.slug, &link.name))
    }

    /// Scrape every listed country (or the first `limit`; `Some(0)` means no
    /// limit), one at a time, sleeping the fixed delay between detail fetches.
    #[instrument(level = "info", skip(self))]
    pub async fn scrape_all(&self, limit: Option<usize>) -> Result<Accumulator> {
        let mut countries = self.country_list().await?;
        if countries.is_empty() {
            bail!("no countries found at {}", self.index_url());
        }
        if let Some(n) = limit.filter(|n| *n > 0) {
            countries.truncate(n);
            info!(limit = n, "limited country list");
        }

        let total = countries.len();
        info!(
            total,
            "scraping; ~{}s at {:?} between requests",
            self.delay.as_secs() * total.saturating_sub(1) as u64,
            self.delay
        );

        let mut acc = Accumulator::new();
        acc.discovered(total);
        let mut pacer = Pacer::new(self.delay);
        for (i, link) in countries.iter().enumerate() {
            pacer.ready().await;
            info!("[{}/{}] {}", i + 1, total, link.name);
            let result = self
                .scrape_country(link)
                .await
                .map(BuildOutcome::Built)
                .with_context(|| format!("scraping {}", link.name));
            acc.record(&link.slug, result);
        }
        Ok(acc)
    }
}

/// Scrape the site and write the aggregate to `output`.
pub async fn scrape_to_file(
    scraper: &Scraper,
    limit: Option<usize>,
    output: &Path,
) -> Result<(AggregateOutputDocument, RunStats)> {
    let acc = scraper.scrape_all(limit).await?;
    let (doc, stats) = acc.into_document(SCRAPE_VERSION, SCRAPE_SOURCE);
    let bytes = write_document(output, &doc)?;
    info!(
        scraped = doc.countries.len(),
        errors = stats.errors,
        path = %output.display(),
        "saved {:.1} KB",
        bytes as f64 / 1024.0
    );
    Ok((doc, stats))
}
