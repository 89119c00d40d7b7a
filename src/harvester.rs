use crate::app::ports::HttpClientPort;
use crate::constants::{DEFAULT_DELAY_MS, DEFAULT_PAGES};
use crate::error::{PredictorError, Result};
use crate::observability::metrics;
use crate::patterns::classify_email;
use crate::storage::PatternStore;
use crate::types::domain_of;
use crate::verification::{is_valid_syntax, EMAIL_PATTERN};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email regex is valid"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("link selector is valid"));

/// Pulls addresses out of an HTML page: anything in the visible text that
/// looks like an address, plus the targets of `mailto:` links. Results are
/// lowercased and deduplicated.
pub fn extract_emails(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut emails = BTreeSet::new();

    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    for found in EMAIL_RE.find_iter(&text) {
        emails.insert(found.as_str().to_lowercase());
    }

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if let Some(address) = mailto_address(href) {
            emails.insert(address);
        }
    }

    emails
}

/// `mailto:a@b.com?subject=hi` -> `a@b.com`
fn mailto_address(href: &str) -> Option<String> {
    let href = href.trim();
    let scheme = href.get(..7)?;
    if !scheme.eq_ignore_ascii_case("mailto:") {
        return None;
    }
    let address = href[7..].split('?').next().unwrap_or("").trim();
    if is_valid_syntax(address) {
        Some(address.to_lowercase())
    } else {
        None
    }
}

pub fn page_url(base_url: &str, page: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let page = page.trim_start_matches('/');
    if page.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, page)
    }
}

/// `HTTPS://Acme.com/` -> `acme.com`
pub fn bare_host(domain: &str) -> String {
    let domain = domain.trim().to_lowercase();
    let host = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(&domain);
    host.trim_end_matches('/').to_string()
}

/// Crawls a fixed list of likely pages on an organization's site, one at a
/// time, pausing between requests.
pub struct Harvester {
    http: Arc<dyn HttpClientPort>,
    pages: Vec<String>,
    delay: Duration,
}

impl Harvester {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self {
            http,
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }

    pub fn with_pages(mut self, pages: Vec<String>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetches a page body. Non-2xx and non-text responses are failures.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let started = Instant::now();
        let response = self.http.get(url).await?;
        if !response.is_success() {
            return Err(PredictorError::NetworkUnavailable(format!(
                "{} returned HTTP {}",
                url, response.status
            )));
        }
        if !response.is_textual() {
            return Err(PredictorError::ParseFailure(format!(
                "{} returned non-text content ({})",
                url, response.content_type
            )));
        }
        metrics::harvest::page_fetched(started.elapsed().as_secs_f64());
        Ok(response.body)
    }

    /// Addresses found on one page. Fetch failures are logged and produce an
    /// empty set.
    pub async fn fetch_and_extract(&self, url: &str) -> BTreeSet<String> {
        match self.fetch_page(url).await {
            Ok(body) => {
                let emails = extract_emails(&body);
                info!("Found {} email addresses on {}", emails.len(), url);
                metrics::harvest::emails_extracted(emails.len());
                emails
            }
            Err(e) => {
                error!("Error scraping {}: {}", url, e);
                metrics::harvest::page_failed();
                BTreeSet::new()
            }
        }
    }

    pub async fn harvest_site(&self, base_url: &str) -> BTreeSet<String> {
        let mut emails = BTreeSet::new();
        for (idx, page) in self.pages.iter().enumerate() {
            let url = page_url(base_url, page);
            info!("Scraping {}", url);
            emails.extend(self.fetch_and_extract(&url).await);

            if idx + 1 < self.pages.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        emails
    }

    /// Crawls `https://{domain}`. A scheme the caller already typed is
    /// dropped first, so `https://acme.com` and `acme.com` crawl the same
    /// URLs.
    pub async fn harvest_domain(&self, domain: &str) -> BTreeSet<String> {
        self.harvest_site(&format!("https://{}", bare_host(domain))).await
    }
}

/// Classifies each address by its separator family and records one
/// observation per address under the address's own domain. Returns the
/// number of observations written.
pub async fn classify_and_record<'a, I>(emails: I, store: &dyn PatternStore) -> Result<usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut by_domain: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for email in emails {
        match domain_of(email) {
            Some(domain) => by_domain.entry(domain).or_default().push(email.as_str()),
            None => warn!("Ignoring harvested value without a domain: {}", email),
        }
    }

    let mut recorded = 0;
    for (domain, addresses) in &by_domain {
        info!("Processing {} emails for domain {}", addresses.len(), domain);
        for email in addresses {
            let Some(pattern) = classify_email(email) else {
                continue;
            };
            store.record(domain, pattern).await?;
            metrics::store::observation_recorded("harvest");
            info!("Added pattern {} for domain {}", pattern, domain);
            recorded += 1;
        }
    }
    Ok(recorded)
}
