use crate::error::Result;
use crate::harvester::{classify_and_record, Harvester};
use crate::storage::PatternStore;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub emails: Vec<String>,
    pub recorded: usize,
}

/// Use case for crawling a domain and feeding what it finds into the store
pub struct HarvestUseCase {
    harvester: Harvester,
    store: Arc<dyn PatternStore>,
}

impl HarvestUseCase {
    pub fn new(harvester: Harvester, store: Arc<dyn PatternStore>) -> Self {
        Self { harvester, store }
    }

    pub async fn scrape_domain(&self, domain: &str) -> Result<HarvestReport> {
        let emails = self.harvester.harvest_domain(domain).await;
        self.record(emails).await
    }

    /// Same as `scrape_domain` against an explicit base URL.
    pub async fn scrape_site(&self, base_url: &str) -> Result<HarvestReport> {
        let emails = self.harvester.harvest_site(base_url).await;
        self.record(emails).await
    }

    async fn record(&self, emails: std::collections::BTreeSet<String>) -> Result<HarvestReport> {
        let recorded = if emails.is_empty() {
            0
        } else {
            classify_and_record(&emails, self.store.as_ref()).await?
        };
        info!("Harvest stored {} observations from {} addresses", recorded, emails.len());
        Ok(HarvestReport {
            emails: emails.into_iter().collect(),
            recorded,
        })
    }
}
