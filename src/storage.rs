use crate::error::Result;
use crate::patterns::PatternKind;
use crate::types::DomainPatternObservation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

pub mod import;
pub mod sqlite;

pub use import::{export_csv, import_csv, import_records, ImportSummary};
pub use sqlite::SqlitePatternStore;

/// Per-domain pattern frequencies, highest count first.
pub type FrequencyTable = Vec<(PatternKind, u64)>;

/// Counting map from (domain, pattern) to the number of times it was observed.
///
/// Domains are lowercased before every key lookup. At most one entry exists
/// per (domain, pattern); repeated observations bump its count.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Adds one observation and returns the new count for the pair.
    async fn record(&self, domain: &str, pattern: PatternKind) -> Result<u64>;

    /// Observed patterns for a domain, sorted by count descending. Empty
    /// when the domain has never been seen.
    async fn lookup(&self, domain: &str) -> Result<FrequencyTable>;

    /// Every stored observation, domain ascending then count descending.
    async fn observations(&self) -> Result<Vec<DomainPatternObservation>>;
}

pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

/// Count descending; ties fall back to catalog order so output is stable.
pub fn sort_frequency_table(table: &mut FrequencyTable) {
    table.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.catalog_index().cmp(&b.0.catalog_index())));
}

fn sort_observations(observations: &mut [DomainPatternObservation]) {
    observations.sort_by(|a, b| {
        a.domain
            .cmp(&b.domain)
            .then(b.count.cmp(&a.count))
            .then(a.pattern.catalog_index().cmp(&b.pattern.catalog_index()))
    });
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory store for tests and dry runs
#[derive(Clone, Default)]
pub struct InMemoryPatternStore {
    counts: Arc<Mutex<HashMap<(String, PatternKind), u64>>>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    async fn record(&self, domain: &str, pattern: PatternKind) -> Result<u64> {
        let domain = normalize_domain(domain);
        let mut counts = lock(&self.counts);
        let count = counts.entry((domain.clone(), pattern)).or_insert(0);
        *count += 1;

        debug!("Recorded {} for {} (count {})", pattern, domain, count);
        Ok(*count)
    }

    async fn lookup(&self, domain: &str) -> Result<FrequencyTable> {
        let domain = normalize_domain(domain);
        let counts = lock(&self.counts);
        let mut table: FrequencyTable = counts
            .iter()
            .filter(|((d, _), _)| *d == domain)
            .map(|((_, pattern), count)| (*pattern, *count))
            .collect();
        sort_frequency_table(&mut table);
        Ok(table)
    }

    async fn observations(&self) -> Result<Vec<DomainPatternObservation>> {
        let counts = lock(&self.counts);
        let mut observations: Vec<DomainPatternObservation> = counts
            .iter()
            .map(|((domain, pattern), count)| DomainPatternObservation {
                domain: domain.clone(),
                pattern: *pattern,
                count: *count,
            })
            .collect();
        sort_observations(&mut observations);
        Ok(observations)
    }
}
