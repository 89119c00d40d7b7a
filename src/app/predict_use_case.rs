use crate::app::ports::DomainValidityPort;
use crate::patterns::generate;
use crate::ranker::rank;
use crate::storage::PatternStore;
use crate::types::RankedCandidate;
use std::sync::Arc;
use tracing::info;

/// Use case for predicting addresses for one person
pub struct PredictUseCase {
    store: Arc<dyn PatternStore>,
    validity: Arc<dyn DomainValidityPort>,
}

impl PredictUseCase {
    pub fn new(store: Arc<dyn PatternStore>, validity: Arc<dyn DomainValidityPort>) -> Self {
        Self { store, validity }
    }

    /// All ranked candidates, best first.
    pub async fn predict(&self, first: &str, last: &str, domain: &str) -> Vec<RankedCandidate> {
        let candidates = generate(first, last, domain);
        let ranked = rank(&candidates, domain, self.store.as_ref(), self.validity.as_ref()).await;
        info!(
            "Ranked {} candidates for {} {} at {}",
            ranked.len(),
            first,
            last,
            domain
        );
        ranked
    }

    pub async fn predict_top(&self, first: &str, last: &str, domain: &str, top: usize) -> Vec<RankedCandidate> {
        let mut ranked = self.predict(first, last, domain).await;
        ranked.truncate(top);
        ranked
    }

    pub async fn best(&self, first: &str, last: &str, domain: &str) -> Option<RankedCandidate> {
        self.predict(first, last, domain).await.into_iter().next()
    }
}
