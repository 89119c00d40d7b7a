//! Confidence scoring for generated candidates.
//!
//! A candidate's base score is its template's share of the domain's
//! historical weight. The domain-liveness signal scales every score, and the
//! result is clamped to [0, 0.95].
//!
//! Weights: a template observed for the domain weighs its count, a template
//! never observed weighs 1. An unseen domain is therefore a uniform prior,
//! and evidence for one template never drives the others to zero.

use crate::app::ports::DomainValidityPort;
use crate::constants::{INVALID_DOMAIN_MULTIPLIER, MAX_CONFIDENCE, UNKNOWN_PATTERN_CONFIDENCE, VALID_DOMAIN_MULTIPLIER};
use crate::observability::metrics;
use crate::patterns::{classify_email, PatternKind, TEMPLATE_COUNT};
use crate::storage::{FrequencyTable, PatternStore};
use crate::types::{Candidate, RankedCandidate};
use crate::verification::is_valid_syntax;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWeights {
    weights: [u64; TEMPLATE_COUNT],
}

impl PatternWeights {
    pub fn uniform() -> Self {
        Self { weights: [1; TEMPLATE_COUNT] }
    }

    pub fn from_frequency_table(table: &FrequencyTable) -> Self {
        let mut weights = Self::uniform();
        for (pattern, count) in table {
            weights.weights[pattern.catalog_index()] = (*count).max(1);
        }
        weights
    }

    pub fn weight(&self, pattern: PatternKind) -> u64 {
        self.weights[pattern.catalog_index()]
    }

    pub fn total(&self) -> u64 {
        self.weights.iter().sum()
    }
}

pub fn domain_multiplier(domain_valid: bool) -> f64 {
    if domain_valid {
        VALID_DOMAIN_MULTIPLIER
    } else {
        INVALID_DOMAIN_MULTIPLIER
    }
}

/// Score for one address. The template is re-derived from the address
/// itself so generated and harvested addresses are classified alike.
pub fn confidence_for(email: &str, weights: &PatternWeights, domain_valid: bool) -> f64 {
    let total = weights.total();
    let base = match classify_email(email) {
        Some(pattern) if total > 0 => weights.weight(pattern) as f64 / total as f64,
        _ => UNKNOWN_PATTERN_CONFIDENCE,
    };
    (base * domain_multiplier(domain_valid)).clamp(0.0, MAX_CONFIDENCE)
}

/// Drops syntactically invalid candidates, scores the rest and sorts them by
/// confidence descending. The sort is stable, so equal scores keep
/// generation order. Templates that render the same address (one-letter
/// names, first == last) yield it once, at its highest position.
pub fn score_candidates(candidates: &[Candidate], weights: &PatternWeights, domain_valid: bool) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter(|candidate| {
            let valid = is_valid_syntax(&candidate.email);
            if !valid {
                debug!("Rejecting candidate with invalid syntax: {}", candidate.email);
            }
            valid
        })
        .map(|candidate| RankedCandidate {
            email: candidate.email.clone(),
            confidence: confidence_for(&candidate.email, weights, domain_valid),
        })
        .collect();

    let rejected = candidates.len() - ranked.len();

    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut seen = HashSet::new();
    ranked.retain(|candidate| seen.insert(candidate.email.clone()));

    metrics::ranker::candidates_ranked(ranked.len(), rejected);
    if let Some(top) = ranked.first() {
        metrics::ranker::top_confidence(top.confidence);
    }
    ranked
}

/// Ranks candidates for `domain` using the store's history and one liveness
/// check. Never fails: an unreadable store counts as no history and a failed
/// DNS check counts as an invalid domain.
pub async fn rank(
    candidates: &[Candidate],
    domain: &str,
    store: &dyn PatternStore,
    validity: &dyn DomainValidityPort,
) -> Vec<RankedCandidate> {
    let table = match store.lookup(domain).await {
        Ok(table) => table,
        Err(e) => {
            warn!("Pattern lookup failed for {}, using uniform prior: {}", domain, e);
            FrequencyTable::new()
        }
    };
    let weights = PatternWeights::from_frequency_table(&table);

    let status = validity.check(domain).await;
    let domain_valid = status.is_valid();
    debug!("Domain {} validity: {:?}", domain, status);

    score_candidates(candidates, &weights, domain_valid)
}
