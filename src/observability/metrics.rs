//! Metrics for the predictor, recorded through the `metrics` facade.
//!
//! No recorder is installed by the library; an embedding process that wants
//! Prometheus output installs its own exporter and these calls start counting.

use metrics::Unit;
use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Harvester metrics
    HarvestPagesFetched,
    HarvestPagesFailed,
    HarvestEmailsExtracted,
    HarvestFetchDuration,

    // Store metrics
    StoreObservationsRecorded,
    StoreImportRowsSkipped,

    // Ranker metrics
    RankerCandidatesRanked,
    RankerCandidatesRejected,
    RankerTopConfidence,

    // Domain validity metrics
    DomainChecksValid,
    DomainChecksInvalid,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::HarvestPagesFetched => "email_predictor_harvest_pages_fetched_total",
            MetricName::HarvestPagesFailed => "email_predictor_harvest_pages_failed_total",
            MetricName::HarvestEmailsExtracted => "email_predictor_harvest_emails_extracted_total",
            MetricName::HarvestFetchDuration => "email_predictor_harvest_fetch_duration_seconds",

            MetricName::StoreObservationsRecorded => "email_predictor_store_observations_recorded_total",
            MetricName::StoreImportRowsSkipped => "email_predictor_store_import_rows_skipped_total",

            MetricName::RankerCandidatesRanked => "email_predictor_ranker_candidates_ranked_total",
            MetricName::RankerCandidatesRejected => "email_predictor_ranker_candidates_rejected_total",
            MetricName::RankerTopConfidence => "email_predictor_ranker_top_confidence",

            MetricName::DomainChecksValid => "email_predictor_domain_checks_valid_total",
            MetricName::DomainChecksInvalid => "email_predictor_domain_checks_invalid_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            HarvestPagesFetched,
            HarvestPagesFailed,
            HarvestEmailsExtracted,
            HarvestFetchDuration,
            StoreObservationsRecorded,
            StoreImportRowsSkipped,
            RankerCandidatesRanked,
            RankerCandidatesRejected,
            RankerTopConfidence,
            DomainChecksValid,
            DomainChecksInvalid,
        ]
        .into_iter()
    }

    pub fn is_histogram(&self) -> bool {
        matches!(self, MetricName::HarvestFetchDuration | MetricName::RankerTopConfidence)
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricName::HarvestPagesFetched => "Pages fetched successfully",
            MetricName::HarvestPagesFailed => "Page fetches that failed",
            MetricName::HarvestEmailsExtracted => "Addresses extracted from pages",
            MetricName::HarvestFetchDuration => "Page fetch duration",

            MetricName::StoreObservationsRecorded => "Pattern observations recorded",
            MetricName::StoreImportRowsSkipped => "Import rows skipped",

            MetricName::RankerCandidatesRanked => "Candidates scored",
            MetricName::RankerCandidatesRejected => "Candidates rejected by syntax check",
            MetricName::RankerTopConfidence => "Confidence of the best candidate",

            MetricName::DomainChecksValid => "Domains with MX records",
            MetricName::DomainChecksInvalid => "Domains without MX records or unreachable",
        }
    }

    pub fn unit(&self) -> Option<Unit> {
        match self {
            MetricName::HarvestFetchDuration => Some(Unit::Seconds),
            _ => None,
        }
    }
}

/// Registers descriptions for every metric with whatever recorder is
/// installed. A no-op without one.
pub fn describe_all() {
    for metric in MetricName::all_metrics() {
        let name = metric.as_str();
        let description = metric.description();
        match (metric.is_histogram(), metric.unit()) {
            (true, Some(unit)) => metrics::describe_histogram!(name, unit, description),
            (true, None) => metrics::describe_histogram!(name, description),
            (false, _) => metrics::describe_counter!(name, description),
        }
    }
}

pub mod harvest {
    use super::MetricName;

    pub fn page_fetched(duration_secs: f64) {
        metrics::counter!(MetricName::HarvestPagesFetched.as_str()).increment(1);
        metrics::histogram!(MetricName::HarvestFetchDuration.as_str()).record(duration_secs);
    }

    pub fn page_failed() {
        metrics::counter!(MetricName::HarvestPagesFailed.as_str()).increment(1);
    }

    pub fn emails_extracted(count: usize) {
        metrics::counter!(MetricName::HarvestEmailsExtracted.as_str()).increment(count as u64);
    }
}

pub mod store {
    use super::MetricName;

    /// `source` is "import" or "harvest".
    pub fn observation_recorded(source: &'static str) {
        metrics::counter!(MetricName::StoreObservationsRecorded.as_str(), "source" => source).increment(1);
    }

    pub fn import_row_skipped(reason: &'static str) {
        metrics::counter!(MetricName::StoreImportRowsSkipped.as_str(), "reason" => reason).increment(1);
    }
}

pub mod ranker {
    use super::MetricName;

    pub fn candidates_ranked(ranked: usize, rejected: usize) {
        metrics::counter!(MetricName::RankerCandidatesRanked.as_str()).increment(ranked as u64);
        metrics::counter!(MetricName::RankerCandidatesRejected.as_str()).increment(rejected as u64);
    }

    pub fn top_confidence(confidence: f64) {
        metrics::histogram!(MetricName::RankerTopConfidence.as_str()).record(confidence);
    }
}

pub mod domain {
    use super::MetricName;

    pub fn checked(valid: bool) {
        let name = if valid {
            MetricName::DomainChecksValid
        } else {
            MetricName::DomainChecksInvalid
        };
        metrics::counter!(name.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_unique_and_prefixed() {
        let names: HashSet<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
        assert!(names.iter().all(|n| n.starts_with("email_predictor_")));
    }

    #[test]
    fn test_histograms_and_units() {
        let histograms: Vec<MetricName> = MetricName::all_metrics().filter(|m| m.is_histogram()).collect();
        assert_eq!(histograms, vec![MetricName::HarvestFetchDuration, MetricName::RankerTopConfidence]);
        assert_eq!(MetricName::HarvestFetchDuration.unit(), Some(Unit::Seconds));
        assert!(MetricName::all_metrics().all(|m| !m.description().is_empty()));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        describe_all();
        harvest::page_fetched(0.25);
        store::observation_recorded("import");
        ranker::candidates_ranked(9, 0);
        domain::checked(false);
    }
}
