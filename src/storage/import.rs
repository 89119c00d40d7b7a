//! Bulk import of labeled (first, last, email) rows and export of the
//! aggregated counts.
//!
//! Import has partial-success semantics: a missing file aborts, but a bad row
//! only skips that row.

use super::PatternStore;
use crate::error::{PredictorError, Result};
use crate::observability::metrics;
use crate::patterns::detect_pattern;
use crate::types::{domain_of, KnownEmail};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows whose address matched a template and was recorded.
    pub recorded: usize,
    /// Well-formed rows whose address matches no template.
    pub unmatched: usize,
    /// Rows skipped for missing columns, a bad address or a decode error.
    pub malformed: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.recorded + self.unmatched + self.malformed
    }
}

/// Records the detected template for each row. Rows with no matching
/// template are skipped silently; rows without a usable address count as
/// malformed.
pub async fn import_records(store: &dyn PatternStore, records: &[KnownEmail]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for (idx, record) in records.iter().enumerate() {
        import_one(store, record, idx as u64 + 1, &mut summary).await?;
    }
    Ok(summary)
}

async fn import_one(
    store: &dyn PatternStore,
    record: &KnownEmail,
    line: u64,
    summary: &mut ImportSummary,
) -> Result<()> {
    let email = record.email.trim().to_lowercase();
    let Some(domain) = domain_of(&email) else {
        let err = PredictorError::MalformedRow {
            line,
            reason: format!("'{}' is not an email address", record.email),
        };
        warn!("Skipping row: {}", err);
        metrics::store::import_row_skipped("malformed");
        summary.malformed += 1;
        return Ok(());
    };

    match detect_pattern(&record.first, &record.last, &email) {
        Some(pattern) => {
            store.record(&domain, pattern).await?;
            metrics::store::observation_recorded("import");
            summary.recorded += 1;
        }
        None => {
            debug!("No template matches {} for {} {}", email, record.first, record.last);
            metrics::store::import_row_skipped("unmatched");
            summary.unmatched += 1;
        }
    }
    Ok(())
}

/// Imports a delimited file of `first,last,email` rows. The header row is
/// skipped and extra columns are ignored.
pub async fn import_csv<P: AsRef<Path>>(store: &dyn PatternStore, path: P) -> Result<ImportSummary> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PredictorError::NotFound(format!("CSV file not found: {}", path.display())));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut summary = ImportSummary::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!("Skipping row: {}", PredictorError::MalformedRow { line, reason: e.to_string() });
                metrics::store::import_row_skipped("malformed");
                summary.malformed += 1;
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() < 3 {
            let err = PredictorError::MalformedRow {
                line,
                reason: format!("expected 3 columns, found {}", record.len()),
            };
            warn!("Skipping row: {}", err);
            metrics::store::import_row_skipped("malformed");
            summary.malformed += 1;
            continue;
        }

        let known = KnownEmail {
            first: record[0].to_string(),
            last: record[1].to_string(),
            email: record[2].to_string(),
        };
        import_one(store, &known, line, &mut summary).await?;
    }

    info!(
        "Imported {}: {} recorded, {} unmatched, {} malformed",
        path.display(),
        summary.recorded,
        summary.unmatched,
        summary.malformed
    );
    Ok(summary)
}

/// Writes every stored observation as `domain,pattern,count`. Returns the
/// number of rows written.
pub async fn export_csv<P: AsRef<Path>>(store: &dyn PatternStore, path: P) -> Result<usize> {
    let observations = store.observations().await?;
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["domain", "pattern", "count"])?;
    for observation in &observations {
        let count = observation.count.to_string();
        writer.write_record([observation.domain.as_str(), observation.pattern.as_str(), count.as_str()])?;
    }
    writer.flush()?;

    info!("Exported {} observations to {}", observations.len(), path.as_ref().display());
    Ok(observations.len())
}
