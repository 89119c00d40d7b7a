use crate::app::predict_use_case::PredictUseCase;
use crate::constants::NO_PREDICTION;
use crate::error::{PredictorError, Result};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub predicted: usize,
    pub skipped: usize,
}

/// Use case for predicting the best address for every row of a contacts file
pub struct BatchUseCase {
    predict: PredictUseCase,
}

impl BatchUseCase {
    pub fn new(predict: PredictUseCase) -> Self {
        Self { predict }
    }

    /// Reads `first,last,domain` rows (header skipped) and writes one output
    /// row per contact with the top prediction and its confidence.
    pub async fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<BatchSummary> {
        let input = input.as_ref();
        if !input.exists() {
            return Err(PredictorError::NotFound(format!("CSV file not found: {}", input.display())));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(input)?;
        let mut writer = csv::Writer::from_path(output.as_ref())?;
        writer.write_record(["First Name", "Last Name", "Domain", "Predicted Email", "Confidence"])?;

        let mut summary = BatchSummary::default();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable row: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };
            if record.len() < 3 {
                let err = PredictorError::MalformedRow {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    reason: format!("expected 3 columns, found {}", record.len()),
                };
                warn!("Skipping row: {}", err);
                summary.skipped += 1;
                continue;
            }

            let (first, last, domain) = (&record[0], &record[1], &record[2]);
            match self.predict.best(first, last, domain).await {
                Some(best) => {
                    let confidence = format!("{:.2}", best.confidence);
                    writer.write_record([first, last, domain, best.email.as_str(), confidence.as_str()])?;
                    summary.predicted += 1;
                }
                None => {
                    writer.write_record([first, last, domain, NO_PREDICTION, "0.00"])?;
                }
            }
            summary.processed += 1;
            info!("Processed: {} {} at {}", first, last, domain);
        }
        writer.flush()?;

        info!(
            "Batch complete: {} processed, {} predicted, {} skipped",
            summary.processed, summary.predicted, summary.skipped
        );
        Ok(summary)
    }
}
