use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use email_predictor::app::{BatchUseCase, HarvestUseCase, PredictUseCase};
use email_predictor::config::Config;
use email_predictor::constants::{DNS_TIMEOUT_SECONDS, SCRAPE_PREVIEW_LIMIT};
use email_predictor::error::{PredictorError, Result};
use email_predictor::harvester::Harvester;
use email_predictor::infra::dns::MxDomainValidity;
use email_predictor::infra::http_client::ReqwestHttp;
use email_predictor::logging;
use email_predictor::observability::metrics;
use email_predictor::storage::{self, PatternStore, SqlitePatternStore};

#[derive(Parser)]
#[command(name = "email_predictor")]
#[command(about = "Predict likely email addresses from observed domain patterns")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict email addresses for one person
    Predict {
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        #[arg(long)]
        domain: String,
        /// Number of top predictions to show
        #[arg(long)]
        top: Option<usize>,
        /// Print the ranked predictions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Learn patterns from a CSV of known addresses (first,last,email)
    Train {
        #[arg(long)]
        file: PathBuf,
    },
    /// Predict the best address for every contact in a CSV (first,last,domain)
    Batch {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Harvest addresses from an organization's public pages
    Scrape {
        #[arg(long)]
        domain: String,
        /// Delay between requests in seconds
        #[arg(long, value_parser = parse_delay)]
        delay: Option<f64>,
    },
    /// Show the stored pattern counts for a domain
    Patterns {
        #[arg(long)]
        domain: String,
    },
    /// Export every stored observation to CSV
    Export {
        #[arg(long)]
        output: PathBuf,
    },
}

fn parse_delay(raw: &str) -> std::result::Result<f64, String> {
    let seconds: f64 = raw.parse().map_err(|_| format!("'{}' is not a number", raw))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err("delay must be a non-negative number of seconds".to_string());
    }
    Ok(seconds)
}

fn open_store(config: &Config) -> Result<Arc<dyn PatternStore>> {
    let store: Arc<dyn PatternStore> = Arc::new(SqlitePatternStore::open(&config.storage.db_path)?);
    Ok(store)
}

fn predict_use_case(config: &Config) -> Result<PredictUseCase> {
    let validity = Arc::new(MxDomainValidity::new(Duration::from_secs(DNS_TIMEOUT_SECONDS)));
    Ok(PredictUseCase::new(open_store(config)?, validity))
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Predict { first, last, domain, top, json } => {
            let top = top.unwrap_or(config.predict.top);
            let use_case = predict_use_case(&config)?;
            let ranked = use_case.predict_top(&first, &last, &domain, top).await;
            if json {
                let rendered = serde_json::to_string_pretty(&ranked)
                    .map_err(|e| PredictorError::ParseFailure(e.to_string()))?;
                println!("{}", rendered);
                return Ok(());
            }

            println!("Top predictions for {} {} at {}:", first, last, domain);
            if ranked.is_empty() {
                println!("   (none)");
            }
            for (i, candidate) in ranked.iter().enumerate() {
                println!("{}. {} (Confidence: {:.2})", i + 1, candidate.email, candidate.confidence);
            }
        }
        Commands::Train { file } => {
            println!("Training on file: {}", file.display());
            let store = open_store(&config)?;
            let summary = storage::import_csv(store.as_ref(), &file).await?;
            println!(
                "Training completed: {} recorded, {} unmatched, {} malformed",
                summary.recorded, summary.unmatched, summary.malformed
            );
        }
        Commands::Batch { file, output } => {
            let use_case = BatchUseCase::new(predict_use_case(&config)?);
            let summary = use_case.run(&file, &output).await?;
            println!(
                "Batch processing completed ({} contacts, {} skipped). Results saved to {}",
                summary.processed,
                summary.skipped,
                output.display()
            );
        }
        Commands::Scrape { domain, delay } => {
            let delay = delay.map(Duration::from_secs_f64).unwrap_or_else(|| config.harvester.delay());
            let http = Arc::new(ReqwestHttp::new(&config.harvester.user_agent, config.harvester.timeout())?);
            let harvester = Harvester::new(http)
                .with_pages(config.harvester.pages.clone())
                .with_delay(delay);
            let use_case = HarvestUseCase::new(harvester, open_store(&config)?);

            println!("Scraping domain: {}", domain);
            let report = use_case.scrape_domain(&domain).await?;
            if report.emails.is_empty() {
                println!("No email addresses found.");
            } else {
                println!("Found {} email addresses:", report.emails.len());
                for email in report.emails.iter().take(SCRAPE_PREVIEW_LIMIT) {
                    println!("  - {}", email);
                }
                if report.emails.len() > SCRAPE_PREVIEW_LIMIT {
                    println!("  ... and {} more", report.emails.len() - SCRAPE_PREVIEW_LIMIT);
                }
                println!("Stored {} pattern observations.", report.recorded);
            }
        }
        Commands::Patterns { domain } => {
            let store = open_store(&config)?;
            let table = store.lookup(&domain).await?;
            if table.is_empty() {
                println!("No patterns recorded for {}", domain);
            }
            for (pattern, count) in table {
                println!("{:<12} {}", pattern.as_str(), count);
            }
        }
        Commands::Export { output } => {
            let store = open_store(&config)?;
            let written = storage::export_csv(store.as_ref(), &output).await?;
            println!("Exported {} observations to {}", written, output.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    logging::init_logging();
    metrics::describe_all();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            println!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    info!("Using pattern store at {}", config.storage.db_path);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            println!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
