/// Shared defaults and scoring constants used across the predictor

// Storage
pub const DEFAULT_DB_PATH: &str = "email_patterns.db";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DB_PATH_ENV: &str = "EMAIL_PREDICTOR_DB";
pub const CONFIG_PATH_ENV: &str = "EMAIL_PREDICTOR_CONFIG";

// Scoring
/// Score assigned when no template weight is available for a candidate.
pub const UNKNOWN_PATTERN_CONFIDENCE: f64 = 0.3;
pub const VALID_DOMAIN_MULTIPLIER: f64 = 1.2;
pub const INVALID_DOMAIN_MULTIPLIER: f64 = 0.5;
/// Nothing here is ground truth, so confidence never reaches 1.0.
pub const MAX_CONFIDENCE: f64 = 0.95;
pub const DNS_TIMEOUT_SECONDS: u64 = 5;

// Harvesting
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Pages where organizations tend to publish contact addresses. The empty
/// path is the home page.
pub const DEFAULT_PAGES: &[&str] = &[
    "",
    "contact",
    "about",
    "team",
    "about-us",
    "contact-us",
    "our-team",
    "leadership",
    "staff",
    "people",
];

// Output
pub const DEFAULT_TOP: usize = 3;
pub const NO_PREDICTION: &str = "No prediction";
pub const SCRAPE_PREVIEW_LIMIT: usize = 10;
