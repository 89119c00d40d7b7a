use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed row {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error classes surfaced to the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedInput,
    Network,
    Parse,
    Storage,
    Config,
}

impl PredictorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictorError::NotFound(_) => ErrorKind::NotFound,
            PredictorError::MalformedRow { .. } | PredictorError::Csv(_) => ErrorKind::MalformedInput,
            PredictorError::NetworkUnavailable(_) => ErrorKind::Network,
            PredictorError::ParseFailure(_) => ErrorKind::Parse,
            PredictorError::Database(_) | PredictorError::Io(_) => ErrorKind::Storage,
            PredictorError::Toml(_) | PredictorError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::NotFound => 2,
            ErrorKind::MalformedInput => 3,
            ErrorKind::Network => 4,
            ErrorKind::Parse => 5,
            ErrorKind::Storage => 6,
            ErrorKind::Config => 7,
        }
    }
}

impl From<reqwest::Error> for PredictorError {
    fn from(err: reqwest::Error) -> Self {
        PredictorError::NetworkUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
