use crate::error::Result;
use async_trait::async_trait;

// Harvest-side ports
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// HTML or other text a page scan can read. PDFs and images are not.
    pub fn is_textual(&self) -> bool {
        let mime = self.content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        mime.is_empty() || mime.starts_with("text/") || mime.ends_with("+xml") || mime.ends_with("/xml")
    }
}

// Ranking-side ports

/// Outcome of a mail-exchange lookup. Failures are values, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainStatus {
    AcceptsMail { exchanges: usize },
    NoMailExchange,
    Unresolvable(String),
}

impl DomainStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, DomainStatus::AcceptsMail { exchanges } if *exchanges > 0)
    }
}

#[async_trait]
pub trait DomainValidityPort: Send + Sync {
    async fn check(&self, domain: &str) -> DomainStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_status_validity() {
        assert!(DomainStatus::AcceptsMail { exchanges: 2 }.is_valid());
        assert!(!DomainStatus::AcceptsMail { exchanges: 0 }.is_valid());
        assert!(!DomainStatus::NoMailExchange.is_valid());
        assert!(!DomainStatus::Unresolvable("timeout".into()).is_valid());
    }

    #[test]
    fn test_http_result_success_range() {
        let mut result = HttpGetResult {
            status: 204,
            body: String::new(),
            content_type: "text/html".into(),
        };
        assert!(result.is_success());
        result.status = 404;
        assert!(!result.is_success());
    }

    #[test]
    fn test_http_result_textual_content() {
        let with_type = |content_type: &str| HttpGetResult {
            status: 200,
            body: String::new(),
            content_type: content_type.into(),
        };
        assert!(with_type("text/html; charset=UTF-8").is_textual());
        assert!(with_type("TEXT/PLAIN").is_textual());
        assert!(with_type("application/xhtml+xml").is_textual());
        assert!(with_type("").is_textual());
        assert!(!with_type("application/pdf").is_textual());
        assert!(!with_type("image/png").is_textual());
    }
}
