use crate::patterns::PatternKind;
use serde::{Deserialize, Serialize};

/// A generated address and the name parts it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pattern: Option<PatternKind>,
    pub email: String,
    pub first: String,
    pub last: String,
    pub domain: String,
}

impl Candidate {
    pub fn from_email(email: impl Into<String>) -> Self {
        let email = email.into();
        let domain = domain_of(&email).unwrap_or_default();
        Self {
            pattern: None,
            email,
            first: String::new(),
            last: String::new(),
            domain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub email: String,
    pub confidence: f64,
}

/// One persisted (domain, pattern) aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPatternObservation {
    pub domain: String,
    pub pattern: PatternKind,
    pub count: u64,
}

/// A labeled row from a training file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownEmail {
    pub first: String,
    pub last: String,
    pub email: String,
}

/// Lowercased domain part of an address, if it has exactly one usable `@`.
pub fn domain_of(email: &str) -> Option<String> {
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(domain.trim().to_lowercase())
}

/// Local part of an address (everything before the first `@`).
pub fn local_part_of(email: &str) -> &str {
    email.split('@').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("Jane.Doe@Acme.COM"), Some("acme.com".to_string()));
        assert_eq!(domain_of("no-at-sign"), None);
        assert_eq!(domain_of("@acme.com"), None);
        assert_eq!(domain_of("a@b@c.com"), None);
    }

    #[test]
    fn test_local_part_of() {
        assert_eq!(local_part_of("jane.doe@acme.com"), "jane.doe");
        assert_eq!(local_part_of("plain"), "plain");
    }
}
