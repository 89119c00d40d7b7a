//! The fixed catalog of local-part templates and the pure functions that
//! instantiate and recognise them.
//!
//! Catalog order is significant: candidate generation follows it, and it is
//! the tie-break wherever two templates would otherwise be equivalent.

use crate::types::{local_part_of, Candidate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternKind {
    #[serde(rename = "first.last")]
    FirstDotLast,
    #[serde(rename = "firstlast")]
    FirstLast,
    #[serde(rename = "first_last")]
    FirstUnderscoreLast,
    #[serde(rename = "f.last")]
    InitialDotLast,
    #[serde(rename = "flast")]
    InitialLast,
    #[serde(rename = "first.l")]
    FirstDotInitial,
    #[serde(rename = "firstl")]
    FirstInitial,
    #[serde(rename = "first")]
    First,
    #[serde(rename = "last")]
    Last,
}

/// One piece of a template's substitution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    First,
    Last,
    FirstInitial,
    LastInitial,
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct PatternTemplate {
    pub kind: PatternKind,
    pub parts: &'static [Part],
}

pub const TEMPLATE_COUNT: usize = 9;

pub static CATALOG: [PatternTemplate; TEMPLATE_COUNT] = [
    PatternTemplate { kind: PatternKind::FirstDotLast, parts: &[Part::First, Part::Literal("."), Part::Last] },
    PatternTemplate { kind: PatternKind::FirstLast, parts: &[Part::First, Part::Last] },
    PatternTemplate { kind: PatternKind::FirstUnderscoreLast, parts: &[Part::First, Part::Literal("_"), Part::Last] },
    PatternTemplate { kind: PatternKind::InitialDotLast, parts: &[Part::FirstInitial, Part::Literal("."), Part::Last] },
    PatternTemplate { kind: PatternKind::InitialLast, parts: &[Part::FirstInitial, Part::Last] },
    PatternTemplate { kind: PatternKind::FirstDotInitial, parts: &[Part::First, Part::Literal("."), Part::LastInitial] },
    PatternTemplate { kind: PatternKind::FirstInitial, parts: &[Part::First, Part::LastInitial] },
    PatternTemplate { kind: PatternKind::First, parts: &[Part::First] },
    PatternTemplate { kind: PatternKind::Last, parts: &[Part::Last] },
];

impl PatternKind {
    pub fn all() -> impl Iterator<Item = PatternKind> {
        CATALOG.iter().map(|t| t.kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::FirstDotLast => "first.last",
            PatternKind::FirstLast => "firstlast",
            PatternKind::FirstUnderscoreLast => "first_last",
            PatternKind::InitialDotLast => "f.last",
            PatternKind::InitialLast => "flast",
            PatternKind::FirstDotInitial => "first.l",
            PatternKind::FirstInitial => "firstl",
            PatternKind::First => "first",
            PatternKind::Last => "last",
        }
    }

    /// Position in the catalog. Variants are declared in catalog order.
    pub fn catalog_index(&self) -> usize {
        *self as usize
    }

    pub fn template(&self) -> &'static PatternTemplate {
        &CATALOG[self.catalog_index()]
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternKind::all()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown pattern '{}'", s))
    }
}

/// Lowercased, trimmed name parts ready for substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub first: String,
    pub last: String,
}

impl NameParts {
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.trim().to_lowercase(),
            last: last.trim().to_lowercase(),
        }
    }

    fn initial(value: &str) -> Option<String> {
        value.chars().next().map(|c| c.to_string())
    }
}

impl PatternTemplate {
    /// Builds the local part, or `None` when a required name part is empty.
    pub fn render(&self, name: &NameParts) -> Option<String> {
        let mut local = String::new();
        for part in self.parts {
            let piece = match part {
                Part::First if !name.first.is_empty() => name.first.clone(),
                Part::Last if !name.last.is_empty() => name.last.clone(),
                Part::FirstInitial => NameParts::initial(&name.first)?,
                Part::LastInitial => NameParts::initial(&name.last)?,
                Part::Literal(lit) => lit.to_string(),
                Part::First | Part::Last => return None,
            };
            local.push_str(&piece);
        }
        Some(local)
    }
}

/// Instantiates every template for the given person, in catalog order.
///
/// Templates that need an empty name part are skipped rather than producing
/// a degenerate address like `.smith@example.com`.
pub fn generate(first: &str, last: &str, domain: &str) -> Vec<Candidate> {
    let name = NameParts::new(first, last);
    let domain = domain.trim().to_lowercase();

    CATALOG
        .iter()
        .filter_map(|template| {
            let local = template.render(&name)?;
            Some(Candidate {
                pattern: Some(template.kind),
                email: format!("{}@{}", local, domain),
                first: name.first.clone(),
                last: name.last.clone(),
                domain: domain.clone(),
            })
        })
        .collect()
}

/// Finds the template whose substitution reproduces the email's local part
/// exactly. The first match in catalog order wins.
pub fn detect_pattern(first: &str, last: &str, email: &str) -> Option<PatternKind> {
    let name = NameParts::new(first, last);
    let email = email.trim().to_lowercase();
    let local = local_part_of(&email);
    if local.is_empty() {
        return None;
    }

    CATALOG
        .iter()
        .find(|template| template.render(&name).as_deref() == Some(local))
        .map(|template| template.kind)
}

/// Separator family of a local part, used when no name data is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorFamily {
    Dotted,
    Underscore,
    Concatenated,
}

impl SeparatorFamily {
    pub fn of(local: &str) -> Self {
        if local.contains('.') {
            SeparatorFamily::Dotted
        } else if local.contains('_') {
            SeparatorFamily::Underscore
        } else {
            SeparatorFamily::Concatenated
        }
    }

    /// First catalog template belonging to this family.
    pub fn representative(&self) -> PatternKind {
        match self {
            SeparatorFamily::Dotted => PatternKind::FirstDotLast,
            SeparatorFamily::Underscore => PatternKind::FirstUnderscoreLast,
            SeparatorFamily::Concatenated => PatternKind::FirstLast,
        }
    }
}

/// Coarse pattern for an address seen without name data. Shared by the
/// ranker and the harvester so scraped evidence lines up with candidates.
pub fn classify_local_part(local: &str) -> Option<PatternKind> {
    if local.is_empty() {
        return None;
    }
    Some(SeparatorFamily::of(local).representative())
}

pub fn classify_email(email: &str) -> Option<PatternKind> {
    classify_local_part(local_part_of(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_all_templates_in_order() {
        let candidates = generate("Jane", "Smith", "Example.com");
        let emails: Vec<&str> = candidates.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "jane.smith@example.com",
                "janesmith@example.com",
                "jane_smith@example.com",
                "j.smith@example.com",
                "jsmith@example.com",
                "jane.s@example.com",
                "janes@example.com",
                "jane@example.com",
                "smith@example.com",
            ]
        );
        let kinds: Vec<PatternKind> = candidates.iter().filter_map(|c| c.pattern).collect();
        assert_eq!(kinds, PatternKind::all().collect::<Vec<_>>());
    }

    #[test]
    fn test_generate_shape_across_inputs() {
        let cases = [
            ("Jane", "Smith", "Example.com", "example.com"),
            ("A", "B", "x.com", "x.com"),
            ("  MaRy ", " O'Neil  ", " ACME.io ", "acme.io"),
            ("lee", "lee", "mail.corp.example.co.uk", "mail.corp.example.co.uk"),
            ("José", "Núñez", "Sub.Domain.ORG", "sub.domain.org"),
        ];
        for (first, last, domain, expected_domain) in cases {
            let candidates = generate(first, last, domain);
            assert_eq!(candidates.len(), TEMPLATE_COUNT, "{} {} {}", first, last, domain);
            let suffix = format!("@{}", expected_domain);
            for candidate in &candidates {
                assert_eq!(candidate.email, candidate.email.to_lowercase());
                assert_eq!(candidate.email.matches('@').count(), 1);
                assert!(candidate.email.ends_with(&suffix), "{}", candidate.email);
                assert_eq!(candidate.domain, expected_domain);
            }
        }
    }

    #[test]
    fn test_generate_skips_templates_needing_missing_parts() {
        let candidates = generate("", "Smith", "example.com");
        let emails: Vec<&str> = candidates.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, vec!["smith@example.com"]);

        let candidates = generate("Jane", "", "example.com");
        let emails: Vec<&str> = candidates.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, vec!["jane@example.com"]);

        assert!(generate("", "  ", "example.com").is_empty());
    }

    #[test]
    fn test_detect_pattern_exact_match() {
        assert_eq!(detect_pattern("john", "doe", "john.doe@acme.com"), Some(PatternKind::FirstDotLast));
        assert_eq!(detect_pattern("John", "Doe", "JDoe@acme.com"), Some(PatternKind::InitialLast));
        assert_eq!(detect_pattern("john", "doe", "john.d@acme.com"), Some(PatternKind::FirstDotInitial));
        assert_eq!(detect_pattern("john", "doe", "doe@acme.com"), Some(PatternKind::Last));
        assert_eq!(detect_pattern("john", "doe", "jd@acme.com"), None);
        assert_eq!(detect_pattern("john", "doe", "@acme.com"), None);
    }

    #[test]
    fn test_detect_pattern_prefers_catalog_order() {
        // "a" + "a" renders as "aa" for both firstlast and firstl/flast.
        assert_eq!(detect_pattern("a", "a", "aa@x.com"), Some(PatternKind::FirstLast));
    }

    #[test]
    fn test_classify_local_part_families() {
        assert_eq!(classify_local_part("j.smith"), Some(PatternKind::FirstDotLast));
        assert_eq!(classify_local_part("jane_smith"), Some(PatternKind::FirstUnderscoreLast));
        assert_eq!(classify_local_part("jane_s.mith"), Some(PatternKind::FirstDotLast));
        assert_eq!(classify_local_part("sales"), Some(PatternKind::FirstLast));
        assert_eq!(classify_local_part(""), None);
        assert_eq!(classify_email("info@acme.com"), Some(PatternKind::FirstLast));
    }

    #[test]
    fn test_pattern_kind_string_ids() {
        for kind in PatternKind::all() {
            assert_eq!(kind.as_str().parse::<PatternKind>().unwrap(), kind);
            assert_eq!(kind.template().kind, kind);
        }
        assert!("first-last".parse::<PatternKind>().is_err());
        assert_eq!(serde_json::to_string(&PatternKind::InitialDotLast).unwrap(), "\"f.last\"");
    }
}
