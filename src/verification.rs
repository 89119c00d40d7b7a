use once_cell::sync::Lazy;
use regex::Regex;

/// Address shape used for both candidate syntax checks and harvested links.
pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

static EMAIL_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", EMAIL_PATTERN)).expect("email syntax regex is valid"));

/// Strict syntactic check: non-empty local part and domain, a dotted domain
/// with an alphabetic TLD, and no characters outside the allowed sets.
pub fn is_valid_syntax(email: &str) -> bool {
    EMAIL_SYNTAX.is_match(email)
}
