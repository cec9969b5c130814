//! Numeric token scanning for impact figures ("2,500+", "95").

use std::sync::LazyLock;

use regex::Regex;

/// Digits, optionally comma-grouped, with an optional trailing `+`.
static IMPACT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:,\d+)*\+?").expect("impact number pattern is valid"));

/// Extract every numeric token from `text`, in order of appearance, without duplicates.
pub fn extract_impact_numbers(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in IMPACT_NUMBER.find_iter(text) {
        let token = m.as_str();
        if !found.iter().any(|f| f == token) {
            found.push(token.to_string());
        }
    }
    found
}
