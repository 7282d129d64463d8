use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Reduces a municipality name to the form used for grouping.
///
/// The name is lower-cased, decomposed (NFD) with the combining diacritical
/// marks (U+0300 to U+036F) removed, and its whitespace runs are collapsed to a
/// single space. The result is never displayed.
pub fn normalize_municipality(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let stripped: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    stripped.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// The distinct promoter entities of a comma-separated list.
///
/// Entities are compared as written: "Ajuntament" and "ajuntament" are two
/// different promoters.
pub fn split_entities(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_string())
        .collect()
}
