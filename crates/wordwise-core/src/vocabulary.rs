//! Vocabulary extraction from free text.

use std::collections::BTreeSet;

/// Sorted, deduplicated, lowercase word tokens of `text`.
///
/// A token is a maximal run of alphanumeric characters or underscores.
pub fn extract_vocabulary(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
