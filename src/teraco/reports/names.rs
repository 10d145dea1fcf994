//! Filename canonicalisation used for fuzzy comparisons.

/// Collapses a filename into a comparison key: every character that is not a
/// letter or digit is dropped and the rest is lowercased.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
