//! Case- and accent-insensitive string comparison.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold a string to its comparison key: canonical decomposition, combining
/// marks removed, lowercased.
pub fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
