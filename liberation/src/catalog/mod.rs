//! Static pattern catalogs.
//!
//! All tables are immutable module-level constants. Matching against them is a
//! case-insensitive substring test so every decision stays traceable to the
//! phrase that produced it.

pub mod alignment;
pub mod harmful;
pub mod stages;

/// A named group of phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCategory {
    /// Category name
    pub name: &'static str,
    /// Lowercase phrases belonging to the category
    pub phrases: &'static [&'static str],
}

/// Phrases from `phrases` that occur in already-lowercased `text`.
pub fn matched_phrases(text: &str, phrases: &'static [&'static str]) -> Vec<&'static str> {
    phrases
        .iter()
        .copied()
        .filter(|phrase| text.contains(phrase))
        .collect()
}

/// Whether any phrase occurs in already-lowercased `text`.
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}
