//! Harmful-pattern scanning.
//!
//! Finds catalog phrases in free text and escalates each match to a severity.

use tracing::debug;

use crate::catalog::harmful::{
    remedy_for, CRITICAL_KEYWORDS, HARMFUL_CATEGORIES, HIGH_SEVERITY_CATEGORIES,
};
use crate::catalog::contains_any;
use crate::policy::{PolicyConfig, ScannerPolicy};
use crate::types::{IndicatorSeverity, OppressionIndicator};

/// A category registered on a scanner.
#[derive(Debug, Clone)]
struct ScanCategory {
    name: String,
    phrases: Vec<String>,
}

/// Scans text for oppressive language.
#[derive(Debug, Clone)]
pub struct OppressionScanner {
    categories: Vec<ScanCategory>,
    policy: ScannerPolicy,
}

impl OppressionScanner {
    /// Create a scanner over the built-in catalog.
    pub fn new() -> Self {
        Self::with_policy(&PolicyConfig::default())
    }

    /// Create a scanner with custom scanning constants.
    pub fn with_policy(policy: &PolicyConfig) -> Self {
        let categories = HARMFUL_CATEGORIES
            .iter()
            .map(|c| ScanCategory {
                name: c.name.to_string(),
                phrases: c.phrases.iter().map(|p| p.to_string()).collect(),
            })
            .collect();

        Self {
            categories,
            policy: policy.scanner.clone(),
        }
    }

    /// Add a category scanned after the built-in ones.
    ///
    /// Categories without catalog guidance fall back to the generic remedy.
    pub fn add_category(&mut self, name: &str, phrases: &[&str]) {
        self.categories.push(ScanCategory {
            name: name.to_string(),
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        });
    }

    /// Scan text, returning one indicator per matching phrase in catalog order.
    pub fn scan(&self, text: &str) -> Vec<OppressionIndicator> {
        if text.is_empty() {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        let mut indicators = Vec::new();

        for category in &self.categories {
            for phrase in &category.phrases {
                let Some(position) = lowered.find(phrase.as_str()) else {
                    continue;
                };

                let occurrences = lowered.matches(phrase.as_str()).count();
                let severity = self.severity(&category.name, phrase, occurrences);

                debug!(
                    category = %category.name,
                    phrase = %phrase,
                    occurrences = occurrences,
                    severity = severity.as_str(),
                    "Harmful pattern matched"
                );

                indicators.push(OppressionIndicator {
                    category: category.name.clone(),
                    severity,
                    description: format!(
                        "Potential {} detected: contains '{}'",
                        category.name.replace('_', " "),
                        phrase
                    ),
                    location: self.context_window(text, &lowered, position, phrase.len()),
                    remedy: remedy_for(&category.name).to_string(),
                    phrase: phrase.clone(),
                    occurrences,
                });
            }
        }

        indicators
    }

    /// Highest severity among indicators, if any.
    pub fn highest_severity(indicators: &[OppressionIndicator]) -> Option<IndicatorSeverity> {
        indicators.iter().map(|i| i.severity).max()
    }

    fn severity(&self, category: &str, phrase: &str, occurrences: usize) -> IndicatorSeverity {
        if contains_any(phrase, CRITICAL_KEYWORDS) {
            IndicatorSeverity::Critical
        } else if HIGH_SEVERITY_CATEGORIES.contains(&category) {
            IndicatorSeverity::High
        } else if occurrences > self.policy.high_occurrences {
            IndicatorSeverity::High
        } else if occurrences > self.policy.medium_occurrences {
            IndicatorSeverity::Medium
        } else {
            IndicatorSeverity::Low
        }
    }

    /// Up to `context_radius` characters either side of a match.
    ///
    /// Offsets come from the lowercased text; when lowercasing changed the byte
    /// length the window is cut from the lowercased text instead.
    fn context_window(&self, original: &str, lowered: &str, start: usize, len: usize) -> String {
        // Offsets come from `lowered`; they only index `original` when
        // lowercasing kept every byte in place.
        let source = if original.is_ascii() { original } else { lowered };

        let radius = self.policy.context_radius;
        let before_start = source[..start]
            .char_indices()
            .rev()
            .nth(radius.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let before_start = if radius == 0 { start } else { before_start };
        let after_end = source[start + len..]
            .char_indices()
            .nth(radius)
            .map(|(i, _)| start + len + i)
            .unwrap_or(source.len());

        source[before_start..after_end].to_string()
    }
}

impl Default for OppressionScanner {
    fn default() -> Self {
        Self::new()
    }
}
