//! Core types for liberation values validation.
//!
//! These types model the five-dimension policy vector, the violations raised
//! against it and the indicators produced by harmful-pattern scanning.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs for consistency with the web frontend.

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::journey::JourneyStage;

/// The five-dimension liberation values vector.
///
/// Every dimension is optional on the wire. Absent, `null`, non-numeric or
/// non-finite inputs deserialize to `None` and fail their threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LiberationValues {
    /// Fraction of revenue/control retained by the creator (0.0-1.0)
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub creator_sovereignty: Option<f64>,
    /// Whether the subject passed anti-oppression review
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    pub anti_oppression_validation: Option<bool>,
    /// Black queer empowerment (0.0-1.0)
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub black_queer_empowerment: Option<f64>,
    /// Community protection (0.0-1.0)
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub community_protection: Option<f64>,
    /// Cultural authenticity (0.0-1.0)
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub cultural_authenticity: Option<f64>,
}

impl LiberationValues {
    /// Create a fully populated values vector.
    pub fn new(
        creator_sovereignty: f64,
        anti_oppression_validation: bool,
        black_queer_empowerment: f64,
        community_protection: f64,
        cultural_authenticity: f64,
    ) -> Self {
        Self {
            creator_sovereignty: Some(creator_sovereignty),
            anti_oppression_validation: Some(anti_oppression_validation),
            black_queer_empowerment: Some(black_queer_empowerment),
            community_protection: Some(community_protection),
            cultural_authenticity: Some(cultural_authenticity),
        }
    }

    /// Builder: replace creator sovereignty. `None` marks it as missing.
    pub fn with_creator_sovereignty(mut self, share: Option<f64>) -> Self {
        self.creator_sovereignty = share;
        self
    }

    /// Read a dimension as a number in [0, 1].
    ///
    /// Out-of-range and non-finite values are treated as malformed.
    pub fn score(&self, dimension: ViolationType) -> Option<f64> {
        let raw = match dimension {
            ViolationType::CreatorSovereignty => self.creator_sovereignty,
            ViolationType::AntiOppression => {
                return self
                    .anti_oppression_validation
                    .map(|passed| if passed { 1.0 } else { 0.0 })
            }
            ViolationType::Empowerment => self.black_queer_empowerment,
            ViolationType::Protection => self.community_protection,
            ViolationType::Authenticity => self.cultural_authenticity,
        };
        raw.filter(|v| (0.0..=1.0).contains(v))
    }
}

/// Read any JSON value as a finite number, or `None` when it is not one.
///
/// Use with `#[serde(default, deserialize_with = "...")]` so absent and
/// malformed fields both land as `None`.
pub fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

/// Read any JSON value as a boolean, or `None` when it is not one.
pub fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

/// Policy dimension a violation was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    CreatorSovereignty,
    AntiOppression,
    Empowerment,
    Protection,
    Authenticity,
}

impl ViolationType {
    /// All dimensions in evaluation order.
    pub fn all() -> [Self; 5] {
        [
            Self::CreatorSovereignty,
            Self::AntiOppression,
            Self::Empowerment,
            Self::Protection,
            Self::Authenticity,
        ]
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatorSovereignty => "creator_sovereignty",
            Self::AntiOppression => "anti_oppression",
            Self::Empowerment => "empowerment",
            Self::Protection => "protection",
            Self::Authenticity => "authenticity",
        }
    }

    /// Human-readable guidance opening a recommendation for this dimension.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::CreatorSovereignty => "Creator sovereignty must be restored.",
            Self::AntiOppression => "Anti-oppression review has not been passed.",
            Self::Empowerment => "Black queer empowerment needs strengthening.",
            Self::Protection => "Community protection is below the safe floor.",
            Self::Authenticity => "Cultural authenticity could be deepened.",
        }
    }
}

/// Severity of a values violation.
///
/// Ordered so that `Critical` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Minor,
    Major,
    Critical,
}

impl ViolationSeverity {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

/// A failed policy dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Violation {
    /// Dimension that failed
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    /// How serious the failure is
    pub severity: ViolationSeverity,
    /// What went wrong, with the observed value
    pub description: String,
    /// What the caller can do about it
    pub remedy: String,
}

/// How a set of violations maps to validity.
///
/// Content and revenue review reject on any violation; interaction and
/// progression only reject on critical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Any violation invalidates
    #[default]
    Strict,
    /// Only critical violations invalidate
    CriticalOnly,
}

impl ValidationMode {
    /// Decide validity for a set of violations.
    pub fn is_valid(&self, violations: &[Violation]) -> bool {
        match self {
            Self::Strict => violations.is_empty(),
            Self::CriticalOnly => !violations
                .iter()
                .any(|v| v.severity == ViolationSeverity::Critical),
        }
    }
}

/// Outcome of validating a [`LiberationValues`] record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LiberationValidationResult {
    /// Validity under the requested mode
    pub is_valid: bool,
    /// Failed dimensions, in evaluation order
    pub violations: Vec<Violation>,
    /// Credit earned by passing dimensions
    pub empowerment_score: f64,
    /// One recommendation per violated dimension
    pub recommendations: Vec<String>,
}

impl LiberationValidationResult {
    /// Whether any violation is critical.
    pub fn has_critical(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Critical)
    }

    /// Find the violation raised against a dimension, if any.
    pub fn violation(&self, dimension: ViolationType) -> Option<&Violation> {
        self.violations.iter().find(|v| v.violation_type == dimension)
    }
}

/// Severity of a harmful-pattern indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IndicatorSeverity {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A categorized harmful-language match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct OppressionIndicator {
    /// Catalog category
    #[serde(rename = "type")]
    pub category: String,
    /// Escalated severity
    pub severity: IndicatorSeverity,
    /// Explanation naming the matched phrase
    pub description: String,
    /// Text surrounding the first match
    pub location: String,
    /// Category guidance
    pub remedy: String,
    /// The catalog phrase that matched
    pub phrase: String,
    /// Full-text occurrence count of the phrase
    pub occurrences: usize,
}

/// A stage transition and the policy bar guarding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRule {
    pub from_stage: JourneyStage,
    pub to_stage: JourneyStage,
    /// Values the transition itself is held to
    pub liberation_criteria: LiberationValues,
    /// Milestones the user must have completed
    pub empowerment_requirements: Vec<String>,
    /// Whether the community must sign off
    pub community_validation: bool,
}

/// Error types for the liberation engine.
#[derive(Debug, thiserror::Error)]
pub enum LiberationError {
    /// No rule exists for the requested transition
    #[error("Undefined transition: {from} -> {to}")]
    UndefinedTransition { from: JourneyStage, to: JourneyStage },

    /// Policy configuration is unusable
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Policy could not be parsed
    #[error("Policy parse error: {0}")]
    PolicyParse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, LiberationError>;
