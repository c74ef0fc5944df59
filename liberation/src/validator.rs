//! Liberation values validation.
//!
//! Scores a [`LiberationValues`] record against the five policy dimensions.
//! Failing dimensions raise a [`Violation`]; passing dimensions earn
//! `weight * value` towards the empowerment score. Failures never subtract.

use std::collections::HashSet;

use tracing::debug;

use crate::policy::{DimensionWeights, PolicyConfig, ValueThresholds};
use crate::types::{
    LiberationValidationResult, LiberationValues, ValidationMode, Violation, ViolationSeverity,
    ViolationType,
};

/// Validates values against fixed thresholds and weights.
#[derive(Debug, Clone)]
pub struct ValueValidator {
    thresholds: ValueThresholds,
    weights: DimensionWeights,
}

impl ValueValidator {
    /// Create a validator with the default policy.
    pub fn new() -> Self {
        Self::with_policy(&PolicyConfig::default())
    }

    /// Create a validator from a policy.
    pub fn with_policy(policy: &PolicyConfig) -> Self {
        Self {
            thresholds: policy.thresholds.clone(),
            weights: policy.weights.clone(),
        }
    }

    /// Thresholds in force.
    pub fn thresholds(&self) -> &ValueThresholds {
        &self.thresholds
    }

    /// Validate with the default weight distribution.
    pub fn validate(&self, values: &LiberationValues, mode: ValidationMode) -> LiberationValidationResult {
        self.validate_weighted(values, mode, &self.weights)
    }

    /// Validate with a caller-chosen weight distribution.
    pub fn validate_weighted(
        &self,
        values: &LiberationValues,
        mode: ValidationMode,
        weights: &DimensionWeights,
    ) -> LiberationValidationResult {
        let mut violations = Vec::new();
        let mut empowerment_score = 0.0;

        for dimension in ViolationType::all() {
            match self.check_dimension(dimension, values) {
                Some(violation) => {
                    debug!(
                        dimension = dimension.as_str(),
                        severity = violation.severity.as_str(),
                        "Liberation value below threshold"
                    );
                    violations.push(violation);
                }
                None => {
                    // A passing dimension always has a value
                    let value = values.score(dimension).unwrap_or(0.0);
                    empowerment_score += weights.weight(dimension) * value;
                }
            }
        }

        let recommendations = Self::recommendations(&violations);
        let is_valid = mode.is_valid(&violations);

        debug!(
            mode = ?mode,
            is_valid = is_valid,
            violations = violations.len(),
            empowerment_score = empowerment_score,
            "Liberation values validated"
        );

        LiberationValidationResult {
            is_valid,
            violations,
            empowerment_score,
            recommendations,
        }
    }

    /// Check one dimension, returning the violation if it fails.
    fn check_dimension(&self, dimension: ViolationType, values: &LiberationValues) -> Option<Violation> {
        let t = &self.thresholds;
        let value = values.score(dimension);

        match dimension {
            ViolationType::CreatorSovereignty => {
                if value.is_some_and(|v| v >= t.min_creator_sovereignty) {
                    return None;
                }
                Some(Violation {
                    violation_type: dimension,
                    severity: ViolationSeverity::Critical,
                    description: match value {
                        Some(v) => format!(
                            "Creator retains {:.0}% of revenue and control, below the {:.0}% minimum",
                            v * 100.0,
                            t.min_creator_sovereignty * 100.0
                        ),
                        None => "Creator sovereignty is missing or malformed".to_string(),
                    },
                    remedy: format!(
                        "Restructure the arrangement so the creator keeps at least {:.0}% of revenue and control.",
                        t.min_creator_sovereignty * 100.0
                    ),
                })
            }
            ViolationType::AntiOppression => {
                if values.anti_oppression_validation == Some(true) {
                    return None;
                }
                Some(Violation {
                    violation_type: dimension,
                    severity: ViolationSeverity::Critical,
                    description: match values.anti_oppression_validation {
                        Some(_) => "Anti-oppression validation failed".to_string(),
                        None => "Anti-oppression validation is missing".to_string(),
                    },
                    remedy: "Complete anti-oppression review with community moderators before going further."
                        .to_string(),
                })
            }
            ViolationType::Empowerment => {
                if value.is_some_and(|v| v >= t.min_empowerment) {
                    return None;
                }
                let severity = if value.unwrap_or(0.0) < t.critical_empowerment {
                    ViolationSeverity::Critical
                } else {
                    ViolationSeverity::Major
                };
                Some(Violation {
                    violation_type: dimension,
                    severity,
                    description: match value {
                        Some(v) => format!(
                            "Black queer empowerment {:.2} is below the {:.2} minimum",
                            v, t.min_empowerment
                        ),
                        None => "Black queer empowerment is missing or malformed".to_string(),
                    },
                    remedy: "Centre Black queer voices, leadership and benefit in this work.".to_string(),
                })
            }
            ViolationType::Protection => {
                if value.is_some_and(|v| v >= t.min_community_protection) {
                    return None;
                }
                Some(Violation {
                    violation_type: dimension,
                    severity: ViolationSeverity::Major,
                    description: match value {
                        Some(v) => format!(
                            "Community protection {:.2} is below the {:.2} minimum",
                            v, t.min_community_protection
                        ),
                        None => "Community protection is missing or malformed".to_string(),
                    },
                    remedy: "Add safeguarding: moderation, content warnings and clear reporting routes."
                        .to_string(),
                })
            }
            ViolationType::Authenticity => {
                if value.is_some_and(|v| v >= t.min_cultural_authenticity) {
                    return None;
                }
                Some(Violation {
                    violation_type: dimension,
                    severity: ViolationSeverity::Minor,
                    description: match value {
                        Some(v) => format!(
                            "Cultural authenticity {:.2} is below the {:.2} minimum",
                            v, t.min_cultural_authenticity
                        ),
                        None => "Cultural authenticity is missing or malformed".to_string(),
                    },
                    remedy: "Involve and credit the cultural holders of the traditions drawn on.".to_string(),
                })
            }
        }
    }

    /// One recommendation per violated dimension, first occurrence wins.
    fn recommendations(violations: &[Violation]) -> Vec<String> {
        let mut seen = HashSet::new();
        violations
            .iter()
            .filter(|v| seen.insert(v.violation_type))
            .map(|v| format!("{} {}", v.violation_type.headline(), v.remedy))
            .collect()
    }
}

impl Default for ValueValidator {
    fn default() -> Self {
        Self::new()
    }
}
