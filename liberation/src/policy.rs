//! Policy constants for the liberation engine.
//!
//! Every threshold and weight the algorithms consult lives here so the policy
//! can be audited and changed without touching algorithm code.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{LiberationError, Result, ViolationType};

/// The complete policy surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Minimum values per dimension
    pub thresholds: ValueThresholds,
    /// Weights used when no service profile applies
    pub weights: DimensionWeights,
    /// Per-service weight distributions
    pub service_weights: ServiceWeights,
    /// Stage classification constants
    pub classifier: ClassifierPolicy,
    /// Transition readiness constants
    pub readiness: ReadinessPolicy,
    /// Harmful-pattern scanning constants
    pub scanner: ScannerPolicy,
    /// Auxiliary score weights
    pub impact: ImpactWeights,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            thresholds: ValueThresholds::default(),
            weights: DimensionWeights::default(),
            service_weights: ServiceWeights::default(),
            classifier: ClassifierPolicy::default(),
            readiness: ReadinessPolicy::default(),
            scanner: ScannerPolicy::default(),
            impact: ImpactWeights::default(),
        }
    }
}

impl PolicyConfig {
    /// Load a policy from YAML and check it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let policy: Self = serde_yaml::from_str(yaml)?;
        policy.check()?;
        Ok(policy)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject policies the algorithms cannot apply meaningfully.
    pub fn check(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, value) in [
            ("min_creator_sovereignty", t.min_creator_sovereignty),
            ("min_empowerment", t.min_empowerment),
            ("critical_empowerment", t.critical_empowerment),
            ("min_community_protection", t.min_community_protection),
            ("min_cultural_authenticity", t.min_cultural_authenticity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LiberationError::InvalidPolicy(format!(
                    "threshold {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if t.critical_empowerment > t.min_empowerment {
            return Err(LiberationError::InvalidPolicy(
                "critical_empowerment cannot exceed min_empowerment".to_string(),
            ));
        }

        for (name, weights) in [
            ("weights", &self.weights),
            ("service_weights.content", &self.service_weights.content),
            ("service_weights.interaction", &self.service_weights.interaction),
            ("service_weights.revenue", &self.service_weights.revenue),
            ("service_weights.progression", &self.service_weights.progression),
        ] {
            if !weights.is_well_formed() {
                return Err(LiberationError::InvalidPolicy(format!(
                    "{} must be non-negative with a positive total",
                    name
                )));
            }
        }

        Ok(())
    }

    /// SHA-256 over the canonical JSON form, hex encoded.
    ///
    /// Recorded alongside results so an audit can tell which policy produced them.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }
}

/// Minimum value each dimension must reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueThresholds {
    pub min_creator_sovereignty: f64,
    pub min_empowerment: f64,
    /// Empowerment failures below this are critical rather than major
    pub critical_empowerment: f64,
    pub min_community_protection: f64,
    pub min_cultural_authenticity: f64,
}

impl Default for ValueThresholds {
    fn default() -> Self {
        Self {
            min_creator_sovereignty: 0.75,
            min_empowerment: 0.60,
            critical_empowerment: 0.30,
            min_community_protection: 0.70,
            min_cultural_authenticity: 0.65,
        }
    }
}

/// Credit each passing dimension earns per unit of value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub creator_sovereignty: f64,
    pub anti_oppression: f64,
    pub empowerment: f64,
    pub protection: f64,
    pub authenticity: f64,
}

impl DimensionWeights {
    /// Create a weight distribution.
    pub fn new(
        creator_sovereignty: f64,
        anti_oppression: f64,
        empowerment: f64,
        protection: f64,
        authenticity: f64,
    ) -> Self {
        Self {
            creator_sovereignty,
            anti_oppression,
            empowerment,
            protection,
            authenticity,
        }
    }

    /// Weight for a dimension.
    pub fn weight(&self, dimension: ViolationType) -> f64 {
        match dimension {
            ViolationType::CreatorSovereignty => self.creator_sovereignty,
            ViolationType::AntiOppression => self.anti_oppression,
            ViolationType::Empowerment => self.empowerment,
            ViolationType::Protection => self.protection,
            ViolationType::Authenticity => self.authenticity,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        ViolationType::all().iter().map(|d| self.weight(*d)).sum()
    }

    fn is_well_formed(&self) -> bool {
        ViolationType::all()
            .iter()
            .all(|d| self.weight(*d).is_finite() && self.weight(*d) >= 0.0)
            && self.total() > 0.0
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self::new(0.20, 0.30, 0.30, 0.15, 0.05)
    }
}

/// Weight distributions for each calling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceWeights {
    pub content: DimensionWeights,
    pub interaction: DimensionWeights,
    pub revenue: DimensionWeights,
    pub progression: DimensionWeights,
}

impl Default for ServiceWeights {
    fn default() -> Self {
        Self {
            content: DimensionWeights::new(0.15, 0.30, 0.30, 0.15, 0.10),
            interaction: DimensionWeights::new(0.10, 0.30, 0.30, 0.25, 0.05),
            revenue: DimensionWeights::new(0.40, 0.20, 0.20, 0.10, 0.10),
            progression: DimensionWeights::default(),
        }
    }
}

/// Constants for keyword-based stage classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierPolicy {
    /// Score added per matched stage phrase
    pub keyword_increment: f64,
    /// Bonus for the stage the user was last observed in
    pub continuity_bonus: f64,
    /// Penalty for stages more than one step past the last observed stage
    pub skip_penalty: f64,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            keyword_increment: 1.0,
            continuity_bonus: 0.5,
            skip_penalty: 0.25,
        }
    }
}

/// Constants for transition readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessPolicy {
    /// Empowerment score a rule's own criteria must reach
    pub rule_criteria_min_score: f64,
    /// Empowerment score the user's values must reach
    pub user_min_score: f64,
    /// Crisis observations that must precede the current one
    pub prior_crisis_observations: usize,
    /// Observations of a later stage that signal settling in
    pub settled_stage_observations: usize,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            rule_criteria_min_score: 0.7,
            user_min_score: 0.6,
            prior_crisis_observations: 3,
            settled_stage_observations: 3,
        }
    }
}

/// Constants for harmful-pattern scanning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerPolicy {
    /// Characters of context kept either side of a match
    pub context_radius: usize,
    /// Occurrences above which a phrase is high severity
    pub high_occurrences: usize,
    /// Occurrences above which a phrase is medium severity
    pub medium_occurrences: usize,
}

impl Default for ScannerPolicy {
    fn default() -> Self {
        Self {
            context_radius: 50,
            high_occurrences: 3,
            medium_occurrences: 1,
        }
    }
}

/// Weights for the auxiliary impact scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactWeights {
    pub empowerment_values: f64,
    pub empowerment_alignment: f64,
    pub benefit_protection: f64,
    pub benefit_authenticity: f64,
    pub benefit_alignment: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            empowerment_values: 0.7,
            empowerment_alignment: 0.3,
            benefit_protection: 0.5,
            benefit_authenticity: 0.3,
            benefit_alignment: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let policy = PolicyConfig::default();
        assert!((policy.weights.total() - 1.0).abs() < 1e-9);
        assert!((policy.service_weights.content.total() - 1.0).abs() < 1e-9);
        assert!((policy.service_weights.interaction.total() - 1.0).abs() < 1e-9);
        assert!((policy.service_weights.revenue.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_yaml_roundtrip_preserves_fingerprint() {
        let policy = PolicyConfig::default();
        let yaml = policy.to_yaml().unwrap();
        let parsed = PolicyConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.fingerprint(), policy.fingerprint());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let policy = PolicyConfig::from_yaml("thresholds:\n  min_creator_sovereignty: 0.8\n").unwrap();
        assert_eq!(policy.thresholds.min_creator_sovereignty, 0.8);
        assert_eq!(policy.thresholds.min_empowerment, 0.60);
        assert_ne!(policy.fingerprint(), PolicyConfig::default().fingerprint());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = PolicyConfig::from_yaml("thresholds:\n  min_empowerment: 1.5\n").unwrap_err();
        assert!(matches!(err, LiberationError::InvalidPolicy(_)));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut policy = PolicyConfig::default();
        policy.service_weights.revenue = DimensionWeights::new(0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(policy.check().is_err());
    }
}
