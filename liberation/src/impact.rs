//! Auxiliary impact scores reported alongside validation.

use serde::{Deserialize, Serialize};

use crate::catalog::alignment::ALIGNMENT_CATEGORIES;
use crate::catalog::matched_phrases;
use crate::policy::{ImpactWeights, ValueThresholds};
use crate::types::{LiberationValues, ViolationType};

/// Pattern-based liberation alignment of a text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSignal {
    /// Matched categories over total categories
    pub score: f64,
    /// Names of matched categories, in catalog order
    pub matched: Vec<String>,
}

/// Score a text against the liberation-alignment keyword sets.
pub fn alignment(text: &str) -> AlignmentSignal {
    if text.is_empty() || ALIGNMENT_CATEGORIES.is_empty() {
        return AlignmentSignal::default();
    }

    let lowered = text.to_lowercase();
    let matched: Vec<String> = ALIGNMENT_CATEGORIES
        .iter()
        .filter(|c| !matched_phrases(&lowered, c.phrases).is_empty())
        .map(|c| c.name.to_string())
        .collect();

    AlignmentSignal {
        score: matched.len() as f64 / ALIGNMENT_CATEGORIES.len() as f64,
        matched,
    }
}

/// How fully a creator share meets the sovereignty minimum, capped at 1.
pub fn sovereignty_compliance(share: f64, thresholds: &ValueThresholds) -> f64 {
    if !share.is_finite() || share <= 0.0 {
        return 0.0;
    }
    if thresholds.min_creator_sovereignty <= 0.0 {
        return 1.0;
    }
    (share / thresholds.min_creator_sovereignty).min(1.0)
}

/// Weighted blend of empowerment and alignment.
pub fn empowerment_impact(values: &LiberationValues, alignment: f64, weights: &ImpactWeights) -> f64 {
    let empowerment = values.score(ViolationType::Empowerment).unwrap_or(0.0);
    weights.empowerment_values * empowerment + weights.empowerment_alignment * clamp_unit(alignment)
}

/// Weighted blend of protection, authenticity and alignment.
pub fn community_benefit(values: &LiberationValues, alignment: f64, weights: &ImpactWeights) -> f64 {
    let protection = values.score(ViolationType::Protection).unwrap_or(0.0);
    let authenticity = values.score(ViolationType::Authenticity).unwrap_or(0.0);
    weights.benefit_protection * protection
        + weights.benefit_authenticity * authenticity
        + weights.benefit_alignment * clamp_unit(alignment)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
