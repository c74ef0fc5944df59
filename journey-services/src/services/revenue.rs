//! Creator revenue arrangement review.

use liberation::impact;
use liberation::types::lenient_score;
use liberation::{
    BusinessLogicOperationResult, ImpactScores, LiberationValues, OperationOutcome, PolicyConfig,
    ResultAggregator, ValidationMode, ValueValidator,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{RevenueConfig, ServicesConfig};

const SHARE_TOLERANCE: f64 = 1e-9;

/// A proposed split of creator revenue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueArrangement {
    pub arrangement_id: String,
    pub creator_id: String,
    /// Shares are `None` when absent or not a finite number
    #[serde(default, deserialize_with = "lenient_score")]
    pub creator_share: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub platform_share: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub community_fund_share: Option<f64>,
    /// Remaining dimensions; creator sovereignty is taken from `creator_share`
    #[serde(default)]
    pub values: LiberationValues,
}

/// What revenue review found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReview {
    pub arrangement_id: String,
    pub shares_valid: bool,
    pub total_share: f64,
    pub unallocated_share: f64,
}

/// Reviews revenue arrangements for creator sovereignty.
#[derive(Debug, Clone)]
pub struct RevenueService {
    validator: ValueValidator,
    policy: PolicyConfig,
    config: RevenueConfig,
}

impl RevenueService {
    /// Create the service from configuration.
    pub fn new(config: &ServicesConfig) -> Self {
        Self {
            validator: ValueValidator::with_policy(&config.policy),
            policy: config.policy.clone(),
            config: config.revenue.clone(),
        }
    }

    /// Review an arrangement.
    ///
    /// Passes when every share is within [0, 1], the shares do not exceed the
    /// configured total and the creator share fully meets the sovereignty
    /// minimum. A missing share is invalid and a missing creator share
    /// scores zero compliance.
    pub fn review_arrangement(&self, arrangement: &RevenueArrangement) -> BusinessLogicOperationResult<RevenueReview> {
        let shares = [
            ("creator", arrangement.creator_share),
            ("platform", arrangement.platform_share),
            ("community fund", arrangement.community_fund_share),
        ];

        let mut messages = Vec::new();
        for (name, share) in shares {
            match share {
                None => messages.push(format!("The {} share is missing or not a number.", name)),
                Some(share) if !(0.0..=1.0).contains(&share) => {
                    messages.push(format!("The {} share must be between 0 and 1, got {}.", name, share))
                }
                Some(_) => {}
            }
        }

        let total_share: f64 = shares.iter().filter_map(|(_, s)| *s).sum();
        if total_share > self.config.max_total_share + SHARE_TOLERANCE {
            messages.push(format!(
                "Shares add up to {:.2}, more than the {:.2} available.",
                total_share, self.config.max_total_share
            ));
        }
        let shares_valid = messages.is_empty();

        let values = arrangement
            .values
            .clone()
            .with_creator_sovereignty(arrangement.creator_share);
        let validation = self.validator.validate_weighted(
            &values,
            ValidationMode::Strict,
            &self.policy.service_weights.revenue,
        );

        let sovereignty_compliance = match arrangement.creator_share {
            Some(share) if share.is_finite() => {
                impact::sovereignty_compliance(share.clamp(0.0, 1.0), &self.policy.thresholds)
            }
            _ => 0.0,
        };
        if sovereignty_compliance < 1.0 {
            messages.push(format!(
                "Raise the creator share to at least {:.0}%.",
                self.policy.thresholds.min_creator_sovereignty * 100.0
            ));
        }

        let scores = ImpactScores {
            empowerment_impact: impact::empowerment_impact(&values, 0.0, &self.policy.impact),
            community_benefit: impact::community_benefit(&values, 0.0, &self.policy.impact),
            sovereignty_compliance,
        };

        if !shares_valid {
            warn!(
                arrangement_id = %arrangement.arrangement_id,
                total_share = total_share,
                "Revenue arrangement has invalid shares"
            );
        }
        info!(
            arrangement_id = %arrangement.arrangement_id,
            creator_id = %arrangement.creator_id,
            creator_share = ?arrangement.creator_share,
            sovereignty_compliance = sovereignty_compliance,
            values_valid = validation.is_valid,
            "Revenue arrangement reviewed"
        );

        let review = RevenueReview {
            arrangement_id: arrangement.arrangement_id.clone(),
            shares_valid,
            total_share,
            unallocated_share: (self.config.max_total_share - total_share).max(0.0),
        };

        let outcome = if shares_valid && sovereignty_compliance >= 1.0 {
            OperationOutcome::passed(review)
        } else {
            OperationOutcome::failed(Some(review))
        };

        ResultAggregator::assemble(outcome.with_messages(messages), validation, scores)
    }
}
