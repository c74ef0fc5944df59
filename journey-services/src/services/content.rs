//! Content review.

use liberation::impact::{self, AlignmentSignal};
use liberation::{
    BusinessLogicOperationResult, ImpactScores, IndicatorSeverity, LiberationValues,
    OperationOutcome, OppressionIndicator, OppressionScanner, PolicyConfig, ResultAggregator,
    ValidationMode, ValueValidator, ViolationType,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ContentConfig, ServicesConfig};

/// A piece of content submitted for review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSubmission {
    pub content_id: String,
    pub creator_id: String,
    pub text: String,
    #[serde(default)]
    pub values: LiberationValues,
}

/// What content review found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReview {
    pub content_id: String,
    pub indicators: Vec<OppressionIndicator>,
    pub highest_severity: Option<IndicatorSeverity>,
    pub alignment: AlignmentSignal,
}

/// Reviews content before publication.
#[derive(Debug, Clone)]
pub struct ContentService {
    validator: ValueValidator,
    scanner: OppressionScanner,
    policy: PolicyConfig,
    config: ContentConfig,
}

impl ContentService {
    /// Create the service from configuration.
    pub fn new(config: &ServicesConfig) -> Self {
        Self {
            validator: ValueValidator::with_policy(&config.policy),
            scanner: OppressionScanner::with_policy(&config.policy),
            policy: config.policy.clone(),
            config: config.content.clone(),
        }
    }

    /// Scanner used for review, open for runtime category additions.
    pub fn scanner_mut(&mut self) -> &mut OppressionScanner {
        &mut self.scanner
    }

    /// Review a submission.
    ///
    /// Passes when nothing high or critical was found and the community
    /// benefit reaches the configured minimum.
    pub fn review_content(&self, submission: &ContentSubmission) -> BusinessLogicOperationResult<ContentReview> {
        let indicators = self.scanner.scan(&submission.text);
        let highest_severity = OppressionScanner::highest_severity(&indicators);
        let alignment = impact::alignment(&submission.text);

        let validation = self.validator.validate_weighted(
            &submission.values,
            ValidationMode::Strict,
            &self.policy.service_weights.content,
        );

        let scores = ImpactScores {
            empowerment_impact: impact::empowerment_impact(
                &submission.values,
                alignment.score,
                &self.policy.impact,
            ),
            community_benefit: impact::community_benefit(
                &submission.values,
                alignment.score,
                &self.policy.impact,
            ),
            sovereignty_compliance: impact::sovereignty_compliance(
                submission.values.score(ViolationType::CreatorSovereignty).unwrap_or(0.0),
                &self.policy.thresholds,
            ),
        };

        let harmful = highest_severity.is_some_and(|s| s >= IndicatorSeverity::High);
        let enough_benefit = scores.community_benefit >= self.config.min_community_benefit;

        let mut messages: Vec<String> = indicators
            .iter()
            .filter(|i| i.severity >= IndicatorSeverity::High)
            .map(|i| format!("Revise \"{}\": {}", i.phrase, i.remedy))
            .collect();
        if !enough_benefit {
            messages.push(format!(
                "Community benefit {:.2} is below {:.2}. Strengthen protection, cultural grounding or community focus.",
                scores.community_benefit, self.config.min_community_benefit
            ));
        }
        if alignment.matched.is_empty() {
            messages.push(
                "Consider how this piece celebrates or supports Black queer community.".to_string(),
            );
        }

        info!(
            content_id = %submission.content_id,
            creator_id = %submission.creator_id,
            indicators = indicators.len(),
            highest_severity = highest_severity.map(|s| s.as_str()).unwrap_or("none"),
            community_benefit = scores.community_benefit,
            values_valid = validation.is_valid,
            "Content reviewed"
        );

        let review = ContentReview {
            content_id: submission.content_id.clone(),
            indicators,
            highest_severity,
            alignment,
        };

        let outcome = if !harmful && enough_benefit {
            OperationOutcome::passed(review)
        } else {
            OperationOutcome::failed(Some(review))
        };

        ResultAggregator::assemble(outcome.with_messages(messages), validation, scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(text: &str, values: LiberationValues) -> ContentSubmission {
        ContentSubmission {
            content_id: "c1".to_string(),
            creator_id: "creator".to_string(),
            text: text.to_string(),
            values,
        }
    }

    #[test]
    fn test_clean_aligned_content_passes() {
        let service = ContentService::new(&ServicesConfig::default());
        let result = service.review_content(&submission(
            "A healing circle celebrating Black joy and mutual aid",
            LiberationValues::new(0.9, true, 0.9, 0.9, 0.9),
        ));

        assert!(result.success, "{:?}", result.recommendations);
        let review = result.data.unwrap();
        assert!(review.indicators.is_empty());
        assert_eq!(review.alignment.matched.len(), 3);
        assert_eq!(result.sovereignty_compliance, 1.0);
    }

    #[test]
    fn test_high_severity_indicator_fails() {
        let service = ContentService::new(&ServicesConfig::default());
        let result = service.review_content(&submission(
            "Honestly it's just a phase",
            LiberationValues::new(0.9, true, 0.9, 0.9, 0.9),
        ));

        assert!(!result.success);
        assert!(result.liberation_validation.is_valid);
        assert_eq!(result.data.unwrap().highest_severity, Some(IndicatorSeverity::High));
        assert!(result.recommendations[0].starts_with("Revise \"just a phase\""));
    }

    #[test]
    fn test_low_benefit_fails() {
        let service = ContentService::new(&ServicesConfig::default());
        // 0.5 * 0.7 + 0.3 * 0.65 = 0.545
        let result = service.review_content(&submission(
            "A short post about the weekend",
            LiberationValues::new(0.9, true, 0.9, 0.7, 0.65),
        ));

        assert!(!result.success);
        assert!(result.community_benefit < 0.6);
        assert!(result.recommendations.iter().any(|r| r.starts_with("Community benefit")));
    }

    #[test]
    fn test_strict_validation_applies() {
        let service = ContentService::new(&ServicesConfig::default());
        // Authenticity fails (minor), which is enough under strict review
        let result = service.review_content(&submission(
            "Mutual aid and healing, rooted in diaspora tradition",
            LiberationValues::new(0.9, true, 0.9, 1.0, 0.6),
        ));

        assert!(!result.liberation_validation.is_valid);
        assert!(!result.success);
        assert_eq!(result.violations.len(), 1);
    }
}
