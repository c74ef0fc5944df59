//! Result envelope assembly.
//!
//! Every business-logic operation reports through the same envelope so callers
//! can persist and serialize results uniformly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::types::{LiberationValidationResult, Violation};

/// What an operation concluded on its own terms, before validation is folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome<T> {
    /// Whether the operation's own checks passed
    pub passed: bool,
    /// Operation payload
    pub data: Option<T>,
    /// Operation-specific recommendations, listed ahead of validator ones
    pub messages: Vec<String>,
}

impl<T> OperationOutcome<T> {
    /// An outcome whose own checks passed.
    pub fn passed(data: T) -> Self {
        Self {
            passed: true,
            data: Some(data),
            messages: Vec::new(),
        }
    }

    /// An outcome whose own checks failed.
    pub fn failed(data: Option<T>) -> Self {
        Self {
            passed: false,
            data,
            messages: Vec::new(),
        }
    }

    /// Builder: append a recommendation.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Builder: append several recommendations.
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }
}

/// Auxiliary scores carried on the envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactScores {
    pub empowerment_impact: f64,
    pub community_benefit: f64,
    pub sovereignty_compliance: f64,
}

/// The uniform envelope returned by business-logic operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLogicOperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub liberation_validation: LiberationValidationResult,
    pub empowerment_impact: f64,
    pub community_benefit: f64,
    pub sovereignty_compliance: f64,
    pub recommendations: Vec<String>,
    pub violations: Vec<Violation>,
    pub operation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
}

/// Folds an operation outcome and its validation into an envelope.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Assemble the envelope.
    ///
    /// Success requires both the operation and the validation to pass.
    pub fn assemble<T>(
        outcome: OperationOutcome<T>,
        validation: LiberationValidationResult,
        scores: ImpactScores,
    ) -> BusinessLogicOperationResult<T> {
        let success = outcome.passed && validation.is_valid;

        let mut recommendations = outcome.messages;
        recommendations.extend(validation.recommendations.iter().cloned());
        let violations = validation.violations.clone();

        let operation_id = Uuid::new_v4();

        debug!(
            operation_id = %operation_id,
            success = success,
            operation_passed = outcome.passed,
            values_valid = validation.is_valid,
            violations = violations.len(),
            "Operation result assembled"
        );

        BusinessLogicOperationResult {
            success,
            data: outcome.data,
            liberation_validation: validation,
            empowerment_impact: scores.empowerment_impact,
            community_benefit: scores.community_benefit,
            sovereignty_compliance: scores.sovereignty_compliance,
            recommendations,
            violations,
            operation_id,
            evaluated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LiberationValues, ValidationMode};
    use crate::validator::ValueValidator;

    #[test]
    fn test_success_requires_both() {
        let validator = ValueValidator::new();
        let valid = validator.validate(&LiberationValues::new(0.9, true, 0.9, 0.9, 0.9), ValidationMode::Strict);
        let invalid = validator.validate(&LiberationValues::new(0.5, true, 0.9, 0.9, 0.9), ValidationMode::Strict);

        let ok = ResultAggregator::assemble(OperationOutcome::passed(1), valid.clone(), ImpactScores::default());
        assert!(ok.success);
        assert_eq!(ok.data, Some(1));

        let op_failed = ResultAggregator::assemble(OperationOutcome::failed(Some(2)), valid, ImpactScores::default());
        assert!(!op_failed.success);

        let values_failed = ResultAggregator::assemble(OperationOutcome::passed(3), invalid, ImpactScores::default());
        assert!(!values_failed.success);
        assert_eq!(values_failed.violations.len(), 1);
    }

    #[test]
    fn test_recommendations_keep_order_without_dedup() {
        let validator = ValueValidator::new();
        let validation = validator.validate(&LiberationValues::new(0.5, true, 0.9, 0.9, 0.9), ValidationMode::Strict);
        let validator_message = validation.recommendations[0].clone();

        let outcome = OperationOutcome::passed("ok")
            .with_message("first")
            .with_message(validator_message.clone());
        let result = ResultAggregator::assemble(outcome, validation, ImpactScores::default());

        assert_eq!(
            result.recommendations,
            vec!["first".to_string(), validator_message.clone(), validator_message]
        );
    }

    #[test]
    fn test_envelope_wire_names() {
        let validation = ValueValidator::new()
            .validate(&LiberationValues::new(0.9, true, 0.9, 0.9, 0.9), ValidationMode::Strict);
        let scores = ImpactScores {
            empowerment_impact: 0.5,
            community_benefit: 0.4,
            sovereignty_compliance: 1.0,
        };
        let result = ResultAggregator::assemble(OperationOutcome::passed(()), validation, scores);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["liberationValidation"]["isValid"], true);
        assert_eq!(json["sovereigntyCompliance"], 1.0);
        assert!(json["operationId"].is_string());
        assert!(json["evaluatedAt"].is_string());
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let validation = ValueValidator::new().validate(&LiberationValues::default(), ValidationMode::Strict);
        let a = ResultAggregator::assemble(OperationOutcome::passed(()), validation.clone(), ImpactScores::default());
        let b = ResultAggregator::assemble(OperationOutcome::passed(()), validation, ImpactScores::default());
        assert_ne!(a.operation_id, b.operation_id);
    }
}
