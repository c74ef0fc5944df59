//! Stage transition requests.

use std::sync::Arc;

use liberation::impact;
use liberation::{
    BusinessLogicOperationResult, ImpactScores, JourneyContext, JourneyStage, LiberationValues,
    OperationOutcome, PolicyConfig, ProgressionRuleEngine, ReadinessAssessment, ResultAggregator,
    TransitionContext, ValidationMode, ValueValidator, ViolationType,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ServicesConfig;
use crate::history::JourneyHistoryStore;
use crate::types::{require_user_id, Result, ServiceError};

/// A request to move a user between stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub user_id: String,
    pub from_stage: JourneyStage,
    pub to_stage: JourneyStage,
    #[serde(default)]
    pub values: LiberationValues,
    #[serde(default)]
    pub context: TransitionContext,
}

/// Outcome of a transition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDecision {
    pub from_stage: JourneyStage,
    pub to_stage: JourneyStage,
    pub readiness: ReadinessAssessment,
    /// Whether the target stage was recorded
    pub recorded: bool,
    /// History after the request, oldest first
    pub history: Vec<JourneyStage>,
}

/// Gates and records stage transitions.
pub struct ProgressionService {
    engine: ProgressionRuleEngine,
    validator: ValueValidator,
    policy: PolicyConfig,
    store: Arc<dyn JourneyHistoryStore>,
}

impl ProgressionService {
    /// Create the service over a history store.
    pub fn new(config: &ServicesConfig, store: Arc<dyn JourneyHistoryStore>) -> Self {
        Self {
            engine: ProgressionRuleEngine::with_policy(&config.policy),
            validator: ValueValidator::with_policy(&config.policy),
            policy: config.policy.clone(),
            store,
        }
    }

    /// The rule engine in use.
    pub fn engine(&self) -> &ProgressionRuleEngine {
        &self.engine
    }

    /// Evaluate a transition and record the target stage when it is allowed.
    ///
    /// An edge missing from the transition graph is an error, not a refusal.
    /// So is a `from_stage` other than the user's latest recorded stage; a
    /// user with no history starts in crisis.
    pub async fn request_transition(
        &self,
        request: &TransitionRequest,
    ) -> Result<BusinessLogicOperationResult<TransitionDecision>> {
        require_user_id(&request.user_id)?;

        let rule = self.engine.require_rule(request.from_stage, request.to_stage)?;

        let current = self
            .store
            .get(&request.user_id)
            .await?
            .last()
            .copied()
            .unwrap_or(JourneyStage::Crisis);
        if current != request.from_stage {
            warn!(
                user_id = %request.user_id,
                current = %current,
                from = %request.from_stage,
                to = %request.to_stage,
                "Transition requested from a stage the user is not in"
            );
            return Err(ServiceError::StageMismatch {
                current,
                requested: request.from_stage,
            });
        }

        let readiness = self
            .engine
            .evaluate_readiness(rule, &request.context, &request.values);

        let validation = self.validator.validate_weighted(
            &request.values,
            ValidationMode::CriticalOnly,
            &self.policy.service_weights.progression,
        );

        let recorded = readiness.ready && validation.is_valid;
        let history = if recorded {
            self.store
                .append_bounded(&request.user_id, request.to_stage)
                .await?
        } else {
            self.store.get(&request.user_id).await?
        };

        let mut messages: Vec<String> = readiness
            .unmet_requirements
            .iter()
            .map(|r| format!("Complete requirement: {}", r.replace('_', " ")))
            .collect();
        if !readiness.community_gate_passed {
            messages.push(format!(
                "Moving to {} needs community validation first.",
                request.to_stage.as_str().replace('_', " ")
            ));
        }
        if !readiness.user_qualifies {
            messages.push(format!(
                "Empowerment score {:.2} needs to reach {:.2} before moving on.",
                readiness.user_score, self.policy.readiness.user_min_score
            ));
        }
        if recorded {
            messages.push(format!(
                "Welcome to {}.",
                request.to_stage.as_str().replace('_', " ")
            ));
        }

        if recorded {
            info!(
                user_id = %request.user_id,
                from = %request.from_stage,
                to = %request.to_stage,
                "Stage transition recorded"
            );
        } else {
            warn!(
                user_id = %request.user_id,
                from = %request.from_stage,
                to = %request.to_stage,
                ready = readiness.ready,
                values_valid = validation.is_valid,
                unmet = readiness.unmet_requirements.len(),
                "Stage transition refused"
            );
        }

        let scores = ImpactScores {
            empowerment_impact: impact::empowerment_impact(&request.values, 0.0, &self.policy.impact),
            community_benefit: impact::community_benefit(&request.values, 0.0, &self.policy.impact),
            sovereignty_compliance: impact::sovereignty_compliance(
                request
                    .values
                    .score(ViolationType::CreatorSovereignty)
                    .unwrap_or(0.0),
                &self.policy.thresholds,
            ),
        };

        let ready = readiness.ready;
        let decision = TransitionDecision {
            from_stage: request.from_stage,
            to_stage: request.to_stage,
            readiness,
            recorded,
            history,
        };

        let outcome = if ready {
            OperationOutcome::passed(decision)
        } else {
            OperationOutcome::failed(Some(decision))
        };

        Ok(ResultAggregator::assemble(outcome.with_messages(messages), validation, scores))
    }

    /// Advisory hint from the user's stored history.
    ///
    /// Reads history only; it never records or authorizes anything.
    pub async fn next_stage_hint(&self, user_id: &str, context: &JourneyContext) -> Result<bool> {
        require_user_id(user_id)?;
        let history = self.store.get(user_id).await?;
        Ok(self
            .engine
            .assess_next_stage_readiness(context.stage, &history, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistoryStore;
    use liberation::LiberationError;

    fn service() -> (ProgressionService, Arc<InMemoryHistoryStore>) {
        let store = Arc::new(InMemoryHistoryStore::default());
        let service = ProgressionService::new(&ServicesConfig::default(), store.clone());
        (service, store)
    }

    fn request(from: JourneyStage, to: JourneyStage, context: TransitionContext) -> TransitionRequest {
        TransitionRequest {
            user_id: "u1".to_string(),
            from_stage: from,
            to_stage: to,
            values: LiberationValues::new(0.9, true, 0.9, 0.9, 0.9),
            context,
        }
    }

    #[tokio::test]
    async fn test_ready_transition_is_recorded() {
        let (service, store) = service();
        let context = TransitionContext::default()
            .with_completed(["safety_plan_in_place", "immediate_needs_met"]);

        let result = service
            .request_transition(&request(JourneyStage::Crisis, JourneyStage::Stabilization, context))
            .await
            .unwrap();

        assert!(result.success);
        let decision = result.data.unwrap();
        assert!(decision.recorded);
        assert_eq!(decision.history, vec![JourneyStage::Stabilization]);
        assert_eq!(store.get("u1").await.unwrap(), vec![JourneyStage::Stabilization]);
    }

    #[tokio::test]
    async fn test_undefined_transition_is_an_error() {
        let (service, _) = service();
        let err = service
            .request_transition(&request(
                JourneyStage::Crisis,
                JourneyStage::Growth,
                TransitionContext::default(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Liberation(LiberationError::UndefinedTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_transition_must_start_from_latest_stage() {
        let (service, store) = service();
        store.append_bounded("u1", JourneyStage::Crisis).await.unwrap();

        // Every gate of the requested edge is satisfied; only the start stage is wrong
        let context = TransitionContext::default()
            .with_community_validation()
            .with_completed(["peer_support_contributed", "advocacy_training_completed"]);
        let err = service
            .request_transition(&request(
                JourneyStage::CommunityHealing,
                JourneyStage::Advocacy,
                context,
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::StageMismatch {
                current: JourneyStage::Crisis,
                requested: JourneyStage::CommunityHealing,
            }
        ));
        assert_eq!(store.get("u1").await.unwrap(), vec![JourneyStage::Crisis]);
    }

    #[tokio::test]
    async fn test_empty_history_starts_in_crisis() {
        let (service, store) = service();
        let context = TransitionContext::default()
            .with_completed(["personal_goals_set", "community_introduction_completed"]);

        let err = service
            .request_transition(&request(JourneyStage::Stabilization, JourneyStage::Growth, context))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::StageMismatch { current: JourneyStage::Crisis, .. }));
        assert!(store.get("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refused_transition_leaves_history() {
        let (service, store) = service();
        store.append_bounded("u1", JourneyStage::Growth).await.unwrap();

        let context = TransitionContext::default()
            .with_completed(["personal_goals_set", "community_introduction_completed"]);
        let result = service
            .request_transition(&request(JourneyStage::Growth, JourneyStage::CommunityHealing, context))
            .await
            .unwrap();

        assert!(!result.success);
        let decision = result.data.unwrap();
        assert!(!decision.recorded);
        assert!(!decision.readiness.community_gate_passed);
        assert_eq!(decision.history, vec![JourneyStage::Growth]);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r == "Moving to community healing needs community validation first."));
    }

    #[tokio::test]
    async fn test_critical_violation_blocks_recording() {
        let (service, store) = service();
        let context = TransitionContext::default()
            .with_completed(["safety_plan_in_place", "immediate_needs_met"]);
        let mut req = request(JourneyStage::Crisis, JourneyStage::Stabilization, context);
        // Sovereignty fails critically; the other passing dimensions still clear the user bar
        req.values = LiberationValues::new(0.5, true, 0.9, 0.9, 0.9);

        let result = service.request_transition(&req).await.unwrap();

        assert!(!result.success);
        assert!(result.data.as_ref().unwrap().readiness.ready);
        assert!(!result.data.unwrap().recorded);
        assert!(store.get("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_next_stage_hint_reads_history() {
        let (service, store) = service();
        for stage in [
            JourneyStage::Stabilization,
            JourneyStage::Growth,
            JourneyStage::Stabilization,
        ] {
            store.append_bounded("u1", stage).await.unwrap();
        }

        let context = JourneyContext {
            stage: JourneyStage::Stabilization,
            ..Default::default()
        };
        assert!(service.next_stage_hint("u1", &context).await.unwrap());
        assert!(!service.next_stage_hint("u2", &context).await.unwrap());
    }
}
