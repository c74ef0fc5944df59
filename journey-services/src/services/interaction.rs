//! Conversational turn processing.

use std::sync::Arc;

use liberation::impact;
use liberation::{
    BusinessLogicOperationResult, ImpactScores, IndicatorSeverity, JourneyContext, JourneyStage,
    LiberationValues, OperationOutcome, OppressionIndicator, OppressionScanner, PolicyConfig,
    ProgressionRuleEngine, ResourcePreference, ResultAggregator, StageClassifier, UrgencyLevel,
    UserProfile, ValidationMode, ValueValidator, ViolationType,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ServicesConfig;
use crate::history::JourneyHistoryStore;
use crate::types::{require_user_id, Result};

/// One message from a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionTurn {
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub values: LiberationValues,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// What was learned from one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnAssessment {
    pub context: JourneyContext,
    /// History after recording this turn, oldest first
    pub history: Vec<JourneyStage>,
    /// Advisory hint only; transitions go through the progression service
    pub ready_for_next_stage: bool,
    pub next_stage: Option<JourneyStage>,
    pub indicators: Vec<OppressionIndicator>,
}

/// Processes conversational turns against a user's journey.
pub struct InteractionService {
    classifier: StageClassifier,
    scanner: OppressionScanner,
    validator: ValueValidator,
    engine: ProgressionRuleEngine,
    policy: PolicyConfig,
    store: Arc<dyn JourneyHistoryStore>,
}

impl InteractionService {
    /// Create the service over a history store.
    pub fn new(config: &ServicesConfig, store: Arc<dyn JourneyHistoryStore>) -> Self {
        Self {
            classifier: StageClassifier::with_policy(&config.policy),
            scanner: OppressionScanner::with_policy(&config.policy),
            validator: ValueValidator::with_policy(&config.policy),
            engine: ProgressionRuleEngine::with_policy(&config.policy),
            policy: config.policy.clone(),
            store,
        }
    }

    /// Classify a turn, record it and build support recommendations.
    ///
    /// Fails only on a blank user id or a history store error. The turn
    /// passes unless the message contains critical harmful language.
    pub async fn process_turn(&self, turn: &InteractionTurn) -> Result<BusinessLogicOperationResult<TurnAssessment>> {
        require_user_id(&turn.user_id)?;

        let prior = self.store.get(&turn.user_id).await?;
        let context = self
            .classifier
            .detect_stage(&turn.message, &prior, turn.profile.as_ref());
        let history = self.store.append_bounded(&turn.user_id, context.stage).await?;

        let ready_for_next_stage = self
            .engine
            .assess_next_stage_readiness(context.stage, &history, &context);

        let indicators = self.scanner.scan(&turn.message);
        let critical = OppressionScanner::highest_severity(&indicators) == Some(IndicatorSeverity::Critical);

        let validation = self.validator.validate_weighted(
            &turn.values,
            ValidationMode::CriticalOnly,
            &self.policy.service_weights.interaction,
        );

        let alignment = impact::alignment(&turn.message);
        let scores = ImpactScores {
            empowerment_impact: impact::empowerment_impact(&turn.values, alignment.score, &self.policy.impact),
            community_benefit: impact::community_benefit(&turn.values, alignment.score, &self.policy.impact),
            sovereignty_compliance: impact::sovereignty_compliance(
                turn.values.score(ViolationType::CreatorSovereignty).unwrap_or(0.0),
                &self.policy.thresholds,
            ),
        };

        let next_stage = context.stage.next();
        let mut messages = support_messages(&context, ready_for_next_stage.then_some(next_stage).flatten());
        if critical {
            messages.extend(
                indicators
                    .iter()
                    .filter(|i| i.severity == IndicatorSeverity::Critical)
                    .map(|i| format!("This message contains harmful language: {}", i.remedy)),
            );
        }

        info!(
            user_id = %turn.user_id,
            stage = %context.stage,
            urgency = ?context.urgency_level,
            history_len = history.len(),
            ready_for_next_stage = ready_for_next_stage,
            indicators = indicators.len(),
            "Interaction turn processed"
        );

        let assessment = TurnAssessment {
            context,
            history,
            ready_for_next_stage,
            next_stage,
            indicators,
        };

        let outcome = if critical {
            OperationOutcome::failed(Some(assessment))
        } else {
            OperationOutcome::passed(assessment)
        };

        Ok(ResultAggregator::assemble(outcome.with_messages(messages), validation, scores))
    }
}

/// Stage- and channel-specific support messages, most urgent first.
fn support_messages(context: &JourneyContext, ready_for: Option<JourneyStage>) -> Vec<String> {
    let mut messages = Vec::new();

    if context.urgency_level == UrgencyLevel::Emergency {
        messages.push(
            "If you are in immediate danger, call 999 now. Samaritans are free on 116 123, day or night."
                .to_string(),
        );
    }

    messages.push(
        match context.stage {
            JourneyStage::Crisis => {
                "Your safety comes first. Let's find somewhere safe and someone who can be with you."
            }
            JourneyStage::Stabilization => {
                "Let's build steady ground: housing, income and health support you can rely on."
            }
            JourneyStage::Growth => {
                "You're building momentum. Skills workshops and mentoring can help you keep going."
            }
            JourneyStage::CommunityHealing => {
                "Healing circles and peer spaces can hold you while you hold others."
            }
            JourneyStage::Advocacy => {
                "Your experience can change things. Organising and advocacy training are open to you."
            }
        }
        .to_string(),
    );

    match context.resource_access_preference {
        ResourcePreference::Phone => {
            messages.push("We'll start with phone lines you can call.".to_string())
        }
        ResourcePreference::Online => {
            messages.push("We'll start with online and chat-based support.".to_string())
        }
        ResourcePreference::InPerson => messages.push(format!(
            "We'll look for drop-in and face-to-face support{}.",
            if context.location == liberation::UNKNOWN_LOCATION {
                String::new()
            } else {
                format!(" in {}", context.location)
            }
        )),
        ResourcePreference::NoPreference => {}
    }

    if let Some(next) = ready_for {
        messages.push(format!(
            "You may be ready to explore {} when it feels right.",
            next.as_str().replace('_', " ")
        ));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryHistoryStore;

    fn service() -> InteractionService {
        InteractionService::new(&ServicesConfig::default(), Arc::new(InMemoryHistoryStore::default()))
    }

    fn turn(user_id: &str, message: &str) -> InteractionTurn {
        InteractionTurn {
            user_id: user_id.to_string(),
            message: message.to_string(),
            values: LiberationValues::new(0.8, true, 0.8, 0.8, 0.8),
            profile: None,
        }
    }

    #[tokio::test]
    async fn test_crisis_turn_is_recorded() {
        let service = service();
        let result = service
            .process_turn(&turn("u1", "I've been kicked out and I'm homeless tonight"))
            .await
            .unwrap();

        assert!(result.success);
        let assessment = result.data.unwrap();
        assert_eq!(assessment.context.stage, JourneyStage::Crisis);
        assert_eq!(assessment.context.urgency_level, UrgencyLevel::High);
        assert_eq!(assessment.history, vec![JourneyStage::Crisis]);
        assert!(!assessment.ready_for_next_stage);
        assert!(result.recommendations[0].starts_with("Your safety comes first"));
    }

    #[tokio::test]
    async fn test_emergency_message_comes_first() {
        let service = service();
        let result = service
            .process_turn(&turn("u1", "I'm in danger, please help me now"))
            .await
            .unwrap();

        let assessment = result.data.as_ref().unwrap();
        assert_eq!(assessment.context.urgency_level, UrgencyLevel::Emergency);
        assert!(result.recommendations[0].contains("999"));
    }

    #[tokio::test]
    async fn test_history_carries_across_turns() {
        let service = service();
        service
            .process_turn(&turn("u1", "I feel unsafe and desperate"))
            .await
            .unwrap();
        let result = service
            .process_turn(&turn("u1", "Sorting out housing and a routine with my support worker"))
            .await
            .unwrap();

        let assessment = result.data.unwrap();
        assert_eq!(assessment.context.stage, JourneyStage::Stabilization);
        assert_eq!(assessment.history, vec![JourneyStage::Crisis, JourneyStage::Stabilization]);
        assert!(assessment.context.returning_user);
    }

    #[tokio::test]
    async fn test_organizing_user_gets_readiness_hint() {
        let service = service();
        let result = service
            .process_turn(&turn("u1", "I'm learning new skills and want to organise with others"))
            .await
            .unwrap();

        let assessment = result.data.unwrap();
        assert_eq!(assessment.context.stage, JourneyStage::Growth);
        assert!(assessment.ready_for_next_stage);
        assert_eq!(assessment.next_stage, Some(JourneyStage::CommunityHealing));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("explore community healing")));
    }

    #[tokio::test]
    async fn test_advocacy_is_terminal_even_when_organizing() {
        let service = service();
        let result = service
            .process_turn(&turn("u1", "I want to organise a campaign for trans rights in Leeds"))
            .await
            .unwrap();

        let assessment = result.data.unwrap();
        assert_eq!(assessment.context.stage, JourneyStage::Advocacy);
        assert!(!assessment.ready_for_next_stage);
        assert_eq!(assessment.next_stage, None);
        assert_eq!(assessment.context.location, "Leeds");
    }

    #[tokio::test]
    async fn test_channel_preference_message() {
        let service = service();
        let result = service
            .process_turn(&turn("u1", "Can I call a helpline about my housing?"))
            .await
            .unwrap();

        assert!(result
            .recommendations
            .iter()
            .any(|r| r == "We'll start with phone lines you can call."));
    }

    #[tokio::test]
    async fn test_critical_language_fails_turn() {
        let service = service();
        let result = service
            .process_turn(&turn("u1", "People like that deserve to die"))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.liberation_validation.is_valid);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.starts_with("This message contains harmful language")));
    }

    #[tokio::test]
    async fn test_blank_user_rejected() {
        let service = service();
        let err = service.process_turn(&turn("  ", "hello")).await.unwrap_err();
        assert!(matches!(err, crate::types::ServiceError::InvalidRequest(_)));
    }
}
