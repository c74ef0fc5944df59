//! Stage progression rules.
//!
//! The transition graph is a fixed chain of four edges. A transition is only
//! permitted when every gate on its rule passes; asking for an edge that does
//! not exist is an error rather than a silent default.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::journey::{CommunityConnection, JourneyContext, JourneyStage, UrgencyLevel};
use crate::policy::{DimensionWeights, PolicyConfig, ReadinessPolicy};
use crate::types::{LiberationError, LiberationValues, ProgressionRule, Result, ValidationMode};
use crate::validator::ValueValidator;

/// Caller-supplied signals for a transition request.
///
/// The engine does not run votes or track milestones itself; it only consumes
/// their outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionContext {
    /// Whether the community signed off on the move
    pub community_validated: bool,
    /// Empowerment requirements the user has completed
    pub completed_requirements: HashSet<String>,
}

impl TransitionContext {
    /// Builder: mark community validation as given.
    pub fn with_community_validation(mut self) -> Self {
        self.community_validated = true;
        self
    }

    /// Builder: mark requirements as completed.
    pub fn with_completed<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.completed_requirements
            .extend(requirements.into_iter().map(Into::into));
        self
    }
}

/// Per-gate outcome of a readiness evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessAssessment {
    /// All gates passed
    pub ready: bool,
    /// Empowerment score of the rule's own criteria
    pub rule_criteria_score: f64,
    /// Rule criteria reached the rule bar
    pub rule_criteria_sound: bool,
    /// Empowerment score of the user's values
    pub user_score: f64,
    /// User values reached the user bar
    pub user_qualifies: bool,
    /// Community gate passed (trivially when not required)
    pub community_gate_passed: bool,
    /// Requirements not yet completed, in rule order
    pub unmet_requirements: Vec<String>,
}

/// Holds the transition graph and evaluates readiness.
#[derive(Debug, Clone)]
pub struct ProgressionRuleEngine {
    rules: Vec<ProgressionRule>,
    validator: ValueValidator,
    weights: DimensionWeights,
    readiness: ReadinessPolicy,
}

impl ProgressionRuleEngine {
    /// Create an engine with the default policy.
    pub fn new() -> Self {
        Self::with_policy(&PolicyConfig::default())
    }

    /// Create an engine from a policy.
    pub fn with_policy(policy: &PolicyConfig) -> Self {
        let engine = Self {
            rules: Self::default_rules(),
            validator: ValueValidator::with_policy(policy),
            weights: policy.service_weights.progression.clone(),
            readiness: policy.readiness.clone(),
        };

        for (from, to, score) in engine.verify_rule_table() {
            warn!(
                from = %from,
                to = %to,
                score = score,
                required = engine.readiness.rule_criteria_min_score,
                "Progression rule criteria fall short of the rule bar"
            );
        }

        engine
    }

    /// The fixed transition table.
    pub fn default_rules() -> Vec<ProgressionRule> {
        vec![
            ProgressionRule {
                from_stage: JourneyStage::Crisis,
                to_stage: JourneyStage::Stabilization,
                liberation_criteria: LiberationValues::new(0.75, true, 0.60, 0.80, 0.65),
                empowerment_requirements: vec![
                    "safety_plan_in_place".to_string(),
                    "immediate_needs_met".to_string(),
                ],
                community_validation: false,
            },
            ProgressionRule {
                from_stage: JourneyStage::Stabilization,
                to_stage: JourneyStage::Growth,
                liberation_criteria: LiberationValues::new(0.80, true, 0.65, 0.75, 0.70),
                empowerment_requirements: vec![
                    "basic_needs_secured".to_string(),
                    "support_network_identified".to_string(),
                ],
                community_validation: false,
            },
            ProgressionRule {
                from_stage: JourneyStage::Growth,
                to_stage: JourneyStage::CommunityHealing,
                liberation_criteria: LiberationValues::new(0.80, true, 0.70, 0.80, 0.75),
                empowerment_requirements: vec![
                    "personal_goals_set".to_string(),
                    "community_introduction_completed".to_string(),
                ],
                community_validation: true,
            },
            ProgressionRule {
                from_stage: JourneyStage::CommunityHealing,
                to_stage: JourneyStage::Advocacy,
                liberation_criteria: LiberationValues::new(0.85, true, 0.80, 0.85, 0.80),
                empowerment_requirements: vec![
                    "peer_support_contributed".to_string(),
                    "advocacy_training_completed".to_string(),
                ],
                community_validation: true,
            },
        ]
    }

    /// All rules in chain order.
    pub fn rules(&self) -> &[ProgressionRule] {
        &self.rules
    }

    /// Find the rule for an edge.
    pub fn find_rule(&self, from: JourneyStage, to: JourneyStage) -> Option<&ProgressionRule> {
        self.rules
            .iter()
            .find(|r| r.from_stage == from && r.to_stage == to)
    }

    /// Find the rule for an edge, failing if the edge does not exist.
    pub fn require_rule(&self, from: JourneyStage, to: JourneyStage) -> Result<&ProgressionRule> {
        self.find_rule(from, to).ok_or_else(|| {
            warn!(from = %from, to = %to, "Rejected undefined transition");
            LiberationError::UndefinedTransition { from, to }
        })
    }

    /// Whether every gate on the rule passes.
    pub fn assess_readiness(
        &self,
        rule: &ProgressionRule,
        context: &TransitionContext,
        values: &LiberationValues,
    ) -> bool {
        self.evaluate_readiness(rule, context, values).ready
    }

    /// Evaluate each gate on the rule.
    ///
    /// The rule's own criteria are held to a stricter bar than the user's
    /// values; both bars come from [`ReadinessPolicy`].
    pub fn evaluate_readiness(
        &self,
        rule: &ProgressionRule,
        context: &TransitionContext,
        values: &LiberationValues,
    ) -> ReadinessAssessment {
        let rule_criteria_score = self.score(&rule.liberation_criteria);
        let rule_criteria_sound = rule_criteria_score >= self.readiness.rule_criteria_min_score;

        let user_score = self.score(values);
        let user_qualifies = user_score >= self.readiness.user_min_score;

        let community_gate_passed = !rule.community_validation || context.community_validated;

        let unmet_requirements: Vec<String> = rule
            .empowerment_requirements
            .iter()
            .filter(|r| !context.completed_requirements.contains(*r))
            .cloned()
            .collect();

        let ready = rule_criteria_sound
            && user_qualifies
            && community_gate_passed
            && unmet_requirements.is_empty();

        debug!(
            from = %rule.from_stage,
            to = %rule.to_stage,
            ready = ready,
            rule_criteria_score = rule_criteria_score,
            user_score = user_score,
            community_gate_passed = community_gate_passed,
            unmet = unmet_requirements.len(),
            "Transition readiness evaluated"
        );

        ReadinessAssessment {
            ready,
            rule_criteria_score,
            rule_criteria_sound,
            user_score,
            user_qualifies,
            community_gate_passed,
            unmet_requirements,
        }
    }

    /// Advisory hint: might this user be ready to move on?
    ///
    /// `history` is expected to include the current observation. This never
    /// authorizes a transition; only [`Self::assess_readiness`] does.
    pub fn assess_next_stage_readiness(
        &self,
        stage: JourneyStage,
        history: &[JourneyStage],
        context: &JourneyContext,
    ) -> bool {
        if stage == JourneyStage::Advocacy || context.urgency_level == UrgencyLevel::Emergency {
            return false;
        }
        if context.community_connection == CommunityConnection::Organizing {
            return true;
        }

        let observations = |target: JourneyStage| history.iter().filter(|s| **s == target).count();
        let settled = self.readiness.settled_stage_observations;

        match stage {
            JourneyStage::Crisis => {
                observations(JourneyStage::Crisis) > self.readiness.prior_crisis_observations
            }
            // Reaching growth before and coming back is resilience, not failure
            JourneyStage::Stabilization => {
                history.iter().any(|s| *s >= JourneyStage::Growth)
                    || observations(JourneyStage::Stabilization) >= settled
            }
            JourneyStage::Growth | JourneyStage::CommunityHealing => {
                context.community_connection == CommunityConnection::Connected
                    && observations(stage) >= settled
            }
            JourneyStage::Advocacy => false,
        }
    }

    /// Rules whose criteria fall short of the rule bar, with their scores.
    pub fn verify_rule_table(&self) -> Vec<(JourneyStage, JourneyStage, f64)> {
        self.rules
            .iter()
            .map(|r| (r.from_stage, r.to_stage, self.score(&r.liberation_criteria)))
            .filter(|(_, _, score)| *score < self.readiness.rule_criteria_min_score)
            .collect()
    }

    fn score(&self, values: &LiberationValues) -> f64 {
        self.validator
            .validate_weighted(values, ValidationMode::CriticalOnly, &self.weights)
            .empowerment_score
    }
}

impl Default for ProgressionRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_values() -> LiberationValues {
        LiberationValues::new(0.9, true, 0.9, 0.9, 0.9)
    }

    fn all_requirements(rule: &ProgressionRule) -> TransitionContext {
        TransitionContext::default().with_completed(rule.empowerment_requirements.clone())
    }

    #[test]
    fn test_chain_has_no_skips() {
        let engine = ProgressionRuleEngine::new();
        assert_eq!(engine.rules().len(), 4);
        assert!(engine
            .find_rule(JourneyStage::Crisis, JourneyStage::Stabilization)
            .is_some());
        assert!(engine.find_rule(JourneyStage::Crisis, JourneyStage::Growth).is_none());
        assert!(engine
            .find_rule(JourneyStage::Stabilization, JourneyStage::Crisis)
            .is_none());

        for rule in engine.rules() {
            assert_eq!(rule.from_stage.next(), Some(rule.to_stage));
        }
    }

    #[test]
    fn test_undefined_transition_fails_loudly() {
        let engine = ProgressionRuleEngine::new();
        let err = engine
            .require_rule(JourneyStage::Crisis, JourneyStage::Advocacy)
            .unwrap_err();
        assert!(matches!(
            err,
            LiberationError::UndefinedTransition {
                from: JourneyStage::Crisis,
                to: JourneyStage::Advocacy
            }
        ));
        assert_eq!(err.to_string(), "Undefined transition: crisis -> advocacy");
    }

    #[test]
    fn test_default_rule_table_is_sound() {
        let engine = ProgressionRuleEngine::new();
        assert!(engine.verify_rule_table().is_empty());
    }

    #[test]
    fn test_ready_when_all_gates_pass() {
        let engine = ProgressionRuleEngine::new();
        let rule = engine
            .find_rule(JourneyStage::Crisis, JourneyStage::Stabilization)
            .unwrap();

        assert!(engine.assess_readiness(rule, &all_requirements(rule), &strong_values()));
    }

    #[test]
    fn test_unmet_requirement_blocks() {
        let engine = ProgressionRuleEngine::new();
        let rule = engine
            .find_rule(JourneyStage::Crisis, JourneyStage::Stabilization)
            .unwrap();
        let context = TransitionContext::default().with_completed(["safety_plan_in_place"]);

        let assessment = engine.evaluate_readiness(rule, &context, &strong_values());
        assert!(!assessment.ready);
        assert_eq!(assessment.unmet_requirements, vec!["immediate_needs_met".to_string()]);
    }

    #[test]
    fn test_community_validation_gate() {
        let engine = ProgressionRuleEngine::new();
        let rule = engine
            .find_rule(JourneyStage::Growth, JourneyStage::CommunityHealing)
            .unwrap();
        assert!(rule.community_validation);

        let without = all_requirements(rule);
        assert!(!engine.assess_readiness(rule, &without, &strong_values()));

        let with = all_requirements(rule).with_community_validation();
        assert!(engine.assess_readiness(rule, &with, &strong_values()));
    }

    #[test]
    fn test_user_score_gate() {
        let engine = ProgressionRuleEngine::new();
        let rule = engine
            .find_rule(JourneyStage::Crisis, JourneyStage::Stabilization)
            .unwrap();

        // Only anti-oppression (0.3) and sovereignty (0.2 * 0.8) pass
        let weak = LiberationValues::new(0.8, true, 0.1, 0.1, 0.1);
        let assessment = engine.evaluate_readiness(rule, &all_requirements(rule), &weak);
        assert!(!assessment.user_qualifies);
        assert!(!assessment.ready);
        assert!(assessment.rule_criteria_sound);
    }

    #[test]
    fn test_unsound_rule_criteria_block() {
        let engine = ProgressionRuleEngine::new();
        let mut rule = engine
            .find_rule(JourneyStage::Crisis, JourneyStage::Stabilization)
            .unwrap()
            .clone();
        // Scores 0.2*0.75 + 0.3 + 0.3*0.6 = 0.63, above the user bar but below the rule bar
        rule.liberation_criteria = LiberationValues::new(0.75, true, 0.60, 0.1, 0.1);

        let assessment = engine.evaluate_readiness(&rule, &all_requirements(&rule), &strong_values());
        assert!(!assessment.rule_criteria_sound);
        assert!(!assessment.ready);
    }

    #[test]
    fn test_crisis_history_boundary() {
        let engine = ProgressionRuleEngine::new();
        let context = JourneyContext::default();

        let three = vec![JourneyStage::Crisis; 3];
        assert!(!engine.assess_next_stage_readiness(JourneyStage::Crisis, &three, &context));

        let four = vec![JourneyStage::Crisis; 4];
        assert!(engine.assess_next_stage_readiness(JourneyStage::Crisis, &four, &context));
    }

    #[test]
    fn test_relapse_after_growth_counts_as_resilience() {
        let engine = ProgressionRuleEngine::new();
        let history = vec![
            JourneyStage::Stabilization,
            JourneyStage::Growth,
            JourneyStage::Stabilization,
        ];
        assert!(engine.assess_next_stage_readiness(
            JourneyStage::Stabilization,
            &history,
            &JourneyContext::default()
        ));
    }

    #[test]
    fn test_organizing_is_ready_except_at_advocacy() {
        let engine = ProgressionRuleEngine::new();
        let context = JourneyContext {
            community_connection: CommunityConnection::Organizing,
            ..Default::default()
        };

        assert!(engine.assess_next_stage_readiness(JourneyStage::Growth, &[], &context));
        assert!(!engine.assess_next_stage_readiness(JourneyStage::Advocacy, &[], &context));
    }

    #[test]
    fn test_emergency_is_never_ready() {
        let engine = ProgressionRuleEngine::new();
        let context = JourneyContext {
            urgency_level: UrgencyLevel::Emergency,
            community_connection: CommunityConnection::Organizing,
            ..Default::default()
        };
        let history = vec![JourneyStage::Crisis; 5];
        assert!(!engine.assess_next_stage_readiness(JourneyStage::Crisis, &history, &context));
    }

    #[test]
    fn test_growth_needs_connection_and_time() {
        let engine = ProgressionRuleEngine::new();
        let connected = JourneyContext {
            community_connection: CommunityConnection::Connected,
            ..Default::default()
        };
        let history = vec![JourneyStage::Growth; 3];

        assert!(engine.assess_next_stage_readiness(JourneyStage::Growth, &history, &connected));
        assert!(!engine.assess_next_stage_readiness(
            JourneyStage::Growth,
            &history,
            &JourneyContext::default()
        ));
        assert!(!engine.assess_next_stage_readiness(JourneyStage::Growth, &history[..2], &connected));
    }
}
