//! Journey stage classification.
//!
//! Scores free text against each stage's phrase set, adjusts for the user's
//! recent history and fills in the remaining [`JourneyContext`] fields from
//! independent keyword sub-classifiers. Classification never fails: text with
//! no signal produces the most conservative context.

use serde::Serialize;
use tracing::debug;

use crate::catalog::stages::{
    stage_phrases, CONNECTION_MARKERS, CRISIS_AFFECT, EMERGENCY_MARKERS, HIGH_URGENCY_MARKERS,
    IN_PERSON_CHANNEL, ISOLATION_MARKERS, ONLINE_CHANNEL, ORGANIZING_MARKERS, PHONE_CHANNEL,
    POSITIVE_AFFECT, STRUGGLING_AFFECT, UK_CITIES,
};
use crate::catalog::{contains_any, matched_phrases};
use crate::journey::{
    CommunityConnection, EmotionalState, JourneyContext, JourneyStage, ResourcePreference,
    UrgencyLevel, UserProfile, UNKNOWN_LOCATION,
};
use crate::policy::{ClassifierPolicy, PolicyConfig};

/// Score for one candidate stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageScore {
    pub stage: JourneyStage,
    /// Total after history adjustments
    pub score: f64,
    /// Phrases that contributed
    pub matched: Vec<&'static str>,
}

/// Full scoring table behind a stage decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAssessment {
    pub stage: JourneyStage,
    /// One entry per stage in canonical order
    pub scores: Vec<StageScore>,
}

/// Keyword-based stage classifier.
#[derive(Debug, Clone)]
pub struct StageClassifier {
    policy: ClassifierPolicy,
}

impl StageClassifier {
    /// Create a classifier with the default policy.
    pub fn new() -> Self {
        Self::with_policy(&PolicyConfig::default())
    }

    /// Create a classifier from a policy.
    pub fn with_policy(policy: &PolicyConfig) -> Self {
        Self {
            policy: policy.classifier.clone(),
        }
    }

    /// Build the full context for one turn.
    pub fn detect_stage(
        &self,
        text: &str,
        history: &[JourneyStage],
        profile: Option<&UserProfile>,
    ) -> JourneyContext {
        let lowered = text.to_lowercase();
        let assessment = self.assess_lowered(&lowered, history);

        let location = detect_location(&lowered)
            .map(str::to_string)
            .or_else(|| profile.and_then(|p| p.location.clone()))
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        let resource_access_preference = match detect_resource_preference(&lowered) {
            ResourcePreference::NoPreference => profile
                .and_then(|p| p.preferred_channel)
                .unwrap_or(ResourcePreference::NoPreference),
            preference => preference,
        };

        let first_time =
            history.is_empty() && profile.and_then(|p| p.visit_count).unwrap_or(0) == 0;

        let context = JourneyContext {
            stage: assessment.stage,
            emotional_state: detect_emotional_state(&lowered),
            urgency_level: detect_urgency(&lowered),
            location,
            community_connection: detect_community_connection(&lowered),
            first_time,
            returning_user: !first_time,
            resource_access_preference,
        };

        debug!(
            stage = %context.stage,
            urgency = ?context.urgency_level,
            emotional_state = ?context.emotional_state,
            history_len = history.len(),
            "Journey context detected"
        );

        context
    }

    /// Score every stage and pick the winner.
    pub fn assess_stage(&self, text: &str, history: &[JourneyStage]) -> StageAssessment {
        self.assess_lowered(&text.to_lowercase(), history)
    }

    fn assess_lowered(&self, lowered: &str, history: &[JourneyStage]) -> StageAssessment {
        let latest = history.last().copied();

        let scores: Vec<StageScore> = JourneyStage::all()
            .into_iter()
            .map(|stage| {
                let matched = matched_phrases(lowered, stage_phrases(stage));
                let mut score = matched.len() as f64 * self.policy.keyword_increment;

                if let Some(latest) = latest {
                    if stage == latest {
                        score += self.policy.continuity_bonus;
                    } else if stage.index() > latest.index() + 1 {
                        score -= self.policy.skip_penalty;
                    }
                }

                StageScore {
                    stage,
                    score,
                    matched,
                }
            })
            .collect();

        // Strictly greater only, so ties keep the earlier stage
        let mut best = &scores[0];
        for candidate in &scores[1..] {
            if candidate.score > best.score {
                best = candidate;
            }
        }
        let stage = best.stage;

        StageAssessment { stage, scores }
    }
}

impl Default for StageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Affect bucket; crisis language outranks everything else.
pub fn detect_emotional_state(lowered: &str) -> EmotionalState {
    if contains_any(lowered, CRISIS_AFFECT) {
        EmotionalState::Crisis
    } else if contains_any(lowered, STRUGGLING_AFFECT) {
        EmotionalState::Struggling
    } else if contains_any(lowered, POSITIVE_AFFECT) {
        EmotionalState::Positive
    } else {
        EmotionalState::Neutral
    }
}

/// Urgency; any emergency marker short-circuits.
pub fn detect_urgency(lowered: &str) -> UrgencyLevel {
    if contains_any(lowered, EMERGENCY_MARKERS) {
        return UrgencyLevel::Emergency;
    }
    if contains_any(lowered, HIGH_URGENCY_MARKERS) {
        UrgencyLevel::High
    } else {
        UrgencyLevel::Normal
    }
}

/// First gazetteer city named in the text.
pub fn detect_location(lowered: &str) -> Option<&'static str> {
    UK_CITIES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, display)| *display)
}

/// Connection tier; organizing, then isolation, then connection markers.
pub fn detect_community_connection(lowered: &str) -> CommunityConnection {
    if contains_any(lowered, ORGANIZING_MARKERS) {
        CommunityConnection::Organizing
    } else if contains_any(lowered, ISOLATION_MARKERS) {
        CommunityConnection::Isolated
    } else if contains_any(lowered, CONNECTION_MARKERS) {
        CommunityConnection::Connected
    } else {
        CommunityConnection::Unknown
    }
}

/// Channel with the most keyword hits; ties resolve phone, online, in person.
pub fn detect_resource_preference(lowered: &str) -> ResourcePreference {
    let candidates = [
        (ResourcePreference::Phone, matched_phrases(lowered, PHONE_CHANNEL).len()),
        (ResourcePreference::Online, matched_phrases(lowered, ONLINE_CHANNEL).len()),
        (ResourcePreference::InPerson, matched_phrases(lowered, IN_PERSON_CHANNEL).len()),
    ];

    let mut best = (ResourcePreference::NoPreference, 0);
    for (preference, hits) in candidates {
        if hits > best.1 {
            best = (preference, hits);
        }
    }
    best.0
}
