//! Journey stages and the per-turn context built around them.
//!
//! The stage ordering is the canonical support-progression axis. Lower stages
//! assume the user needs more support.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Default number of stages kept per user.
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Location reported when nothing in the text or profile names a place.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Support stage a user is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum JourneyStage {
    /// Immediate safety needs
    Crisis = 0,
    /// Meeting basic needs and building routine
    Stabilization = 1,
    /// Personal development
    Growth = 2,
    /// Healing in and with community
    CommunityHealing = 3,
    /// Changing conditions for others
    Advocacy = 4,
}

impl JourneyStage {
    /// All stages in canonical order (most support first).
    pub fn all() -> [Self; 5] {
        [
            Self::Crisis,
            Self::Stabilization,
            Self::Growth,
            Self::CommunityHealing,
            Self::Advocacy,
        ]
    }

    /// Position on the progression axis.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The stage after this one, if any.
    pub fn next(&self) -> Option<Self> {
        Self::all().get(self.index() + 1).copied()
    }

    /// The stage before this one, if any.
    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::all()[i])
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crisis => "crisis",
            Self::Stabilization => "stabilization",
            Self::Growth => "growth",
            Self::CommunityHealing => "community_healing",
            Self::Advocacy => "advocacy",
        }
    }
}

impl Default for JourneyStage {
    fn default() -> Self {
        Self::Crisis
    }
}

impl fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Affect bucket detected in the user's words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    Crisis,
    Struggling,
    #[default]
    Neutral,
    Positive,
}

/// How quickly the user needs a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    #[default]
    Normal,
    High,
    Emergency,
}

/// How connected the user is to community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CommunityConnection {
    #[default]
    Unknown,
    Isolated,
    Connected,
    Organizing,
}

/// Preferred channel for reaching support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ResourcePreference {
    #[default]
    NoPreference,
    Phone,
    Online,
    InPerson,
}

/// Optional caller-supplied knowledge about the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Known location, used when the text names none
    pub location: Option<String>,
    /// Known channel preference, used when the text expresses none
    pub preferred_channel: Option<ResourcePreference>,
    /// Prior visits recorded by the caller
    pub visit_count: Option<u32>,
}

/// Everything the classifier derived from one conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct JourneyContext {
    pub stage: JourneyStage,
    pub emotional_state: EmotionalState,
    pub urgency_level: UrgencyLevel,
    pub location: String,
    pub community_connection: CommunityConnection,
    pub first_time: bool,
    pub returning_user: bool,
    pub resource_access_preference: ResourcePreference,
}

impl Default for JourneyContext {
    fn default() -> Self {
        Self {
            stage: JourneyStage::Crisis,
            emotional_state: EmotionalState::Neutral,
            urgency_level: UrgencyLevel::Normal,
            location: UNKNOWN_LOCATION.to_string(),
            community_connection: CommunityConnection::Unknown,
            first_time: true,
            returning_user: false,
            resource_access_preference: ResourcePreference::NoPreference,
        }
    }
}

/// Bounded record of the stages observed for one user.
///
/// A stage equal to the most recent entry is not appended again, so repeats
/// collapse only when consecutive. Once over capacity the oldest entries are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JourneyHistory {
    stages: VecDeque<JourneyStage>,
}

impl JourneyHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored stages, oldest first.
    pub fn from_stages(stages: impl IntoIterator<Item = JourneyStage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Record an observed stage, keeping at most `cap` entries.
    ///
    /// Returns whether the stage was appended.
    pub fn record(&mut self, stage: JourneyStage, cap: usize) -> bool {
        let appended = self.stages.back() != Some(&stage);
        if appended {
            self.stages.push_back(stage);
        }
        while self.stages.len() > cap {
            self.stages.pop_front();
        }
        appended
    }

    /// Most recent stage.
    pub fn latest(&self) -> Option<JourneyStage> {
        self.stages.back().copied()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stages oldest first.
    pub fn to_vec(&self) -> Vec<JourneyStage> {
        self.stages.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(JourneyStage::Crisis < JourneyStage::Stabilization);
        assert!(JourneyStage::CommunityHealing < JourneyStage::Advocacy);
        assert_eq!(JourneyStage::Crisis.next(), Some(JourneyStage::Stabilization));
        assert_eq!(JourneyStage::Advocacy.next(), None);
        assert_eq!(JourneyStage::Crisis.previous(), None);
        assert_eq!(JourneyStage::Growth.previous(), Some(JourneyStage::Stabilization));
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&JourneyStage::CommunityHealing).unwrap();
        assert_eq!(json, "\"community_healing\"");
    }

    #[test]
    fn test_history_collapses_consecutive_repeats_only() {
        let mut history = JourneyHistory::new();
        assert!(history.record(JourneyStage::Crisis, DEFAULT_HISTORY_CAP));
        assert!(!history.record(JourneyStage::Crisis, DEFAULT_HISTORY_CAP));
        assert!(history.record(JourneyStage::Stabilization, DEFAULT_HISTORY_CAP));
        assert!(history.record(JourneyStage::Crisis, DEFAULT_HISTORY_CAP));

        assert_eq!(
            history.to_vec(),
            vec![
                JourneyStage::Crisis,
                JourneyStage::Stabilization,
                JourneyStage::Crisis
            ]
        );
    }

    #[test]
    fn test_history_drops_oldest_over_cap() {
        let mut history = JourneyHistory::new();
        for i in 0..25 {
            let stage = if i % 2 == 0 {
                JourneyStage::Crisis
            } else {
                JourneyStage::Stabilization
            };
            history.record(stage, DEFAULT_HISTORY_CAP);
        }

        assert_eq!(history.len(), DEFAULT_HISTORY_CAP);
        assert_eq!(history.latest(), Some(JourneyStage::Crisis));
        assert_eq!(history.to_vec()[0], JourneyStage::Stabilization);
    }
}
