//! Keyword sets for stage classification and its sub-classifiers.

use crate::journey::JourneyStage;

const CRISIS_PHRASES: &[&str] = &[
    "crisis",
    "emergency",
    "suicidal",
    "kill myself",
    "end it all",
    "unsafe",
    "not safe",
    "homeless",
    "kicked out",
    "nowhere to go",
    "nowhere to sleep",
    "attacked",
    "assaulted",
    "can't cope",
    "cannot cope",
    "desperate",
    "help me now",
    "in danger",
    "abuse",
    "overdose",
    "self harm",
    "self-harm",
];

const STABILIZATION_PHRASES: &[&str] = &[
    "housing",
    "stable",
    "settle",
    "routine",
    "therapy",
    "counselling",
    "counseling",
    "benefits",
    "universal credit",
    "job search",
    "support worker",
    "safe space",
    "back on my feet",
    "coping",
    "medication",
    "appointment",
    "budget",
    "bills",
];

const GROWTH_PHRASES: &[&str] = &[
    "learn",
    "grow",
    "skills",
    "training",
    "course",
    "confidence",
    "goals",
    "career",
    "education",
    "explore",
    "identity",
    "self-care",
    "self care",
    "progress",
    "mentor",
    "creative",
    "healing journey",
];

const COMMUNITY_HEALING_PHRASES: &[&str] = &[
    "community",
    "connect",
    "together",
    "support group",
    "belong",
    "peer support",
    "healing circle",
    "chosen family",
    "share my story",
    "others like me",
    "mutual aid",
    "solidarity",
    "meet people",
    "friends",
];

const ADVOCACY_PHRASES: &[&str] = &[
    "advocate",
    "advocacy",
    "organise",
    "organize",
    "campaign",
    "activism",
    "activist",
    "policy",
    "change the system",
    "protest",
    "speak out",
    "mentor others",
    "volunteer",
    "rights",
    "justice",
    "movement",
];

/// Phrases signalling a stage.
pub fn stage_phrases(stage: JourneyStage) -> &'static [&'static str] {
    match stage {
        JourneyStage::Crisis => CRISIS_PHRASES,
        JourneyStage::Stabilization => STABILIZATION_PHRASES,
        JourneyStage::Growth => GROWTH_PHRASES,
        JourneyStage::CommunityHealing => COMMUNITY_HEALING_PHRASES,
        JourneyStage::Advocacy => ADVOCACY_PHRASES,
    }
}

pub const CRISIS_AFFECT: &[&str] = &[
    "suicidal",
    "hopeless",
    "can't go on",
    "end it all",
    "kill myself",
    "terrified",
    "panic",
    "falling apart",
    "breaking down",
    "worthless",
];

pub const STRUGGLING_AFFECT: &[&str] = &[
    "sad",
    "anxious",
    "stressed",
    "lonely",
    "tired",
    "overwhelmed",
    "struggling",
    "depressed",
    "scared",
    "angry",
    "feeling low",
];

pub const POSITIVE_AFFECT: &[&str] = &[
    "happy",
    "hopeful",
    "excited",
    "grateful",
    "proud",
    "better",
    "good",
    "joy",
    "confident",
    "thriving",
    "strong",
];

/// Any of these makes a message an emergency regardless of other signals.
pub const EMERGENCY_MARKERS: &[&str] = &[
    "emergency",
    "999",
    "right now",
    "immediately",
    "suicidal",
    "kill myself",
    "overdose",
    "in danger",
    "being attacked",
    "bleeding",
];

pub const HIGH_URGENCY_MARKERS: &[&str] = &[
    "urgent",
    "asap",
    "as soon as possible",
    "today",
    "tonight",
    "can't wait",
    "quickly",
    "desperate",
];

/// UK gazetteer as (lowercase needle, display name), in match order.
pub const UK_CITIES: &[(&str, &str)] = &[
    ("london", "London"),
    ("manchester", "Manchester"),
    ("birmingham", "Birmingham"),
    ("leeds", "Leeds"),
    ("liverpool", "Liverpool"),
    ("bristol", "Bristol"),
    ("glasgow", "Glasgow"),
    ("edinburgh", "Edinburgh"),
    ("cardiff", "Cardiff"),
    ("belfast", "Belfast"),
    ("sheffield", "Sheffield"),
    ("nottingham", "Nottingham"),
    ("newcastle", "Newcastle"),
    ("brighton", "Brighton"),
    ("leicester", "Leicester"),
    ("coventry", "Coventry"),
    ("bradford", "Bradford"),
    ("southampton", "Southampton"),
    ("plymouth", "Plymouth"),
    ("oxford", "Oxford"),
    ("cambridge", "Cambridge"),
    ("swansea", "Swansea"),
    ("aberdeen", "Aberdeen"),
    ("dundee", "Dundee"),
    ("derby", "Derby"),
    ("wolverhampton", "Wolverhampton"),
    ("luton", "Luton"),
];

pub const ORGANIZING_MARKERS: &[&str] = &[
    "organise",
    "organize",
    "organising",
    "organizing",
    "campaign",
    "activist",
    "running a group",
    "coordinate",
    "collective action",
    "mobilis",
    "mobiliz",
];

/// Checked before [`CONNECTION_MARKERS`] so "no friends" reads as isolation.
pub const ISOLATION_MARKERS: &[&str] = &[
    "alone",
    "lonely",
    "isolated",
    "no one",
    "nobody",
    "no friends",
    "cut off",
    "no support",
    "by myself",
];

pub const CONNECTION_MARKERS: &[&str] = &[
    "friends",
    "community",
    "support group",
    "chosen family",
    "partner",
    "my people",
    "network",
    "family",
    "peers",
];

pub const PHONE_CHANNEL: &[&str] = &[
    "call",
    "phone",
    "ring me",
    "helpline",
    "hotline",
    "speak to someone",
    "talk to someone",
];

pub const ONLINE_CHANNEL: &[&str] = &[
    "online",
    "chat",
    "email",
    "website",
    "message",
    "text me",
    "zoom",
    "video",
];

pub const IN_PERSON_CHANNEL: &[&str] = &[
    "in person",
    "in-person",
    "face to face",
    "face-to-face",
    "meet",
    "drop-in",
    "drop in",
    "visit",
    "come in",
];
