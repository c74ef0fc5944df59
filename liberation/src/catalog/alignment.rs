//! Liberation-alignment keyword sets.
//!
//! Positive signals that content or a message builds up Black queer community.

use super::PatternCategory;

pub const ALIGNMENT_CATEGORIES: &[PatternCategory] = &[
    PatternCategory {
        name: "community_care",
        phrases: &[
            "mutual aid",
            "community care",
            "collective",
            "solidarity",
            "support each other",
        ],
    },
    PatternCategory {
        name: "black_joy",
        phrases: &[
            "black joy",
            "black excellence",
            "black love",
            "celebrate blackness",
            "black-owned",
        ],
    },
    PatternCategory {
        name: "queer_affirmation",
        phrases: &[
            "queer joy",
            "trans joy",
            "pride",
            "affirming",
            "chosen family",
            "lgbtq",
        ],
    },
    PatternCategory {
        name: "economic_justice",
        phrases: &[
            "fair pay",
            "revenue share",
            "cooperative",
            "co-op",
            "creator ownership",
            "living wage",
            "reparations",
        ],
    },
    PatternCategory {
        name: "cultural_heritage",
        phrases: &[
            "heritage",
            "ancestral",
            "ancestors",
            "diaspora",
            "tradition",
            "afrofuturism",
        ],
    },
    PatternCategory {
        name: "safety_and_healing",
        phrases: &[
            "safe space",
            "healing",
            "wellbeing",
            "trauma-informed",
            "consent",
        ],
    },
];
