//! Harmful-language categories.

use super::PatternCategory;

/// Categories scanned for oppressive language, in scan order.
pub const HARMFUL_CATEGORIES: &[PatternCategory] = &[
    PatternCategory {
        name: "racial_discrimination",
        phrases: &[
            "go back to where you came from",
            "your kind",
            "those people",
            "not welcome here",
            "racial slur",
            "thug",
        ],
    },
    PatternCategory {
        name: "homophobia",
        phrases: &[
            "unnatural",
            "just a phase",
            "pray the gay away",
            "conversion therapy",
            "disgusting lifestyle",
            "gay agenda",
        ],
    },
    PatternCategory {
        name: "transphobia",
        phrases: &[
            "real woman",
            "real man",
            "biological male",
            "deadname",
            "trans agenda",
            "gender ideology",
        ],
    },
    PatternCategory {
        name: "misogynoir",
        phrases: &["angry black woman", "too aggressive", "ghetto", "sassy black"],
    },
    PatternCategory {
        name: "tone_policing",
        phrases: &[
            "calm down",
            "too emotional",
            "overreacting",
            "race card",
            "not everything is about race",
            "too sensitive",
        ],
    },
    PatternCategory {
        name: "erasure",
        phrases: &[
            "all lives matter",
            "i don't see colour",
            "i don't see color",
            "colourblind",
            "colorblind",
            "we're all the same",
        ],
    },
    PatternCategory {
        name: "violence_threat",
        phrases: &[
            "kill you",
            "hurt you",
            "beat you",
            "violence against",
            "threat to",
            "deserve to die",
        ],
    },
    PatternCategory {
        name: "dehumanizing",
        phrases: &["animals", "vermin", "subhuman", "savages", "dehumanizing"],
    },
    PatternCategory {
        name: "economic_exploitation",
        phrases: &[
            "for exposure",
            "work for free",
            "unpaid labour",
            "unpaid labor",
            "take a cut",
            "we own your content",
        ],
    },
    PatternCategory {
        name: "cultural_appropriation",
        phrases: &["exotic", "urban style", "tribal trend", "costume"],
    },
];

/// Any phrase containing one of these is critical regardless of category.
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "slur",
    "kill",
    "violence",
    "threat",
    "die",
    "subhuman",
    "vermin",
    "dehumaniz",
];

/// Categories whose matches are at least high severity.
pub const HIGH_SEVERITY_CATEGORIES: &[&str] = &[
    "racial_discrimination",
    "homophobia",
    "transphobia",
    "misogynoir",
    "violence_threat",
    "dehumanizing",
];

/// Remedy for categories without their own guidance.
pub const GENERIC_REMEDY: &str =
    "Review this language with community moderators and revise it to centre respect and care.";

/// Guidance for a category.
pub fn remedy_for(category: &str) -> &'static str {
    match category {
        "racial_discrimination" => {
            "Remove racially exclusionary language and engage with anti-racism resources before reposting."
        }
        "homophobia" => {
            "Remove language that pathologises queer identities; queer lives are valid, not a phase or a problem."
        }
        "transphobia" => {
            "Respect people's genders and names; remove language that questions or erases trans identities."
        }
        "misogynoir" => {
            "Drop stereotypes aimed at Black women and engage with their point rather than their tone."
        }
        "tone_policing" => {
            "Respond to the substance of what was said instead of how it was said."
        }
        "erasure" => {
            "Acknowledge the specific experiences of Black and queer people rather than flattening them."
        }
        "violence_threat" => {
            "Threats of violence are never acceptable; this content must be removed and reviewed for safety."
        }
        "dehumanizing" => {
            "Remove dehumanizing comparisons; describe people as people."
        }
        "economic_exploitation" => {
            "Offer fair, transparent compensation and leave ownership with the creator."
        }
        "cultural_appropriation" => {
            "Credit and centre the culture's own creators instead of treating it as a trend or costume."
        }
        _ => GENERIC_REMEDY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_specific_remedy() {
        for category in HARMFUL_CATEGORIES {
            assert_ne!(remedy_for(category.name), GENERIC_REMEDY, "{}", category.name);
        }
    }

    #[test]
    fn test_unknown_category_falls_back() {
        assert_eq!(remedy_for("something_new"), GENERIC_REMEDY);
    }

    #[test]
    fn test_high_severity_categories_exist_in_catalog() {
        for name in HIGH_SEVERITY_CATEGORIES {
            assert!(HARMFUL_CATEGORIES.iter().any(|c| c.name == *name));
        }
    }
}
