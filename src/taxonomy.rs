//! Fixed taxonomy of recognized creator attributes.
//!
//! Every enum-like filter value (niche, tier, platform, country, audience
//! demographics) is validated against this vocabulary before it is allowed
//! anywhere near a search predicate. Values outside the taxonomy are dropped,
//! never forwarded, so a hostile or hallucinated extraction cannot inject
//! arbitrary predicates into the vector index.
//!
//! The keyword aliases double as the vocabulary for the deterministic
//! fallback analyzer: a query that mentions "gaming" maps to the
//! `tech_gaming` niche, "youtubers" to the `youtube` platform, and so on.

use serde::{Deserialize, Serialize};

/// A recognized creator niche with keyword aliases for text matching.
#[derive(Debug, Clone, Copy)]
pub struct Niche {
    /// Stable identifier stored in the relational store and index metadata.
    pub id: &'static str,
    /// Human-readable label for display and suggestions.
    pub label: &'static str,
    /// Lowercase substrings that map free text onto this niche.
    pub keywords: &'static [&'static str],
}

pub const NICHES: &[Niche] = &[
    Niche {
        id: "beauty_fashion",
        label: "Beauty & Fashion",
        keywords: &["beauty", "makeup", "fashion", "skincare", "style", "cosmetic"],
    },
    Niche {
        id: "tech_gaming",
        label: "Tech & Gaming",
        keywords: &["tech", "gaming", "gamer", "esports", "gadget", "software", "hardware"],
    },
    Niche {
        id: "fitness_health",
        label: "Fitness & Health",
        keywords: &["fitness", "workout", "gym", "health", "wellness", "yoga", "nutrition"],
    },
    Niche {
        id: "food_cooking",
        label: "Food & Cooking",
        keywords: &["food", "cooking", "recipe", "chef", "baking", "restaurant"],
    },
    Niche {
        id: "travel_lifestyle",
        label: "Travel & Lifestyle",
        keywords: &["travel", "lifestyle", "adventure", "vlog", "destination"],
    },
    Niche {
        id: "education",
        label: "Education",
        keywords: &["education", "learning", "tutorial", "teacher", "course", "study"],
    },
    Niche {
        id: "entertainment",
        label: "Entertainment",
        keywords: &["entertainment", "comedy", "funny", "sketch", "prank", "reaction"],
    },
    Niche {
        id: "business_finance",
        label: "Business & Finance",
        keywords: &["business", "finance", "investing", "entrepreneur", "startup", "money"],
    },
    Niche {
        id: "music_dance",
        label: "Music & Dance",
        keywords: &["music", "musician", "dance", "dancer", "singer", "dj"],
    },
    Niche {
        id: "parenting_family",
        label: "Parenting & Family",
        keywords: &["parenting", "family", "mom", "dad", "kids", "baby"],
    },
];

/// A recognized platform with keyword aliases.
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub id: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub const PLATFORMS: &[Platform] = &[
    Platform {
        id: "instagram",
        label: "Instagram",
        keywords: &["instagram", "insta", "reels"],
    },
    Platform {
        id: "youtube",
        label: "YouTube",
        keywords: &["youtube", "vlogger"],
    },
    Platform {
        id: "tiktok",
        label: "TikTok",
        keywords: &["tiktok", "tik tok"],
    },
    Platform {
        id: "twitter",
        label: "Twitter / X",
        keywords: &["twitter", "tweet"],
    },
    Platform {
        id: "twitch",
        label: "Twitch",
        keywords: &["twitch", "streamer", "livestream"],
    },
    Platform {
        id: "linkedin",
        label: "LinkedIn",
        keywords: &["linkedin"],
    },
];

/// Countries the platform currently operates in.
pub const COUNTRIES: &[&str] = &[
    "us", "uk", "ca", "au", "de", "fr", "es", "it", "in", "br", "mx", "jp",
];

/// Audience age bands tracked per creator.
pub const AUDIENCE_AGE_BANDS: &[&str] = &["13-17", "18-24", "25-34", "35-44", "45-54", "55+"];

/// Audience gender skew values tracked per creator.
pub const AUDIENCE_GENDERS: &[&str] = &["female", "male", "balanced"];

/// Creator size tier, expandable into an explicit follower range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Micro,
    Macro,
    Mega,
}

impl Tier {
    /// Parse from string, accepting common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "micro" | "micro-influencer" => Some(Self::Micro),
            "macro" | "macro-influencer" => Some(Self::Macro),
            "mega" | "celebrity" => Some(Self::Mega),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Macro => "macro",
            Self::Mega => "mega",
        }
    }

    /// The follower range this tier expands into: `(min, max)` where a
    /// missing max means unbounded.
    pub fn follower_range(&self) -> (u64, Option<u64>) {
        match self {
            Self::Micro => (10_000, Some(100_000)),
            Self::Macro => (100_000, Some(1_000_000)),
            Self::Mega => (1_000_000, None),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map free text onto the first niche whose keyword appears as a substring.
pub fn match_niche(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    NICHES
        .iter()
        .find(|niche| niche.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|niche| niche.id)
}

/// Map free text onto the first platform whose keyword appears as a substring.
pub fn match_platform(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    PLATFORMS
        .iter()
        .find(|platform| platform.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|platform| platform.id)
}

pub fn is_valid_niche(id: &str) -> bool {
    NICHES.iter().any(|n| n.id == id)
}

pub fn is_valid_platform(id: &str) -> bool {
    PLATFORMS.iter().any(|p| p.id == id)
}

pub fn is_valid_country(code: &str) -> bool {
    COUNTRIES.contains(&code)
}

pub fn is_valid_age_band(band: &str) -> bool {
    AUDIENCE_AGE_BANDS.contains(&band)
}

pub fn is_valid_gender(value: &str) -> bool {
    AUDIENCE_GENDERS.contains(&value)
}

/// Compact vocabulary listing for the intent-model prompt.
pub fn prompt_vocabulary() -> String {
    let niches: Vec<&str> = NICHES.iter().map(|n| n.id).collect();
    let platforms: Vec<&str> = PLATFORMS.iter().map(|p| p.id).collect();
    format!(
        "niches: {}\ntiers: micro, macro, mega\nplatforms: {}\ncountries: {}\naudience_age: {}\naudience_gender: {}",
        niches.join(", "),
        platforms.join(", "),
        COUNTRIES.join(", "),
        AUDIENCE_AGE_BANDS.join(", "),
        AUDIENCE_GENDERS.join(", "),
    )
}
