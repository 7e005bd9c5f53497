//! Deterministic keyword fallback for query analysis.
//!
//! Substring matching against the fixed taxonomy plus a few regexes for
//! numeric constraints. Runs when no intent model is configured or when the
//! provider call fails; must never return an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::filters::FilterSet;
use crate::taxonomy::{self, Tier};

use super::{Intent, QueryAnalysis, SearchAspects};

/// "high engagement" maps to this minimum rate (percent).
const HIGH_ENGAGEMENT_FLOOR: f32 = 5.0;

static DOLLAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)\s*([km])?").unwrap()
});

static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*([km])?\s*\+?\s*(?:followers|subscribers|subs)").unwrap()
});

static ENGAGEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*%\s*(?:\+\s*)?engagement").unwrap()
});

static SIMILAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:similar to|creators like|accounts like)\s+(.+)").unwrap()
});

/// Analyze a query without a provider. `confidence` is the fixed score
/// reported for this path (0.5 in the default config).
pub fn analyze(raw_query: &str, confidence: f32) -> QueryAnalysis {
    let cleaned = clean(raw_query);
    let lowered = cleaned.to_lowercase();

    let mut filters = FilterSet {
        niche: taxonomy::match_niche(&lowered).map(str::to_string),
        platform: taxonomy::match_platform(&lowered).map(str::to_string),
        tier: detect_tier(&lowered),
        ..Default::default()
    };

    if let Some(amount) = DOLLAR_RE
        .captures(&lowered)
        .and_then(|caps| parse_amount(&caps[1], caps.get(2).map(|m| m.as_str())))
    {
        // A dollar figure in a discovery query is a budget ceiling.
        filters.max_price = Some(amount);
    }

    if let Some(count) = FOLLOWERS_RE
        .captures(&lowered)
        .and_then(|caps| parse_amount(&caps[1], caps.get(2).map(|m| m.as_str())))
    {
        filters.min_followers = Some(count as u64);
    }

    if let Some(caps) = ENGAGEMENT_RE.captures(&lowered) {
        filters.min_engagement = caps[1].parse::<f32>().ok();
    } else if lowered.contains("high engagement") {
        filters.min_engagement = Some(HIGH_ENGAGEMENT_FLOOR);
    }

    let (intent, aspects) = detect_intent(&cleaned, &lowered);

    QueryAnalysis {
        intent,
        filters,
        semantic_query: cleaned,
        confidence,
        aspects,
    }
}

fn clean(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn detect_tier(lowered: &str) -> Option<Tier> {
    for candidate in ["micro", "macro", "mega", "celebrity"] {
        if lowered.contains(candidate) {
            return Tier::parse(candidate);
        }
    }
    None
}

fn detect_intent(cleaned: &str, lowered: &str) -> (Intent, SearchAspects) {
    let mut aspects = SearchAspects::default();

    if let Some(caps) = SIMILAR_RE.captures(lowered) {
        // Capture offsets are valid in the original string because the
        // query was lowercased without changing byte positions of ASCII;
        // take the reference from the cleaned text to preserve casing.
        let start = caps.get(1).map_or(0, |m| m.start());
        let reference = cleaned
            .get(start..)
            .unwrap_or("")
            .trim_end_matches(['.', '?', '!'])
            .trim();
        if !reference.is_empty() {
            aspects.reference_creator = Some(reference.to_string());
            return (Intent::SimilarTo, aspects);
        }
    }

    if lowered.contains("audience") || lowered.contains("demographic") {
        aspects.audience = Some(cleaned.to_string());
        return (Intent::AudienceMatch, aspects);
    }

    if lowered.contains("content style") || lowered.contains("aesthetic") {
        aspects.content_style = Some(cleaned.to_string());
        return (Intent::ContentMatch, aspects);
    }

    if lowered.contains("worked with") || lowered.contains("sponsored") || lowered.contains("brand deal") {
        aspects.brand_history = Some(cleaned.to_string());
        return (Intent::BrandMatch, aspects);
    }

    (Intent::General, aspects)
}

fn parse_amount(digits: &str, suffix: Option<&str>) -> Option<f64> {
    let base: f64 = digits.replace(',', "").parse().ok()?;
    let multiplier = match suffix {
        Some("k") => 1_000.0,
        Some("m") => 1_000_000.0,
        _ => 1.0,
    };
    Some(base * multiplier)
}
