//! Sparse filter constraints over creator attributes.
//!
//! A `FilterSet` is the validated, typed form of whatever the query analyzer
//! extracted (or the caller passed explicitly). Fields left as `None` are
//! omitted entirely downstream: the vector index receives no default
//! constraints, and the relational store adds no WHERE clauses for them.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{self, Tier};

/// Sparse constraint set over creator attributes.
///
/// Invariant: after `validated()`, every enum-valued field holds a taxonomy
/// member. Out-of-taxonomy values are dropped, not errors, so a bad
/// extraction degrades to a broader search instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_followers: Option<u64>,
    /// Engagement rate bounds, in percent (e.g. 5.0 means 5%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_engagement: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_engagement: Option<f32>,
    /// Price-per-post bounds in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Minimum average client satisfaction, 0..5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_satisfaction: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_gender: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set niche
    pub fn niche(mut self, niche: impl Into<String>) -> Self {
        self.niche = Some(niche.into());
        self
    }

    /// Builder: set platform
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Builder: set tier
    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Builder: set follower bounds
    pub fn followers(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_followers = min;
        self.max_followers = max;
        self
    }

    /// Builder: set minimum engagement rate (percent)
    pub fn min_engagement(mut self, min: f32) -> Self {
        self.min_engagement = Some(min);
        self
    }

    /// Builder: set maximum price per post
    pub fn max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    /// Whether no constraints are set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop every enum-valued field that is not a taxonomy member.
    ///
    /// This is the injection guard: whatever the intent model returned,
    /// only recognized values survive.
    pub fn validated(mut self) -> Self {
        if self.niche.as_deref().is_some_and(|v| !taxonomy::is_valid_niche(v)) {
            self.niche = None;
        }
        if self.platform.as_deref().is_some_and(|v| !taxonomy::is_valid_platform(v)) {
            self.platform = None;
        }
        if self.country.as_deref().is_some_and(|v| !taxonomy::is_valid_country(v)) {
            self.country = None;
        }
        if self.audience_age.as_deref().is_some_and(|v| !taxonomy::is_valid_age_band(v)) {
            self.audience_age = None;
        }
        if self.audience_gender.as_deref().is_some_and(|v| !taxonomy::is_valid_gender(v)) {
            self.audience_gender = None;
        }
        self
    }

    /// Overlay explicit caller filters on top of extracted ones.
    /// Caller values win wherever both are set.
    pub fn merged_with(mut self, overrides: &FilterSet) -> Self {
        macro_rules! take {
            ($field:ident) => {
                if overrides.$field.is_some() {
                    self.$field = overrides.$field.clone();
                }
            };
        }
        take!(niche);
        take!(tier);
        take!(platform);
        take!(country);
        take!(min_followers);
        take!(max_followers);
        take!(min_engagement);
        take!(max_engagement);
        take!(min_price);
        take!(max_price);
        take!(min_satisfaction);
        take!(audience_age);
        take!(audience_gender);
        self
    }

    /// Expand a tier into an explicit follower range, but only when no
    /// explicit min/max follower constraint is already present. Expanding
    /// on top of explicit bounds would double-constrain the query.
    pub fn expand_tier(mut self) -> Self {
        if let Some(tier) = self.tier {
            if self.min_followers.is_none() && self.max_followers.is_none() {
                let (min, max) = tier.follower_range();
                self.min_followers = Some(min);
                self.max_followers = max;
            }
        }
        self
    }

    /// Names of the fields that carry a constraint, for response metadata.
    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.niche.is_some() {
            fields.push("niche");
        }
        if self.tier.is_some() {
            fields.push("tier");
        }
        if self.platform.is_some() {
            fields.push("platform");
        }
        if self.country.is_some() {
            fields.push("country");
        }
        if self.min_followers.is_some() {
            fields.push("min_followers");
        }
        if self.max_followers.is_some() {
            fields.push("max_followers");
        }
        if self.min_engagement.is_some() {
            fields.push("min_engagement");
        }
        if self.max_engagement.is_some() {
            fields.push("max_engagement");
        }
        if self.min_price.is_some() {
            fields.push("min_price");
        }
        if self.max_price.is_some() {
            fields.push("max_price");
        }
        if self.min_satisfaction.is_some() {
            fields.push("min_satisfaction");
        }
        if self.audience_age.is_some() {
            fields.push("audience_age");
        }
        if self.audience_gender.is_some() {
            fields.push("audience_gender");
        }
        fields
    }
}
