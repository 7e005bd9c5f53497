//! Filter-to-predicate translation.
//!
//! The hosted index filters on metadata with a Mongo-style predicate
//! object: `{"niche": {"$eq": "tech_gaming"}, "followers": {"$gte": 10000,
//! "$lte": 100000}}`. Equality filters map directly; paired min/max on the
//! same field collapse into a single range object; unset fields are omitted
//! entirely, so an empty `FilterSet` yields no predicate at all.
//!
//! Tiers never reach the index: by predicate-build time they have been
//! expanded into follower bounds (see `FilterSet::expand_tier`).

use serde_json::{Map, Value, json};

use crate::filters::FilterSet;

/// Build the index predicate for a filter set, or `None` when the set
/// carries no index-relevant constraints.
pub fn predicate_for(filters: &FilterSet) -> Option<Value> {
    let mut fields = Map::new();

    if let Some(ref niche) = filters.niche {
        fields.insert("niche".to_string(), json!({ "$eq": niche }));
    }
    if let Some(ref platform) = filters.platform {
        fields.insert("platform".to_string(), json!({ "$eq": platform }));
    }
    if let Some(ref country) = filters.country {
        fields.insert("country".to_string(), json!({ "$eq": country }));
    }
    if let Some(range) = range_predicate(
        filters.min_followers.map(|v| v as f64),
        filters.max_followers.map(|v| v as f64),
    ) {
        fields.insert("followers".to_string(), range);
    }
    if let Some(range) = range_predicate(
        filters.min_engagement.map(f64::from),
        filters.max_engagement.map(f64::from),
    ) {
        fields.insert("engagement_rate".to_string(), range);
    }
    if let Some(range) = range_predicate(filters.min_price, filters.max_price) {
        fields.insert("price".to_string(), range);
    }
    if let Some(min) = filters.min_satisfaction {
        fields.insert("satisfaction".to_string(), json!({ "$gte": min }));
    }
    if let Some(ref band) = filters.audience_age {
        fields.insert("audience_age".to_string(), json!({ "$eq": band }));
    }
    if let Some(ref gender) = filters.audience_gender {
        fields.insert("audience_gender".to_string(), json!({ "$eq": gender }));
    }

    if fields.is_empty() {
        None
    } else {
        Some(Value::Object(fields))
    }
}

fn range_predicate(min: Option<f64>, max: Option<f64>) -> Option<Value> {
    let mut range = Map::new();
    if let Some(min) = min {
        range.insert("$gte".to_string(), json!(min));
    }
    if let Some(max) = max {
        range.insert("$lte".to_string(), json!(max));
    }
    if range.is_empty() {
        None
    } else {
        Some(Value::Object(range))
    }
}

/// Evaluate a predicate against a metadata object. Used by the in-memory
/// index; the hosted backend evaluates server-side.
pub fn matches(predicate: &Value, metadata: &Value) -> bool {
    let Some(fields) = predicate.as_object() else {
        return true;
    };

    fields.iter().all(|(field, constraint)| {
        let value = &metadata[field.as_str()];
        constraint
            .as_object()
            .is_some_and(|ops| ops.iter().all(|(op, operand)| op_matches(op, operand, value)))
    })
}

fn op_matches(op: &str, operand: &Value, value: &Value) -> bool {
    match op {
        "$eq" => value == operand,
        "$gte" => cmp_numbers(value, operand).is_some_and(|ord| ord >= std::cmp::Ordering::Equal),
        "$lte" => cmp_numbers(value, operand).is_some_and(|ord| ord <= std::cmp::Ordering::Equal),
        "$in" => operand
            .as_array()
            .is_some_and(|candidates| candidates.iter().any(|c| c == value)),
        _ => false,
    }
}

fn cmp_numbers(value: &Value, operand: &Value) -> Option<std::cmp::Ordering> {
    let left = value.as_f64()?;
    let right = operand.as_f64()?;
    left.partial_cmp(&right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_yield_no_predicate() {
        assert_eq!(predicate_for(&FilterSet::new()), None);
    }

    #[test]
    fn test_equality_filters_map_directly() {
        let filters = FilterSet::new().niche("tech_gaming").platform("youtube");
        let predicate = predicate_for(&filters).unwrap();

        assert_eq!(predicate["niche"], json!({ "$eq": "tech_gaming" }));
        assert_eq!(predicate["platform"], json!({ "$eq": "youtube" }));
    }

    #[test]
    fn test_min_max_collapse_into_one_range() {
        let filters = FilterSet::new().followers(Some(10_000), Some(100_000));
        let predicate = predicate_for(&filters).unwrap();

        assert_eq!(
            predicate["followers"],
            json!({ "$gte": 10_000.0, "$lte": 100_000.0 })
        );
    }

    #[test]
    fn test_half_open_range() {
        let filters = FilterSet::new().min_engagement(5.0);
        let predicate = predicate_for(&filters).unwrap();

        assert_eq!(predicate["engagement_rate"], json!({ "$gte": 5.0 }));
        assert!(predicate.get("followers").is_none());
    }

    #[test]
    fn test_matches_equality() {
        let predicate = json!({ "niche": { "$eq": "education" } });
        assert!(matches(&predicate, &json!({ "niche": "education" })));
        assert!(!matches(&predicate, &json!({ "niche": "food_cooking" })));
        assert!(!matches(&predicate, &json!({})));
    }

    #[test]
    fn test_matches_range() {
        let predicate = json!({ "followers": { "$gte": 1000.0, "$lte": 5000.0 } });
        assert!(matches(&predicate, &json!({ "followers": 3000 })));
        assert!(matches(&predicate, &json!({ "followers": 1000 })));
        assert!(!matches(&predicate, &json!({ "followers": 999 })));
        assert!(!matches(&predicate, &json!({ "followers": 5001 })));
    }

    #[test]
    fn test_matches_in_list() {
        let predicate = json!({ "platform": { "$in": ["youtube", "twitch"] } });
        assert!(matches(&predicate, &json!({ "platform": "twitch" })));
        assert!(!matches(&predicate, &json!({ "platform": "tiktok" })));
    }

    #[test]
    fn test_unknown_operator_rejects() {
        let predicate = json!({ "followers": { "$near": 1000 } });
        assert!(!matches(&predicate, &json!({ "followers": 1000 })));
    }
}
