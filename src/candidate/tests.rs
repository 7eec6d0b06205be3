use super::*;
use serde_json::json;

fn attrs_from(value: serde_json::Value) -> CandidateAttributes {
    match value {
        Value::Object(map) => CandidateAttributes::from_json_map(map),
        _ => panic!("expected object"),
    }
}

#[test]
fn test_attributes_parse_known_fields() {
    let attrs = attrs_from(json!({
        "name": "Ada",
        "rerankSummary": "Tax attorney",
        "deg_degrees": ["JD"],
        "exp_years": ["5"],
        "linkedinId": "ada-l"
    }));

    assert_eq!(attrs.name.as_deref(), Some("Ada"));
    assert_eq!(attrs.rerank_summary, "Tax attorney");
    assert_eq!(attrs.deg_degrees, vec!["JD"]);
    assert_eq!(attrs.exp_years, vec!["5"]);
    assert_eq!(attrs.extra.get("linkedinId"), Some(&json!("ada-l")));
}

#[test]
fn test_attributes_null_fields_become_empty() {
    let attrs = attrs_from(json!({
        "rerankSummary": null,
        "experience": null
    }));

    assert!(attrs.rerank_summary.is_empty());
    assert!(attrs.experience.is_empty());
}

#[test]
fn test_attributes_malformed_field_falls_back() {
    let attrs = attrs_from(json!({
        "name": 42,
        "exp_titles": "Attorney",
        "deg_degrees": ["JD", null, "LLM"]
    }));

    assert_eq!(attrs.name.as_deref(), Some("42"));
    assert_eq!(attrs.exp_titles, vec!["Attorney"]);
    assert_eq!(attrs.deg_degrees, vec!["JD", "LLM"]);
}

#[test]
fn test_rerank_text_prefers_summary() {
    let attrs = CandidateAttributes {
        rerank_summary: "Summary text".to_string(),
        experience: vec!["Tax counsel".to_string()],
        ..Default::default()
    };
    let candidate = Candidate::new("1", Some(0.1), attrs);

    assert_eq!(candidate.rerank_text(RerankStrategy::Basic), "Summary text");
    assert_eq!(candidate.rerank_text(RerankStrategy::Enhanced), "Summary text");
}

#[test]
fn test_rerank_text_fallback_order_follows_strategy() {
    let attrs = CandidateAttributes {
        experience: vec!["Tax counsel".to_string(), "Associate".to_string()],
        education: vec!["JD Harvard".to_string()],
        ..Default::default()
    };
    let candidate = Candidate::new("1", None, attrs);

    assert_eq!(
        candidate.rerank_text(RerankStrategy::Enhanced),
        "Tax counsel Associate JD Harvard"
    );
    assert_eq!(
        candidate.rerank_text(RerankStrategy::Basic),
        "JD Harvard Tax counsel Associate"
    );
}

#[test]
fn test_distance_or_zero() {
    assert_eq!(Candidate::new("a", None, Default::default()).distance_or_zero(), 0.0);
    assert_eq!(
        Candidate::new("a", Some(0.42), Default::default()).distance_or_zero(),
        0.42
    );
}

#[test]
fn test_joined_lower() {
    let attrs = CandidateAttributes {
        exp_titles: vec!["Tax Attorney".to_string(), "Partner".to_string()],
        ..Default::default()
    };

    assert_eq!(attrs.joined_lower("exp_titles"), "tax attorney partner");
    assert_eq!(attrs.joined_lower("unknown"), "");
}

#[test]
fn test_candidate_serializes_with_store_id_key() {
    let candidate = Candidate::new("abc", Some(0.5), Default::default());
    let value = serde_json::to_value(&candidate).unwrap();

    assert_eq!(value["_id"], json!("abc"));
    assert_eq!(value["distance"], json!(0.5));
}
