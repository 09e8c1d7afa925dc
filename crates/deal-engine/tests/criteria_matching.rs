use deal_engine::criteria::{
    ConfigurationError, CriteriaMatcher, Facet, InvestmentCriteria, RuleStatus,
};
use deal_engine::{evaluate, EngineError, Property};

fn buy_box() -> InvestmentCriteria {
    serde_json::from_str(
        r#"{
            "name": "phoenix rentals",
            "geographic": {
                "states": { "values": ["AZ"], "required": true },
                "excluded_cities": { "values": ["Tucson"] }
            },
            "financial": {
                "price": { "min": 100000, "max": 250000, "weight": 2 },
                "cash_flow": { "min": 200 }
            },
            "property": {
                "bedrooms": { "min": 3 },
                "property_types": { "values": ["single_family", "townhouse"] }
            },
            "market": {
                "days_on_market": { "max": 60 }
            },
            "custom_rules": [
                { "id": "no-hoa-condos", "field": "property_type", "operator": "not_in",
                  "value": ["condo"], "required": true }
            ],
            "facet_weights": { "financial": 2 }
        }"#,
    )
    .expect("criteria json parses")
}

fn phoenix_house() -> Property {
    serde_json::from_str(
        r#"{
            "address": "5120 N 19th Ave",
            "city": "Phoenix",
            "state": "az",
            "property_type": "Single_Family",
            "square_feet": 1400,
            "bedrooms": 3,
            "asking_price": 219000,
            "cash_flow": 150,
            "days_on_market": 21
        }"#,
    )
    .expect("property json parses")
}

#[test]
fn json_criteria_score_a_property() {
    let result = evaluate(&phoenix_house(), &buy_box()).expect("criteria compile");

    assert!(result.meets_required);
    assert_eq!(result.facet_score(Facet::Geographic), Some(100.0));
    // price passes with weight 2, cash flow fails with weight 1
    assert_eq!(result.facet_score(Facet::Financial), Some(66.67));
    assert_eq!(result.facet_score(Facet::Property), Some(100.0));
    assert_eq!(result.facet_score(Facet::Market), Some(100.0));
    assert_eq!(result.facet_score(Facet::Custom), Some(100.0));
    // (100 + 66.67 * 2 + 100 + 100 + 100) / 6
    assert_eq!(result.overall_score, 88.89);
}

#[test]
fn required_rule_with_unknown_field_is_reported() {
    let criteria: InvestmentCriteria = serde_json::from_str(
        r#"{
            "custom_rules": [
                { "field": "bedrooms", "operator": "greater_equal", "value": 3, "required": true }
            ]
        }"#,
    )
    .expect("criteria json parses");
    let property = Property {
        bedrooms: None,
        ..phoenix_house()
    };

    let result = evaluate(&property, &criteria).expect("criteria compile");

    assert!(!result.meets_required);
    assert!(result
        .failed_required_rules
        .contains(&"custom.0.bedrooms".to_string()));
    let outcome = result
        .rule_outcomes
        .iter()
        .find(|outcome| outcome.rule_id == "custom.0.bedrooms")
        .expect("outcome recorded");
    assert_eq!(outcome.status, RuleStatus::MissingInput);
}

#[test]
fn failing_required_rule_in_any_facet_blocks_the_match() {
    let property = Property {
        state: Some("NM".to_string()),
        ..phoenix_house()
    };

    let result = evaluate(&property, &buy_box()).expect("criteria compile");

    assert!(!result.meets_required);
    assert_eq!(result.failed_required_rules, vec!["geographic.state".to_string()]);
    assert_eq!(result.facet_score(Facet::Geographic), Some(50.0));
}

#[test]
fn malformed_rules_fail_at_compile_time() {
    let criteria: InvestmentCriteria = serde_json::from_str(
        r#"{ "custom_rules": [ { "field": "price", "operator": "between", "value": 150000 } ] }"#,
    )
    .expect("criteria json parses");

    let err = CriteriaMatcher::new(&criteria).expect_err("between needs two bounds");
    assert!(matches!(err, ConfigurationError::ValueShape { .. }));

    let engine_error: EngineError = err.into();
    assert!(engine_error.to_string().starts_with("invalid criteria"));

    let unknown: InvestmentCriteria = serde_json::from_str(
        r#"{ "custom_rules": [ { "field": "price", "operator": "around", "value": 150000 } ] }"#,
    )
    .expect("criteria json parses");
    assert!(matches!(
        evaluate(&phoenix_house(), &unknown),
        Err(ConfigurationError::UnknownOperator { .. })
    ));
}

#[test]
fn many_properties_against_one_matcher() {
    let matcher = CriteriaMatcher::new(&buy_box()).expect("criteria compile");
    assert_eq!(matcher.name(), Some("phoenix rentals"));

    let results: Vec<_> = [150_000.0, 219_000.0, 400_000.0]
        .into_iter()
        .map(|price| Property {
            asking_price: Some(price),
            ..phoenix_house()
        })
        .map(|property| matcher.evaluate(&property))
        .collect();

    assert_eq!(results[0], results[1]);
    assert!(results[2].overall_score < results[1].overall_score);
    assert!(results.iter().all(|result| result.meets_required));
}

#[test]
fn match_serializes_for_callers() {
    let result = evaluate(&phoenix_house(), &buy_box()).expect("criteria compile");
    let value = serde_json::to_value(&result).expect("serializes");

    assert_eq!(value["meets_required"], serde_json::json!(true));
    assert_eq!(value["facet_scores"][0]["facet"], serde_json::json!("geographic"));
    assert_eq!(value["rule_outcomes"][0]["status"], serde_json::json!("passed"));
}
