use chrono::NaiveDate;
use deal_engine::valuation::RenovationLevel;
use deal_engine::wholesale::{DealCategory, DealCosts, WholesaleParameters};
use deal_engine::{ComparableSale, EngineConfig, Property, ValidationError, WholesaleDealAnalyzer};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

fn subject(current_value: Option<f64>) -> Property {
    Property {
        address: Some("412 Fulton Ave".to_string()),
        state: Some("OH".to_string()),
        square_feet: Some(1_500.0),
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        year_built: Some(2000),
        current_value,
        ..Property::default()
    }
}

fn comps() -> Vec<ComparableSale> {
    vec![ComparableSale {
        address: "418 Fulton Ave".to_string(),
        sale_price: 300_000.0,
        sale_date: NaiveDate::from_ymd_opt(2025, 5, 31),
        square_feet: 1_500.0,
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        year_built: Some(2000),
        property_type: None,
    }]
}

#[test]
fn scenario_cost_stack_yields_expected_mao() {
    let costs = DealCosts {
        repair_cost: 20_000.0,
        holding_time_months: 1.0,
        holding_costs: 3_000.0,
        closing_costs: 18_000.0,
        min_profit: 60_000.0,
        max_wholesale_fee: 45_000.0,
    };
    assert_eq!(costs.maximum_allowable_offer(300_000.0), 154_000.0);
}

#[test]
fn thin_spread_scores_poor_with_no_fee() {
    let result = WholesaleDealAnalyzer::default()
        .analyze(&subject(Some(150_000.0)), &comps(), 0.85, as_of())
        .expect("analysis succeeds");

    assert_eq!(result.arv, 321_000.0);
    assert_eq!(result.renovation_level, RenovationLevel::Basic);
    assert_eq!(result.repair_cost, 50_600.0);
    assert_eq!(result.costs.holding_time_months, 1.0);
    assert_eq!(result.costs.holding_costs, 1_500.0);
    assert_eq!(result.costs.closing_costs, 19_260.0);
    assert_eq!(result.costs.min_profit, 64_200.0);
    assert_eq!(result.costs.max_wholesale_fee, 48_150.0);
    assert_eq!(result.mao, 137_290.0);
    assert_eq!(result.spread, -12_710.0);
    assert_eq!(result.score_breakdown.spread_score, 0.0);
    assert_eq!(result.category, DealCategory::Poor);
    assert_eq!(result.suggested_fee, 0.0);
}

#[test]
fn healthy_spread_earns_a_fee_share() {
    let result = WholesaleDealAnalyzer::default()
        .analyze(&subject(Some(80_000.0)), &comps(), 0.85, as_of())
        .expect("analysis succeeds");

    assert_eq!(result.mao, 137_990.0);
    assert_eq!(result.spread, 57_990.0);
    assert!((64.0..64.1).contains(&result.deal_score), "{}", result.deal_score);
    assert_eq!(result.category, DealCategory::Fair);
    assert_eq!(result.suggested_fee, 17_397.0);
    assert!(result.suggested_fee <= result.costs.max_wholesale_fee);
}

#[test]
fn missing_current_value_degrades_the_spread() {
    let result = WholesaleDealAnalyzer::default()
        .analyze(&subject(None), &comps(), 0.85, as_of())
        .expect("analysis succeeds");

    assert_eq!(result.costs.holding_costs, 0.0);
    assert_eq!(result.spread, 0.0);
    assert_eq!(result.suggested_fee, 0.0);
    assert!(result
        .warnings
        .iter()
        .any(|warning| warning.contains("no current value")));
}

#[test]
fn per_call_parameters_override_defaults() {
    let analyzer = WholesaleDealAnalyzer::default();
    let parameters = WholesaleParameters {
        min_profit_margin: 0.25,
        ..WholesaleParameters::default()
    };

    let result = analyzer
        .analyze_with(&subject(Some(150_000.0)), &comps(), 0.85, as_of(), &parameters)
        .expect("analysis succeeds");

    assert_eq!(result.costs.min_profit, 80_250.0);
    assert_eq!(result.mao, 137_290.0 - 16_050.0);
    assert_eq!(analyzer.parameters().min_profit_margin, 0.20);
}

#[test]
fn invalid_inputs_are_rejected() {
    let analyzer = WholesaleDealAnalyzer::default();

    let err = analyzer
        .analyze(&subject(Some(150_000.0)), &comps(), 1.2, as_of())
        .expect_err("condition out of range");
    assert_eq!(err, ValidationError::ConditionScoreOutOfRange(1.2));

    let negative = WholesaleParameters {
        holding_cost_monthly_rate: -0.01,
        ..WholesaleParameters::default()
    };
    let err = analyzer
        .analyze_with(&subject(Some(150_000.0)), &comps(), 0.5, as_of(), &negative)
        .expect_err("negative rate");
    assert!(matches!(err, ValidationError::InvalidParameter { .. }));
}

#[test]
fn engine_config_drives_the_analyzer() {
    let config = EngineConfig::from_json(r#"{ "wholesale": { "closing_cost_rate": 0.08 } }"#)
        .expect("config parses");

    let result = config
        .wholesale_analyzer()
        .analyze(&subject(Some(150_000.0)), &comps(), 0.85, as_of())
        .expect("analysis succeeds");

    assert_eq!(result.costs.closing_costs, 25_680.0);
}

#[test]
fn engines_can_be_shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<deal_engine::ArvEstimator>();
    assert_send_sync::<deal_engine::HeuristicRepairModel>();
    assert_send_sync::<WholesaleDealAnalyzer>();
    assert_send_sync::<deal_engine::CriteriaMatcher>();
    assert_send_sync::<EngineConfig>();

    let analyzer = WholesaleDealAnalyzer::default();
    let shared = &analyzer;
    let comps = comps();
    let comps = &comps;
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = [80_000.0, 150_000.0]
            .into_iter()
            .map(|value| {
                scope.spawn(move || {
                    shared
                        .analyze(&subject(Some(value)), comps, 0.85, as_of())
                        .expect("analysis succeeds")
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker finished"))
            .collect()
    });

    assert_eq!(results[0].spread, 57_990.0);
    assert_eq!(results[1].spread, -12_710.0);
}
