use crate::criteria::domain::{
    FinancialCriteria, FlagCriterion, GeographicCriteria, InvestmentCriteria, MarketCriteria,
    PropertyCriteria, RangeCriterion, SetCriterion,
};
use crate::property::Property;

pub(super) fn las_vegas_rental() -> Property {
    Property {
        address: Some("1204 Desert Bloom Ave".to_string()),
        city: Some("Las Vegas".to_string()),
        state: Some("NV".to_string()),
        zip_code: Some("89109".to_string()),
        latitude: Some(36.1699),
        longitude: Some(-115.1398),
        property_type: Some("Single Family".to_string()),
        square_feet: Some(1_650.0),
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        lot_size: Some(6_000.0),
        year_built: Some(1994),
        current_value: Some(240_000.0),
        asking_price: Some(225_000.0),
        cap_rate: Some(0.071),
        cash_flow: Some(310.0),
        days_on_market: Some(48),
        is_distressed: Some(true),
        is_foreclosure: Some(false),
        features: vec!["Garage".to_string(), "Pool".to_string()],
        ..Property::default()
    }
}

pub(super) fn flipper_buy_box() -> InvestmentCriteria {
    InvestmentCriteria {
        name: Some("southwest flips".to_string()),
        geographic: GeographicCriteria {
            states: Some(SetCriterion::of(&["NV", "AZ"]).required()),
            excluded_zip_codes: Some(SetCriterion::of(&["89101"])),
            ..GeographicCriteria::default()
        },
        financial: FinancialCriteria {
            price: Some(RangeCriterion::between(150_000.0, 300_000.0).required()),
            cap_rate: Some(RangeCriterion::at_least(0.06).weighted(2.0)),
            ..FinancialCriteria::default()
        },
        property: PropertyCriteria {
            bedrooms: Some(RangeCriterion::at_least(3.0)),
            year_built: Some(RangeCriterion::at_least(1980.0)),
            ..PropertyCriteria::default()
        },
        market: MarketCriteria {
            days_on_market: Some(RangeCriterion::at_most(90.0)),
            distressed: Some(FlagCriterion::expect(true)),
            ..MarketCriteria::default()
        },
        ..InvestmentCriteria::default()
    }
}
