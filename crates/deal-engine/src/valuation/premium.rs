use super::config::MarketPremiumRules;
use crate::money::round_places;
use crate::property::Property;

/// Market premium for the subject, clamped to the table's floor and cap.
pub fn market_premium(subject: &Property, rules: &MarketPremiumRules) -> f64 {
    let mut premium = rules.base;

    if subject
        .state
        .as_deref()
        .map(|state| rules.is_high_demand_state(state))
        .unwrap_or(false)
    {
        premium += rules.high_demand_premium;
    }

    if subject
        .square_feet
        .map(|sqft| sqft >= rules.large_home_square_feet)
        .unwrap_or(false)
    {
        premium += rules.large_home_premium;
    }

    if subject
        .bedrooms
        .map(|beds| beds >= rules.family_home_bedrooms)
        .unwrap_or(false)
    {
        premium += rules.family_home_premium;
    }

    round_places(premium, 4).clamp(rules.floor, rules.cap)
}
