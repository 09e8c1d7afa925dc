//! Investment criteria matching: declarative buy-box facets and custom rules scored
//! against a single property.

mod compile;
pub mod domain;
mod engine;
pub mod field;
mod geo;
mod operators;

#[cfg(test)]
mod tests;

pub use compile::{ConfigurationError, MAX_RULE_WEIGHT};
pub use domain::{
    CriteriaRule, CriterionValue, Facet, FacetWeights, FeatureCriterion, FinancialCriteria,
    FlagCriterion, GeographicCriteria, InvestmentCriteria, MarketCriteria, PropertyCriteria,
    RadiusCriterion, RangeCriterion, RuleOperator, SetCriterion,
};
pub use engine::{CriteriaMatch, CriteriaMatcher, FacetScore, RuleOutcome, RuleStatus};
pub use field::{FieldKind, FieldValue, PropertyField};
pub use geo::GeoPoint;

use crate::property::Property;

/// Compiles `criteria` and evaluates it once against `property`.
pub fn evaluate(
    property: &Property,
    criteria: &InvestmentCriteria,
) -> Result<CriteriaMatch, ConfigurationError> {
    Ok(CriteriaMatcher::new(criteria)?.evaluate(property))
}
