use super::domain::{
    CriteriaRule, CriterionValue, Facet, FeatureCriterion, FlagCriterion, InvestmentCriteria,
    RadiusCriterion, RangeCriterion, RuleOperator, SetCriterion,
};
use super::field::{FieldKind, PropertyField};
use super::geo::GeoPoint;
use super::operators::{normalize, Check, Expected};
use std::collections::HashSet;

pub const MAX_RULE_WEIGHT: f64 = 10.0;

/// Problems in a criteria set, raised before any property is evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("rule {rule}: unknown operator '{operator}'")]
    UnknownOperator { rule: String, operator: String },
    #[error("rule {rule}: unknown property field '{field}'")]
    UnknownField { rule: String, field: String },
    #[error("rule {rule}: operator {operator} cannot be applied to {kind} field {field}")]
    UnsupportedOperator {
        rule: String,
        operator: RuleOperator,
        field: PropertyField,
        kind: &'static str,
    },
    #[error("rule {rule}: operator {operator} expects {expected}, found {found}")]
    ValueShape {
        rule: String,
        operator: RuleOperator,
        expected: &'static str,
        found: String,
    },
    #[error("rule {rule}: weight {weight} is outside [0, 10]")]
    InvalidWeight { rule: String, weight: f64 },
    #[error("rule {rule}: lower bound {min} exceeds upper bound {max}")]
    InvertedRange { rule: String, min: f64, max: f64 },
    #[error("rule {rule}: range declares neither a minimum nor a maximum")]
    EmptyRange { rule: String },
    #[error("rule {rule}: value list is empty")]
    EmptyValueList { rule: String },
    #[error("rule {rule}: value list contains a blank entry")]
    BlankValue { rule: String },
    #[error("rule {rule}: {detail}")]
    InvalidRadius { rule: String, detail: String },
    #[error("rule id {0} is declared more than once")]
    DuplicateRuleId(String),
    #[error("facet weight for {facet} must be a finite, non-negative number (found {weight})")]
    InvalidFacetWeight { facet: Facet, weight: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RuleSubject {
    Field(PropertyField),
    DistanceFrom(GeoPoint),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledRule {
    pub(crate) id: String,
    pub(crate) facet: Facet,
    pub(crate) subject: RuleSubject,
    pub(crate) check: Check,
    pub(crate) weight: f64,
    pub(crate) required: bool,
}

pub(crate) fn compile(criteria: &InvestmentCriteria) -> Result<Vec<CompiledRule>, ConfigurationError> {
    for facet in Facet::ordered() {
        let weight = criteria.facet_weights.weight(facet);
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigurationError::InvalidFacetWeight { facet, weight });
        }
    }

    let mut rules = Vec::new();

    let geo = &criteria.geographic;
    let set_rules = [
        ("geographic.state", PropertyField::State, &geo.states, true),
        ("geographic.state.exclude", PropertyField::State, &geo.excluded_states, false),
        ("geographic.city", PropertyField::City, &geo.cities, true),
        ("geographic.city.exclude", PropertyField::City, &geo.excluded_cities, false),
        ("geographic.zip_code", PropertyField::ZipCode, &geo.zip_codes, true),
        ("geographic.zip_code.exclude", PropertyField::ZipCode, &geo.excluded_zip_codes, false),
    ];
    for (id, field, criterion, allow) in set_rules {
        if let Some(criterion) = criterion {
            rules.push(set_rule(id, Facet::Geographic, field, criterion, allow)?);
        }
    }
    if let Some(radius) = &geo.radius {
        rules.push(radius_rule("geographic.radius", radius)?);
    }

    let fin = &criteria.financial;
    let financial_ranges = [
        (PropertyField::Price, &fin.price),
        (PropertyField::CapRate, &fin.cap_rate),
        (PropertyField::CashFlow, &fin.cash_flow),
        (PropertyField::Roi, &fin.roi),
        (PropertyField::CashOnCash, &fin.cash_on_cash),
        (PropertyField::Ltv, &fin.ltv),
        (PropertyField::EquityPercentage, &fin.equity_percentage),
        (PropertyField::RepairCost, &fin.repair_cost),
        (PropertyField::Arv, &fin.arv),
    ];
    for (field, range) in financial_ranges {
        if let Some(range) = range {
            rules.push(range_rule(Facet::Financial, field, range)?);
        }
    }

    let prop = &criteria.property;
    let property_ranges = [
        (PropertyField::Bedrooms, &prop.bedrooms),
        (PropertyField::Bathrooms, &prop.bathrooms),
        (PropertyField::SquareFeet, &prop.square_feet),
        (PropertyField::LotSize, &prop.lot_size),
        (PropertyField::YearBuilt, &prop.year_built),
    ];
    for (field, range) in property_ranges {
        if let Some(range) = range {
            rules.push(range_rule(Facet::Property, field, range)?);
        }
    }
    if let Some(types) = &prop.property_types {
        rules.push(set_rule(
            "property.property_type",
            Facet::Property,
            PropertyField::PropertyType,
            types,
            true,
        )?);
    }
    if let Some(required) = &prop.required_features {
        rules.extend(required_feature_rules(required)?);
    }
    if let Some(excluded) = &prop.excluded_features {
        rules.push(excluded_feature_rule(excluded)?);
    }

    let market = &criteria.market;
    let market_ranges = [
        (PropertyField::DaysOnMarket, &market.days_on_market),
        (PropertyField::PriceReductionPct, &market.price_reduction_pct),
    ];
    for (field, range) in market_ranges {
        if let Some(range) = range {
            rules.push(range_rule(Facet::Market, field, range)?);
        }
    }
    let flags = [
        ("market.distressed", PropertyField::IsDistressed, &market.distressed),
        ("market.foreclosure", PropertyField::IsForeclosure, &market.foreclosure),
        ("market.off_market", PropertyField::IsOffMarket, &market.off_market),
    ];
    for (id, field, flag) in flags {
        if let Some(flag) = flag {
            rules.push(flag_rule(id, field, flag)?);
        }
    }

    for (index, rule) in criteria.custom_rules.iter().enumerate() {
        rules.push(compile_rule(index, rule)?);
    }

    let mut seen = HashSet::new();
    for rule in &rules {
        if !seen.insert(rule.id.as_str()) {
            return Err(ConfigurationError::DuplicateRuleId(rule.id.clone()));
        }
    }

    Ok(rules)
}

fn check_weight(rule: &str, weight: f64) -> Result<f64, ConfigurationError> {
    if weight.is_finite() && (0.0..=MAX_RULE_WEIGHT).contains(&weight) {
        Ok(weight)
    } else {
        Err(ConfigurationError::InvalidWeight {
            rule: rule.to_string(),
            weight,
        })
    }
}

fn finite(rule: &str, operator: RuleOperator, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::ValueShape {
            rule: rule.to_string(),
            operator,
            expected: "a finite number",
            found: value.to_string(),
        })
    }
}

fn range_rule(
    facet: Facet,
    field: PropertyField,
    range: &RangeCriterion,
) -> Result<CompiledRule, ConfigurationError> {
    let id = format!("{}.{}", facet.label(), field.name());
    let weight = check_weight(&id, range.weight)?;

    let check = match (range.min, range.max) {
        (Some(min), Some(max)) => {
            let min = finite(&id, RuleOperator::Between, min)?;
            let max = finite(&id, RuleOperator::Between, max)?;
            if min > max {
                return Err(ConfigurationError::InvertedRange { rule: id, min, max });
            }
            Check::Between(min, max)
        }
        (Some(min), None) => Check::GreaterEqual(finite(&id, RuleOperator::GreaterEqual, min)?),
        (None, Some(max)) => Check::LessEqual(finite(&id, RuleOperator::LessEqual, max)?),
        (None, None) => return Err(ConfigurationError::EmptyRange { rule: id }),
    };

    Ok(CompiledRule {
        id,
        facet,
        subject: RuleSubject::Field(field),
        check,
        weight,
        required: range.required,
    })
}

fn set_rule(
    id: &str,
    facet: Facet,
    field: PropertyField,
    criterion: &SetCriterion,
    allow: bool,
) -> Result<CompiledRule, ConfigurationError> {
    let weight = check_weight(id, criterion.weight)?;
    let options = text_options(id, &criterion.values)?
        .into_iter()
        .map(Expected::Text)
        .collect();

    Ok(CompiledRule {
        id: id.to_string(),
        facet,
        subject: RuleSubject::Field(field),
        check: if allow {
            Check::In(options)
        } else {
            Check::NotIn(options)
        },
        weight,
        required: criterion.required,
    })
}

fn radius_rule(id: &str, radius: &RadiusCriterion) -> Result<CompiledRule, ConfigurationError> {
    let weight = check_weight(id, radius.weight)?;
    let center = GeoPoint {
        latitude: radius.latitude,
        longitude: radius.longitude,
    };
    if !center.is_valid() {
        return Err(ConfigurationError::InvalidRadius {
            rule: id.to_string(),
            detail: format!(
                "center ({}, {}) is not a valid coordinate",
                radius.latitude, radius.longitude
            ),
        });
    }
    if !radius.max_miles.is_finite() || radius.max_miles <= 0.0 {
        return Err(ConfigurationError::InvalidRadius {
            rule: id.to_string(),
            detail: format!("max_miles must be positive (found {})", radius.max_miles),
        });
    }

    Ok(CompiledRule {
        id: id.to_string(),
        facet: Facet::Geographic,
        subject: RuleSubject::DistanceFrom(center),
        check: Check::LessEqual(radius.max_miles),
        weight,
        required: radius.required,
    })
}

/// Normalised text values; rejects an empty list and blank entries.
fn text_options(rule: &str, values: &[String]) -> Result<Vec<String>, ConfigurationError> {
    if values.is_empty() {
        return Err(ConfigurationError::EmptyValueList {
            rule: rule.to_string(),
        });
    }
    values
        .iter()
        .map(|value| match normalize(value) {
            text if text.is_empty() => Err(ConfigurationError::BlankValue {
                rule: rule.to_string(),
            }),
            text => Ok(text),
        })
        .collect()
}

fn required_feature_rules(
    criterion: &FeatureCriterion,
) -> Result<Vec<CompiledRule>, ConfigurationError> {
    text_options("property.features", &criterion.features)?
        .into_iter()
        .map(|needle| {
            let id = format!("property.features.{}", needle.replace(' ', "_"));
            let weight = check_weight(&id, criterion.weight)?;
            Ok(CompiledRule {
                id,
                facet: Facet::Property,
                subject: RuleSubject::Field(PropertyField::Features),
                check: Check::Contains(needle),
                weight,
                required: criterion.required,
            })
        })
        .collect()
}

fn excluded_feature_rule(criterion: &FeatureCriterion) -> Result<CompiledRule, ConfigurationError> {
    let id = "property.features.exclude";
    let weight = check_weight(id, criterion.weight)?;

    Ok(CompiledRule {
        id: id.to_string(),
        facet: Facet::Property,
        subject: RuleSubject::Field(PropertyField::Features),
        check: Check::NotIn(
            text_options(id, &criterion.features)?
                .into_iter()
                .map(Expected::Text)
                .collect(),
        ),
        weight,
        required: criterion.required,
    })
}

fn flag_rule(
    id: &str,
    field: PropertyField,
    flag: &FlagCriterion,
) -> Result<CompiledRule, ConfigurationError> {
    let weight = check_weight(id, flag.weight)?;
    Ok(CompiledRule {
        id: id.to_string(),
        facet: Facet::Market,
        subject: RuleSubject::Field(field),
        check: Check::Equals(Expected::Flag(flag.expected)),
        weight,
        required: flag.required,
    })
}

/// Validates a free-form rule and resolves its field and operator.
pub(crate) fn compile_rule(index: usize, rule: &CriteriaRule) -> Result<CompiledRule, ConfigurationError> {
    let id = rule
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("custom.{}.{}", index, rule.field.trim()));

    let operator: RuleOperator =
        rule.operator
            .parse()
            .map_err(|_| ConfigurationError::UnknownOperator {
                rule: id.clone(),
                operator: rule.operator.clone(),
            })?;
    let field: PropertyField = rule
        .field
        .parse()
        .map_err(|_| ConfigurationError::UnknownField {
            rule: id.clone(),
            field: rule.field.clone(),
        })?;
    let weight = check_weight(&id, rule.weight)?;
    let check = build_check(&id, operator, field, &rule.value)?;

    Ok(CompiledRule {
        id,
        facet: Facet::Custom,
        subject: RuleSubject::Field(field),
        check,
        weight,
        required: rule.required,
    })
}

fn build_check(
    rule: &str,
    operator: RuleOperator,
    field: PropertyField,
    value: &CriterionValue,
) -> Result<Check, ConfigurationError> {
    let kind = field.kind();
    let supported = match operator {
        RuleOperator::Equals => kind != FieldKind::List,
        RuleOperator::GreaterThan
        | RuleOperator::LessThan
        | RuleOperator::GreaterEqual
        | RuleOperator::LessEqual
        | RuleOperator::Between => kind == FieldKind::Number,
        RuleOperator::In | RuleOperator::NotIn => kind != FieldKind::Flag,
        RuleOperator::Contains => matches!(kind, FieldKind::Text | FieldKind::List),
    };
    if !supported {
        return Err(ConfigurationError::UnsupportedOperator {
            rule: rule.to_string(),
            operator,
            field,
            kind: kind.label(),
        });
    }

    let shape_error = |expected: &'static str| ConfigurationError::ValueShape {
        rule: rule.to_string(),
        operator,
        expected,
        found: value.shape().to_string(),
    };

    let check = match operator {
        RuleOperator::Equals => Check::Equals(
            expected_scalar(kind, value).ok_or_else(|| shape_error(scalar_label(kind)))?,
        ),
        RuleOperator::GreaterThan => Check::GreaterThan(number_operand(rule, operator, value)?),
        RuleOperator::LessThan => Check::LessThan(number_operand(rule, operator, value)?),
        RuleOperator::GreaterEqual => Check::GreaterEqual(number_operand(rule, operator, value)?),
        RuleOperator::LessEqual => Check::LessEqual(number_operand(rule, operator, value)?),
        RuleOperator::Between => {
            let bounds = match value {
                CriterionValue::List(items) if items.len() == 2 => items,
                _ => return Err(shape_error("a two-element list of numbers")),
            };
            let low = number_operand(rule, operator, &bounds[0])?;
            let high = number_operand(rule, operator, &bounds[1])?;
            if low > high {
                return Err(ConfigurationError::InvertedRange {
                    rule: rule.to_string(),
                    min: low,
                    max: high,
                });
            }
            Check::Between(low, high)
        }
        RuleOperator::In | RuleOperator::NotIn => {
            let items = match value {
                CriterionValue::List(items) if items.is_empty() => {
                    return Err(ConfigurationError::EmptyValueList {
                        rule: rule.to_string(),
                    })
                }
                CriterionValue::List(items) => items,
                _ => return Err(shape_error("a list")),
            };
            let element_kind = if kind == FieldKind::List {
                FieldKind::Text
            } else {
                kind
            };
            let options = items
                .iter()
                .map(|item| {
                    expected_scalar(element_kind, item)
                        .ok_or_else(|| shape_error(scalar_label(element_kind)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if operator == RuleOperator::In {
                Check::In(options)
            } else {
                Check::NotIn(options)
            }
        }
        RuleOperator::Contains => match value {
            CriterionValue::Text(needle) if !needle.trim().is_empty() => {
                Check::Contains(normalize(needle))
            }
            _ => return Err(shape_error("a non-empty text value")),
        },
    };

    Ok(check)
}

fn number_operand(
    rule: &str,
    operator: RuleOperator,
    value: &CriterionValue,
) -> Result<f64, ConfigurationError> {
    match value {
        CriterionValue::Number(n) => finite(rule, operator, *n),
        other => Err(ConfigurationError::ValueShape {
            rule: rule.to_string(),
            operator,
            expected: "a number",
            found: other.shape().to_string(),
        }),
    }
}

fn expected_scalar(kind: FieldKind, value: &CriterionValue) -> Option<Expected> {
    match (kind, value) {
        (FieldKind::Number, CriterionValue::Number(n)) if n.is_finite() => {
            Some(Expected::Number(*n))
        }
        (FieldKind::Text, CriterionValue::Text(text)) => Some(Expected::Text(normalize(text))),
        (FieldKind::Flag, CriterionValue::Bool(flag)) => Some(Expected::Flag(*flag)),
        _ => None,
    }
}

fn scalar_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Number => "a number",
        FieldKind::Text | FieldKind::List => "text",
        FieldKind::Flag => "a boolean",
    }
}
