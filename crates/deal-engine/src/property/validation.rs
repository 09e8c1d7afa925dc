use super::{ComparableSale, Property};

/// Structural problems in property input. Never silently corrected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid property data: {field} {detail}")]
    InvalidPropertyData { field: &'static str, detail: String },
    #[error("invalid comparable #{index} ({address}): {field} {detail}")]
    InvalidComparable {
        index: usize,
        address: String,
        field: &'static str,
        detail: String,
    },
    #[error("condition score must lie within [0, 1] (found {0})")]
    ConditionScoreOutOfRange(f64),
    #[error("parameter {name} must be a finite, non-negative number (found {value})")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub(crate) fn positive_square_feet(value: Option<f64>) -> Result<f64, ValidationError> {
    match value {
        Some(sqft) if sqft.is_finite() && sqft > 0.0 => Ok(sqft),
        Some(sqft) => Err(ValidationError::InvalidPropertyData {
            field: "square_feet",
            detail: format!("must be greater than zero (found {sqft})"),
        }),
        None => Err(ValidationError::InvalidPropertyData {
            field: "square_feet",
            detail: "is required for valuation".to_string(),
        }),
    }
}

fn non_negative(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(ValidationError::InvalidPropertyData {
                field,
                detail: format!("must be a non-negative amount (found {amount})"),
            })
        }
        _ => Ok(()),
    }
}

/// Checks the subject before it enters the valuation chain.
pub(crate) fn validate_subject(subject: &Property) -> Result<f64, ValidationError> {
    let square_feet = positive_square_feet(subject.square_feet)?;
    non_negative("current_value", subject.current_value)?;
    non_negative("asking_price", subject.asking_price)?;
    non_negative("bathrooms", subject.bathrooms)?;
    Ok(square_feet)
}

pub(crate) fn validate_comparables(comparables: &[ComparableSale]) -> Result<(), ValidationError> {
    for (index, comp) in comparables.iter().enumerate() {
        let invalid = |field: &'static str, detail: String| ValidationError::InvalidComparable {
            index,
            address: comp.address.clone(),
            field,
            detail,
        };

        if !comp.square_feet.is_finite() || comp.square_feet <= 0.0 {
            return Err(invalid(
                "square_feet",
                format!("must be greater than zero (found {})", comp.square_feet),
            ));
        }
        if !comp.sale_price.is_finite() || comp.sale_price <= 0.0 {
            return Err(invalid(
                "sale_price",
                format!("must be greater than zero (found {})", comp.sale_price),
            ));
        }
        if let Some(baths) = comp.bathrooms {
            if !baths.is_finite() || baths < 0.0 {
                return Err(invalid(
                    "bathrooms",
                    format!("must be non-negative (found {baths})"),
                ));
            }
        }
    }

    Ok(())
}

pub(crate) fn validate_condition_score(score: f64) -> Result<f64, ValidationError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(ValidationError::ConditionScoreOutOfRange(score))
    }
}

pub(crate) fn validate_rate(name: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(square_feet: Option<f64>) -> Property {
        Property {
            square_feet,
            current_value: Some(250_000.0),
            ..Property::default()
        }
    }

    #[test]
    fn rejects_zero_and_negative_square_feet() {
        for sqft in [0.0, -12.0] {
            match validate_subject(&subject(Some(sqft))) {
                Err(ValidationError::InvalidPropertyData { field, .. }) => {
                    assert_eq!(field, "square_feet")
                }
                other => panic!("expected invalid square feet, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_missing_square_feet() {
        assert!(validate_subject(&subject(None)).is_err());
    }

    #[test]
    fn rejects_negative_current_value() {
        let mut property = subject(Some(1_400.0));
        property.current_value = Some(-1.0);
        match validate_subject(&property) {
            Err(ValidationError::InvalidPropertyData { field, .. }) => {
                assert_eq!(field, "current_value")
            }
            other => panic!("expected invalid current value, got {other:?}"),
        }
    }

    #[test]
    fn reports_offending_comparable_index() {
        let comps = vec![
            ComparableSale {
                address: "12 Elm".to_string(),
                sale_price: 300_000.0,
                sale_date: None,
                square_feet: 1_500.0,
                bedrooms: Some(3),
                bathrooms: Some(2.0),
                year_built: None,
                property_type: None,
            },
            ComparableSale {
                address: "14 Elm".to_string(),
                sale_price: 310_000.0,
                sale_date: None,
                square_feet: 0.0,
                bedrooms: None,
                bathrooms: None,
                year_built: None,
                property_type: None,
            },
        ];

        match validate_comparables(&comps) {
            Err(ValidationError::InvalidComparable { index, address, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(address, "14 Elm");
            }
            other => panic!("expected invalid comparable, got {other:?}"),
        }
    }

    #[test]
    fn condition_score_must_be_a_unit_fraction() {
        assert!(validate_condition_score(0.0).is_ok());
        assert!(validate_condition_score(1.0).is_ok());
        assert!(validate_condition_score(1.01).is_err());
        assert!(validate_condition_score(f64::NAN).is_err());
    }
}
