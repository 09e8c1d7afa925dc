use super::config::AdjustmentFactors;
use crate::property::{ComparableSale, Property};
use serde::{Deserialize, Serialize};

/// Audit trail of the adjustment terms applied to one comparable.
///
/// A term is `None` when the data needed to compute it was missing and it was omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableAdjustment {
    pub address: String,
    pub sale_price: f64,
    pub square_feet: f64,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub age: Option<f64>,
    pub location: f64,
    pub adjusted_value: f64,
}

impl ComparableAdjustment {
    pub fn total_adjustment(&self) -> f64 {
        self.adjusted_value - self.sale_price
    }
}

/// Moves `comp.sale_price` toward the subject's feature set.
pub fn adjust(
    subject: &Property,
    subject_square_feet: f64,
    comp: &ComparableSale,
    factors: &AdjustmentFactors,
) -> ComparableAdjustment {
    let square_feet = (subject_square_feet - comp.square_feet) * factors.per_square_foot;

    let bedrooms = match (subject.bedrooms, comp.bedrooms) {
        (Some(subject_beds), Some(comp_beds)) => {
            Some((subject_beds as f64 - comp_beds as f64) * factors.per_bedroom)
        }
        _ => None,
    };

    let bathrooms = match (subject.bathrooms, comp.bathrooms) {
        (Some(subject_baths), Some(comp_baths)) => {
            Some((subject_baths - comp_baths) * factors.per_bathroom)
        }
        _ => None,
    };

    let age = match (subject.year_built, comp.year_built) {
        (Some(subject_year), Some(comp_year)) => {
            Some((subject_year - comp_year) as f64 * comp.sale_price * factors.age_factor)
        }
        _ => None,
    };

    let location = comp.sale_price * factors.location_factor;

    let adjusted_value = comp.sale_price
        + square_feet
        + bedrooms.unwrap_or(0.0)
        + bathrooms.unwrap_or(0.0)
        + age.unwrap_or(0.0)
        + location;

    ComparableAdjustment {
        address: comp.address.clone(),
        sale_price: comp.sale_price,
        square_feet,
        bedrooms,
        bathrooms,
        age,
        location,
        adjusted_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Property {
        Property {
            square_feet: Some(1_600.0),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            year_built: Some(2000),
            ..Property::default()
        }
    }

    fn comp() -> ComparableSale {
        ComparableSale {
            address: "41 Birch Ln".to_string(),
            sale_price: 300_000.0,
            sale_date: None,
            square_feet: 1_500.0,
            bedrooms: Some(2),
            bathrooms: Some(1.5),
            year_built: Some(1995),
            property_type: Some("single_family".to_string()),
        }
    }

    #[test]
    fn sums_every_term_onto_sale_price() {
        let factors = AdjustmentFactors::default();
        let adjustment = adjust(&subject(), 1_600.0, &comp(), &factors);

        assert_eq!(adjustment.square_feet, 5_000.0);
        assert_eq!(adjustment.bedrooms, Some(10_000.0));
        assert_eq!(adjustment.bathrooms, Some(3_750.0));
        assert_eq!(adjustment.age, Some(7_500.0));
        assert_eq!(adjustment.location, 6_000.0);
        assert_eq!(adjustment.adjusted_value, 332_250.0);
        assert_eq!(adjustment.total_adjustment(), 32_250.0);
    }

    #[test]
    fn omits_terms_for_unknown_comp_fields() {
        let factors = AdjustmentFactors::default();
        let mut sparse = comp();
        sparse.bedrooms = None;
        sparse.bathrooms = None;
        sparse.year_built = None;

        let adjustment = adjust(&subject(), 1_600.0, &sparse, &factors);

        assert_eq!(adjustment.bedrooms, None);
        assert_eq!(adjustment.bathrooms, None);
        assert_eq!(adjustment.age, None);
        assert_eq!(adjustment.adjusted_value, 300_000.0 + 5_000.0 + 6_000.0);
    }

    #[test]
    fn location_premium_is_always_applied() {
        let factors = AdjustmentFactors {
            per_square_foot: 0.0,
            per_bedroom: 0.0,
            per_bathroom: 0.0,
            age_factor: 0.0,
            location_factor: 0.1,
        };
        let adjustment = adjust(&Property::default(), 1_500.0, &comp(), &factors);
        assert_eq!(adjustment.adjusted_value, 330_000.0);
    }
}
