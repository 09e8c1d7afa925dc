use super::config::ConfidenceWeights;
use crate::money::round_places;
use crate::property::{ComparableSale, Property};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Capped contributions that sum into the ARV confidence score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub count: f64,
    pub similarity: f64,
    pub recency: f64,
    pub total: f64,
}

/// Feature similarity of one comparable to the subject, within `[0, 1]`.
///
/// Terms whose inputs are unknown on either side contribute nothing.
pub fn similarity(
    subject: &Property,
    subject_square_feet: f64,
    comp: &ComparableSale,
    weights: &ConfidenceWeights,
) -> f64 {
    let sqft_delta = ((comp.square_feet - subject_square_feet) / subject_square_feet).abs();
    let mut score = weights.square_feet_share * (1.0 - sqft_delta.min(1.0));

    if let (Some(subject_beds), Some(comp_beds)) = (subject.bedrooms, comp.bedrooms) {
        let delta = (subject_beds as f64 - comp_beds as f64).abs();
        score += weights.bedroom_share * (1.0 - (delta / weights.bedroom_tolerance).min(1.0));
    }

    if let (Some(subject_baths), Some(comp_baths)) = (subject.bathrooms, comp.bathrooms) {
        let delta = (subject_baths - comp_baths).abs();
        score += weights.bathroom_share * (1.0 - (delta / weights.bathroom_tolerance).min(1.0));
    }

    score.clamp(0.0, 1.0)
}

/// Linear decay from 1.0 for a sale on `as_of` to 0.0 at `window_days` old.
pub fn recency(comp: &ComparableSale, as_of: NaiveDate, window_days: i64) -> f64 {
    if window_days <= 0 {
        return 0.0;
    }

    match comp.days_old(as_of) {
        Some(days_old) => {
            ((window_days - days_old) as f64 / window_days as f64).clamp(0.0, 1.0)
        }
        None => 0.0,
    }
}

const COMPONENT_PLACES: i32 = 10;

pub(crate) fn combine(
    comparable_count: usize,
    similarities: &[f64],
    recencies: &[f64],
    weights: &ConfidenceWeights,
) -> ConfidenceBreakdown {
    let count = if weights.count_divisor > 0.0 {
        (comparable_count as f64 / weights.count_divisor).min(weights.count_cap)
    } else {
        weights.count_cap
    };

    let similarity = mean(similarities).map(|avg| avg * weights.similarity_weight);
    let recency = mean(recencies).map(|avg| avg * weights.recency_weight);

    // Components sit on a fixed decimal grid so the total cannot drift with the comp count.
    let count = round_places(count, COMPONENT_PLACES);
    let similarity = round_places(similarity.unwrap_or(0.0), COMPONENT_PLACES);
    let recency = round_places(recency.unwrap_or(0.0), COMPONENT_PLACES);
    let total = round_places(count + similarity + recency, COMPONENT_PLACES)
        .clamp(0.0, weights.total_cap);

    ConfidenceBreakdown {
        count,
        similarity,
        recency,
        total,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Property {
        Property {
            square_feet: Some(2_000.0),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            ..Property::default()
        }
    }

    fn comp(square_feet: f64, bedrooms: Option<u32>, sold: Option<NaiveDate>) -> ComparableSale {
        ComparableSale {
            address: "7 Oak Ct".to_string(),
            sale_price: 280_000.0,
            sale_date: sold,
            square_feet,
            bedrooms,
            bathrooms: Some(2.0),
            year_built: None,
            property_type: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn identical_comp_is_fully_similar() {
        let weights = ConfidenceWeights::default();
        let score = similarity(&subject(), 2_000.0, &comp(2_000.0, Some(3), None), &weights);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_bedrooms_forfeit_their_share() {
        let weights = ConfidenceWeights::default();
        let score = similarity(&subject(), 2_000.0, &comp(2_000.0, None, None), &weights);
        assert!((score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn square_foot_term_saturates_at_double_size() {
        let weights = ConfidenceWeights::default();
        let score = similarity(&subject(), 2_000.0, &comp(5_000.0, Some(3), None), &weights);
        assert!((score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn recency_decays_linearly_and_clamps() {
        let as_of = date(2025, 7, 1);
        let fresh = comp(2_000.0, Some(3), Some(as_of));
        let half = comp(2_000.0, Some(3), Some(as_of - chrono::Duration::days(90)));
        let stale = comp(2_000.0, Some(3), Some(date(2024, 1, 1)));
        let future = comp(2_000.0, Some(3), Some(date(2025, 8, 1)));
        let undated = comp(2_000.0, Some(3), None);

        assert_eq!(recency(&fresh, as_of, 180), 1.0);
        assert_eq!(recency(&half, as_of, 180), 0.5);
        assert_eq!(recency(&stale, as_of, 180), 0.0);
        assert_eq!(recency(&future, as_of, 180), 1.0);
        assert_eq!(recency(&undated, as_of, 180), 0.0);
    }

    #[test]
    fn count_component_caps_at_half() {
        let weights = ConfidenceWeights::default();
        let few = combine(2, &[0.0, 0.0], &[0.0, 0.0], &weights);
        let many = combine(12, &[0.0; 12], &[0.0; 12], &weights);

        assert!((few.count - 0.2).abs() < 1e-12);
        assert_eq!(many.count, 0.5);
    }

    #[test]
    fn total_is_stable_across_comp_counts_with_identical_inputs() {
        let weights = ConfidenceWeights::default();
        let totals: Vec<f64> = (5..=12)
            .map(|n| combine(n, &vec![0.9; n], &vec![2.0 / 3.0; n], &weights).total)
            .collect();

        for pair in totals.windows(2) {
            assert!(pair[1] >= pair[0], "confidence dropped: {totals:?}");
        }
    }

    #[test]
    fn perfect_inputs_reach_total_cap() {
        let weights = ConfidenceWeights::default();
        let breakdown = combine(10, &[1.0; 10], &[1.0; 10], &weights);
        assert!((breakdown.total - 1.0).abs() < 1e-12);
        assert!(breakdown.total <= 1.0);
    }
}
