use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-unit adjustment factors applied when moving a comparable toward the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentFactors {
    pub per_square_foot: f64,
    pub per_bedroom: f64,
    pub per_bathroom: f64,
    /// Fraction of the comparable's sale price per year of age difference.
    pub age_factor: f64,
    /// Fraction of the comparable's sale price added as a flat location premium.
    pub location_factor: f64,
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self {
            per_square_foot: 50.0,
            per_bedroom: 10_000.0,
            per_bathroom: 7_500.0,
            age_factor: 0.005,
            location_factor: 0.02,
        }
    }
}

/// Market premium rule table layered on top of the averaged comparable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketPremiumRules {
    pub base: f64,
    pub high_demand_states: BTreeSet<String>,
    pub high_demand_premium: f64,
    /// Inclusive square-footage threshold for the large-home premium.
    pub large_home_square_feet: f64,
    pub large_home_premium: f64,
    pub family_home_bedrooms: u32,
    pub family_home_premium: f64,
    pub floor: f64,
    pub cap: f64,
}

impl Default for MarketPremiumRules {
    fn default() -> Self {
        let high_demand_states = ["AZ", "CA", "CO", "FL", "NV", "TX", "WA"]
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            base: 0.05,
            high_demand_states,
            high_demand_premium: 0.05,
            large_home_square_feet: 2_000.0,
            large_home_premium: 0.03,
            family_home_bedrooms: 4,
            family_home_premium: 0.02,
            floor: 0.0,
            cap: 0.15,
        }
    }
}

impl MarketPremiumRules {
    pub fn is_high_demand_state(&self, state: &str) -> bool {
        let state = state.trim();
        self.high_demand_states
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(state))
    }
}

/// Fallback, rounding, and renovation-uplift policy for the ARV estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArvPolicy {
    /// Multiplier applied to the current value when no comparables are available.
    pub fallback_multiplier: f64,
    pub fallback_confidence: f64,
    pub rounding_step: f64,
    /// Properties built strictly before this year receive the renovation uplift.
    pub renovation_cutoff_year: i32,
    pub renovation_multiplier: f64,
    pub recency_window_days: i64,
}

impl Default for ArvPolicy {
    fn default() -> Self {
        Self {
            fallback_multiplier: 1.3,
            fallback_confidence: 0.5,
            rounding_step: 1_000.0,
            renovation_cutoff_year: 1990,
            renovation_multiplier: 1.1,
            recency_window_days: 180,
        }
    }
}

/// Weights and caps of the three confidence components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    /// Comparable count at which the count component would reach 1.0 before capping.
    pub count_divisor: f64,
    pub count_cap: f64,
    pub similarity_weight: f64,
    pub recency_weight: f64,
    pub square_feet_share: f64,
    pub bedroom_share: f64,
    pub bathroom_share: f64,
    pub bedroom_tolerance: f64,
    pub bathroom_tolerance: f64,
    pub total_cap: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            count_divisor: 10.0,
            count_cap: 0.5,
            similarity_weight: 0.3,
            recency_weight: 0.2,
            square_feet_share: 0.4,
            bedroom_share: 0.3,
            bathroom_share: 0.3,
            bedroom_tolerance: 3.0,
            bathroom_tolerance: 2.0,
            total_cap: 1.0,
        }
    }
}

/// Everything the ARV estimator needs, injectable as one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub adjustment: AdjustmentFactors,
    pub market: MarketPremiumRules,
    pub arv: ArvPolicy,
    pub confidence: ConfidenceWeights,
}
