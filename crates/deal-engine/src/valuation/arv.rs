use super::adjustment::{adjust, ComparableAdjustment};
use super::confidence::{self, ConfidenceBreakdown};
use super::config::ValuationConfig;
use super::premium::market_premium;
use crate::money::{round_currency, round_to_step};
use crate::property::{
    validate_comparables, validate_subject, ComparableSale, Property, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const NO_COMPARABLES: &str = "No comparable properties available";

/// After-repair value estimate with its confidence and the trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArvResult {
    pub arv_estimate: f64,
    pub confidence_score: f64,
    pub comparable_count: usize,
    pub market_premium: f64,
    /// Mean adjusted comparable value before the premium; `None` on the fallback path.
    pub base_arv: Option<f64>,
    pub renovation_uplift_applied: bool,
    pub confidence: ConfidenceBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<ComparableAdjustment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calculation_errors: Vec<String>,
}

impl ArvResult {
    pub fn is_degraded(&self) -> bool {
        !self.calculation_errors.is_empty()
    }
}

/// Stateless estimator that applies the valuation tables to a subject and its comps.
#[derive(Debug, Clone, Default)]
pub struct ArvEstimator {
    config: ValuationConfig,
}

impl ArvEstimator {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// Estimate the ARV. Recency is measured against `as_of`.
    pub fn estimate(
        &self,
        subject: &Property,
        comparables: &[ComparableSale],
        as_of: NaiveDate,
    ) -> Result<ArvResult, ValidationError> {
        let subject_square_feet = validate_subject(subject)?;
        validate_comparables(comparables)?;

        let premium = market_premium(subject, &self.config.market);

        if comparables.is_empty() {
            return Ok(self.fallback(subject, premium));
        }

        let policy = &self.config.arv;
        let mut calculation_errors = Vec::new();
        let mut adjustments = Vec::with_capacity(comparables.len());
        let mut similarities = Vec::with_capacity(comparables.len());
        let mut recencies = Vec::with_capacity(comparables.len());

        for comp in comparables {
            adjustments.push(adjust(
                subject,
                subject_square_feet,
                comp,
                &self.config.adjustment,
            ));
            similarities.push(confidence::similarity(
                subject,
                subject_square_feet,
                comp,
                &self.config.confidence,
            ));
            recencies.push(confidence::recency(
                comp,
                as_of,
                policy.recency_window_days,
            ));

            if comp.sale_date.is_none() {
                calculation_errors.push(format!(
                    "Comparable {} has no sale date; recency scored as 0",
                    comp.address
                ));
            }
            let rooms_unknown = subject.bedrooms.is_none()
                || subject.bathrooms.is_none()
                || comp.bedrooms.is_none()
                || comp.bathrooms.is_none();
            if rooms_unknown {
                calculation_errors.push(format!(
                    "Comparable {} cannot be compared on room counts; those terms omitted",
                    comp.address
                ));
            }
        }

        let base_arv = adjustments
            .iter()
            .map(|adjustment| adjustment.adjusted_value)
            .sum::<f64>()
            / adjustments.len() as f64;

        let mut arv_estimate = round_to_step(base_arv * (1.0 + premium), policy.rounding_step);

        let renovation_uplift_applied = subject
            .year_built
            .map(|year| year < policy.renovation_cutoff_year)
            .unwrap_or(false);
        if renovation_uplift_applied {
            arv_estimate = round_currency(arv_estimate * policy.renovation_multiplier);
        }

        let confidence = confidence::combine(
            comparables.len(),
            &similarities,
            &recencies,
            &self.config.confidence,
        );

        debug!(
            comparable_count = comparables.len(),
            market_premium = premium,
            base_arv,
            arv_estimate,
            confidence = confidence.total,
            "arv estimated from comparables"
        );

        Ok(ArvResult {
            arv_estimate,
            confidence_score: confidence.total,
            comparable_count: comparables.len(),
            market_premium: premium,
            base_arv: Some(base_arv),
            renovation_uplift_applied,
            confidence,
            adjustments,
            calculation_errors,
        })
    }

    fn fallback(&self, subject: &Property, premium: f64) -> ArvResult {
        let policy = &self.config.arv;
        let arv_estimate = subject
            .current_value
            .map(|value| round_currency(value * policy.fallback_multiplier))
            .unwrap_or(0.0);

        warn!(
            arv_estimate,
            "no comparables supplied; falling back to current value multiplier"
        );

        let mut calculation_errors = vec![NO_COMPARABLES.to_string()];
        if subject.current_value.is_none() {
            calculation_errors.push("Subject has no current value; ARV defaulted to 0".to_string());
        }

        ArvResult {
            arv_estimate,
            confidence_score: policy.fallback_confidence,
            comparable_count: 0,
            market_premium: premium,
            base_arv: None,
            renovation_uplift_applied: false,
            confidence: ConfidenceBreakdown {
                total: policy.fallback_confidence,
                ..ConfidenceBreakdown::default()
            },
            adjustments: Vec::new(),
            calculation_errors,
        }
    }
}
