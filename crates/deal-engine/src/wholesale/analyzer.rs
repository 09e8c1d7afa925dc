use super::config::{DealScoreWeights, WholesaleParameters};
use super::ladder::{DealCategory, ScoreLadder};
use crate::money::round_currency;
use crate::property::{validate_condition_score, ComparableSale, Property, ValidationError};
use crate::valuation::{ArvEstimator, HeuristicRepairModel, RenovationLevel, RepairCostModel};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cost stack subtracted from the ARV to reach the maximum allowable offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DealCosts {
    pub repair_cost: f64,
    pub holding_time_months: f64,
    pub holding_costs: f64,
    pub closing_costs: f64,
    pub min_profit: f64,
    pub max_wholesale_fee: f64,
}

impl DealCosts {
    pub fn compute(
        arv: f64,
        repair_cost: f64,
        current_value: Option<f64>,
        renovation_level: RenovationLevel,
        square_feet: f64,
        params: &WholesaleParameters,
    ) -> Self {
        let holding_time_months = params
            .holding_time
            .holding_months(renovation_level, square_feet);
        let holding_costs = current_value.unwrap_or(0.0)
            * params.holding_cost_monthly_rate
            * holding_time_months;

        Self {
            repair_cost,
            holding_time_months,
            holding_costs,
            closing_costs: arv * params.closing_cost_rate,
            min_profit: arv * params.min_profit_margin,
            max_wholesale_fee: arv * params.max_wholesale_fee_pct,
        }
    }

    /// The same stack with each monetary term rounded to a whole unit, for reporting.
    pub fn rounded(&self) -> Self {
        Self {
            repair_cost: round_currency(self.repair_cost),
            holding_time_months: self.holding_time_months,
            holding_costs: round_currency(self.holding_costs),
            closing_costs: round_currency(self.closing_costs),
            min_profit: round_currency(self.min_profit),
            max_wholesale_fee: round_currency(self.max_wholesale_fee),
        }
    }

    pub fn total(&self) -> f64 {
        self.repair_cost
            + self.holding_costs
            + self.closing_costs
            + self.min_profit
            + self.max_wholesale_fee
    }

    /// Rounded once, after the unrounded terms are subtracted.
    pub fn maximum_allowable_offer(&self, arv: f64) -> f64 {
        round_currency(arv - self.total())
    }
}

/// Normalised score components, each within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub spread_score: f64,
    pub confidence_score: f64,
    pub condition_score: f64,
    pub size_score: f64,
}

impl ScoreBreakdown {
    pub fn compute(
        arv: f64,
        spread: f64,
        arv_confidence: f64,
        renovation_confidence: f64,
        condition_score: f64,
        weights: &DealScoreWeights,
    ) -> Self {
        let spread_score = if arv > 0.0 && weights.ideal_spread_ratio > 0.0 {
            ((spread / arv) / weights.ideal_spread_ratio).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let size_score = if weights.size_reference > 0.0 {
            (arv / weights.size_reference).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            spread_score,
            confidence_score: ((arv_confidence + renovation_confidence) / 2.0).clamp(0.0, 1.0),
            condition_score: condition_score.clamp(0.0, 1.0),
            size_score,
        }
    }

    /// Weighted 0-100 deal score, unrounded.
    pub fn deal_score(&self, weights: &DealScoreWeights) -> f64 {
        let raw = weights.spread * self.spread_score
            + weights.confidence * self.confidence_score
            + weights.condition * self.condition_score
            + weights.size * self.size_score;
        (raw * 100.0).clamp(0.0, 100.0)
    }
}

/// Category and fee share picked from a deal score on the ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DealRating {
    pub(crate) category: DealCategory,
    pub(crate) suggested_fee: f64,
}

impl DealRating {
    pub(crate) fn rate(ladder: &ScoreLadder, deal_score: f64, spread: f64, max_fee: f64) -> Self {
        let fee_share = ladder.fee_share_for(deal_score);
        Self {
            category: ladder.category_for(deal_score),
            suggested_fee: round_currency((spread * fee_share).min(max_fee).max(0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WholesaleDealResult {
    pub arv: f64,
    pub arv_confidence: f64,
    pub repair_cost: f64,
    pub renovation_level: RenovationLevel,
    pub costs: DealCosts,
    pub mao: f64,
    pub spread: f64,
    pub deal_score: f64,
    pub category: DealCategory,
    pub suggested_fee: f64,
    pub score_breakdown: ScoreBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Composes the ARV estimator and a repair model into wholesale deal economics.
#[derive(Debug, Clone)]
pub struct WholesaleDealAnalyzer<M = HeuristicRepairModel> {
    estimator: ArvEstimator,
    repair_model: M,
    parameters: WholesaleParameters,
    weights: DealScoreWeights,
    ladder: ScoreLadder,
}

impl Default for WholesaleDealAnalyzer<HeuristicRepairModel> {
    fn default() -> Self {
        Self::new(
            ArvEstimator::default(),
            HeuristicRepairModel::default(),
            WholesaleParameters::default(),
            DealScoreWeights::default(),
            ScoreLadder::default(),
        )
    }
}

impl<M: RepairCostModel> WholesaleDealAnalyzer<M> {
    pub fn new(
        estimator: ArvEstimator,
        repair_model: M,
        parameters: WholesaleParameters,
        weights: DealScoreWeights,
        ladder: ScoreLadder,
    ) -> Self {
        Self {
            estimator,
            repair_model,
            parameters,
            weights,
            ladder,
        }
    }

    pub fn parameters(&self) -> &WholesaleParameters {
        &self.parameters
    }

    /// Analyze with the analyzer's configured parameters.
    pub fn analyze(
        &self,
        property: &Property,
        comparables: &[ComparableSale],
        condition_score: f64,
        as_of: NaiveDate,
    ) -> Result<WholesaleDealResult, ValidationError> {
        self.analyze_with(
            property,
            comparables,
            condition_score,
            as_of,
            &self.parameters,
        )
    }

    /// Analyze with per-call parameter overrides.
    pub fn analyze_with(
        &self,
        property: &Property,
        comparables: &[ComparableSale],
        condition_score: f64,
        as_of: NaiveDate,
        parameters: &WholesaleParameters,
    ) -> Result<WholesaleDealResult, ValidationError> {
        parameters.validate()?;
        let condition_score = validate_condition_score(condition_score)?;

        let arv_result = self.estimator.estimate(property, comparables, as_of)?;
        let arv = arv_result.arv_estimate;
        let repair = self
            .repair_model
            .estimate(property, condition_score, as_of.year())?;
        let square_feet = property.require_square_feet()?;

        let mut warnings = arv_result.calculation_errors;

        let costs = DealCosts::compute(
            arv,
            repair.total_cost,
            property.current_value,
            repair.renovation_level,
            square_feet,
            parameters,
        );
        let mao = costs.maximum_allowable_offer(arv);

        let spread = match property.current_value {
            Some(current_value) => round_currency(mao - current_value),
            None => {
                warnings.push(
                    "Subject has no current value; holding costs and spread set to 0".to_string(),
                );
                0.0
            }
        };

        let score_breakdown = ScoreBreakdown::compute(
            arv,
            spread,
            arv_result.confidence_score,
            repair.confidence_score,
            condition_score,
            &self.weights,
        );
        let deal_score = score_breakdown.deal_score(&self.weights);
        let DealRating {
            category,
            suggested_fee,
        } = DealRating::rate(&self.ladder, deal_score, spread, costs.max_wholesale_fee);
        let costs = costs.rounded();

        info!(
            arv,
            mao,
            spread,
            deal_score,
            category = category.label(),
            suggested_fee,
            "wholesale deal analyzed"
        );

        Ok(WholesaleDealResult {
            arv,
            arv_confidence: arv_result.confidence_score,
            repair_cost: costs.repair_cost,
            renovation_level: repair.renovation_level,
            costs,
            mao,
            spread,
            deal_score,
            category,
            suggested_fee,
            score_breakdown,
            warnings,
        })
    }
}
