use crate::property::{validate_rate, ValidationError};
use crate::valuation::RenovationLevel;
use serde::{Deserialize, Serialize};

/// Holding-period assumptions keyed by renovation scope and home size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingTimeTable {
    pub basic_months: f64,
    pub medium_months: f64,
    pub luxury_months: f64,
    /// Strictly-greater square-footage thresholds with their multipliers, largest first.
    pub large_home_square_feet: f64,
    pub large_home_factor: f64,
    pub mid_home_square_feet: f64,
    pub mid_home_factor: f64,
}

impl Default for HoldingTimeTable {
    fn default() -> Self {
        Self {
            basic_months: 1.0,
            medium_months: 2.5,
            luxury_months: 4.0,
            large_home_square_feet: 3_000.0,
            large_home_factor: 1.5,
            mid_home_square_feet: 2_000.0,
            mid_home_factor: 1.2,
        }
    }
}

impl HoldingTimeTable {
    pub fn base_months(&self, level: RenovationLevel) -> f64 {
        match level {
            RenovationLevel::Basic => self.basic_months,
            RenovationLevel::Medium => self.medium_months,
            RenovationLevel::Luxury => self.luxury_months,
        }
    }

    pub fn size_factor(&self, square_feet: f64) -> f64 {
        if square_feet > self.large_home_square_feet {
            self.large_home_factor
        } else if square_feet > self.mid_home_square_feet {
            self.mid_home_factor
        } else {
            1.0
        }
    }

    pub fn holding_months(&self, level: RenovationLevel, square_feet: f64) -> f64 {
        self.base_months(level) * self.size_factor(square_feet)
    }
}

/// Deal-level percentages. Defaults match the usual wholesale underwriting rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WholesaleParameters {
    pub max_wholesale_fee_pct: f64,
    pub min_profit_margin: f64,
    pub holding_cost_monthly_rate: f64,
    pub closing_cost_rate: f64,
    pub holding_time: HoldingTimeTable,
}

impl Default for WholesaleParameters {
    fn default() -> Self {
        Self {
            max_wholesale_fee_pct: 0.15,
            min_profit_margin: 0.20,
            holding_cost_monthly_rate: 0.01,
            closing_cost_rate: 0.06,
            holding_time: HoldingTimeTable::default(),
        }
    }
}

impl WholesaleParameters {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        validate_rate("max_wholesale_fee_pct", self.max_wholesale_fee_pct)?;
        validate_rate("min_profit_margin", self.min_profit_margin)?;
        validate_rate("holding_cost_monthly_rate", self.holding_cost_monthly_rate)?;
        validate_rate("closing_cost_rate", self.closing_cost_rate)?;
        Ok(())
    }
}

/// Component weights of the 0-100 deal score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealScoreWeights {
    pub spread: f64,
    pub confidence: f64,
    pub condition: f64,
    pub size: f64,
    /// Spread as a fraction of ARV that earns the full spread component.
    pub ideal_spread_ratio: f64,
    /// ARV that earns the full size component.
    pub size_reference: f64,
}

impl Default for DealScoreWeights {
    fn default() -> Self {
        Self {
            spread: 0.4,
            confidence: 0.3,
            condition: 0.2,
            size: 0.1,
            ideal_spread_ratio: 0.3,
            size_reference: 1_000_000.0,
        }
    }
}
