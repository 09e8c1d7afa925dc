use crate::money::round_to_step;
use crate::property::{validate_condition_score, Property, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Renovation scope classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenovationLevel {
    Basic,
    Medium,
    Luxury,
}

impl RenovationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Medium => "medium",
            Self::Luxury => "luxury",
        }
    }
}

impl fmt::Display for RenovationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairEstimate {
    pub total_cost: f64,
    pub renovation_level: RenovationLevel,
    pub confidence_score: f64,
    pub cost_per_square_foot: f64,
    pub age_multiplier: f64,
}

/// Anything that can turn a property and a condition signal into a repair estimate.
///
/// `condition_score` runs from 0.0 (gut job) to 1.0 (turnkey).
pub trait RepairCostModel: Send + Sync {
    fn estimate(
        &self,
        property: &Property,
        condition_score: f64,
        as_of_year: i32,
    ) -> Result<RepairEstimate, ValidationError>;
}

/// Per-square-foot cost band for one renovation level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub low: f64,
    pub high: f64,
}

impl CostRange {
    fn interpolate(&self, severity: f64) -> f64 {
        self.low + (self.high - self.low) * severity.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairCostTable {
    pub basic: CostRange,
    pub medium: CostRange,
    pub luxury: CostRange,
    /// Condition at or above which only cosmetic work is assumed.
    pub basic_min_condition: f64,
    pub medium_min_condition: f64,
    /// Years of age that double the baseline cost.
    pub age_horizon_years: f64,
    pub rounding_step: f64,
    pub confidence_with_age: f64,
    pub confidence_without_age: f64,
}

impl Default for RepairCostTable {
    fn default() -> Self {
        Self {
            basic: CostRange {
                low: 15.0,
                high: 30.0,
            },
            medium: CostRange {
                low: 30.0,
                high: 55.0,
            },
            luxury: CostRange {
                low: 55.0,
                high: 90.0,
            },
            basic_min_condition: 0.7,
            medium_min_condition: 0.4,
            age_horizon_years: 50.0,
            rounding_step: 100.0,
            confidence_with_age: 0.75,
            confidence_without_age: 0.55,
        }
    }
}

impl RepairCostTable {
    pub fn level_for(&self, condition_score: f64) -> RenovationLevel {
        if condition_score >= self.basic_min_condition {
            RenovationLevel::Basic
        } else if condition_score >= self.medium_min_condition {
            RenovationLevel::Medium
        } else {
            RenovationLevel::Luxury
        }
    }

    pub fn range(&self, level: RenovationLevel) -> CostRange {
        match level {
            RenovationLevel::Basic => self.basic,
            RenovationLevel::Medium => self.medium,
            RenovationLevel::Luxury => self.luxury,
        }
    }

    /// Where `condition_score` sits inside its level's band, 0.0 best to 1.0 worst.
    fn severity_within(&self, level: RenovationLevel, condition_score: f64) -> f64 {
        let (floor, ceiling) = match level {
            RenovationLevel::Basic => (self.basic_min_condition, 1.0),
            RenovationLevel::Medium => (self.medium_min_condition, self.basic_min_condition),
            RenovationLevel::Luxury => (0.0, self.medium_min_condition),
        };

        let span = ceiling - floor;
        if span <= 0.0 {
            return 0.0;
        }
        ((ceiling - condition_score) / span).clamp(0.0, 1.0)
    }
}

/// Square footage times a condition-driven cost band, scaled up for older homes.
#[derive(Debug, Clone, Default)]
pub struct HeuristicRepairModel {
    table: RepairCostTable,
}

impl HeuristicRepairModel {
    pub fn new(table: RepairCostTable) -> Self {
        Self { table }
    }

    fn age_multiplier(&self, property: &Property, as_of_year: i32) -> Option<f64> {
        let age = property.age_in(as_of_year)? as f64;
        if self.table.age_horizon_years <= 0.0 {
            return Some(1.0);
        }
        Some(1.0 + (age / self.table.age_horizon_years).min(1.0))
    }
}

impl RepairCostModel for HeuristicRepairModel {
    fn estimate(
        &self,
        property: &Property,
        condition_score: f64,
        as_of_year: i32,
    ) -> Result<RepairEstimate, ValidationError> {
        let square_feet = property.require_square_feet()?;
        let condition_score = validate_condition_score(condition_score)?;

        let renovation_level = self.table.level_for(condition_score);
        let severity = self.table.severity_within(renovation_level, condition_score);
        let cost_per_square_foot = self.table.range(renovation_level).interpolate(severity);

        let (age_multiplier, confidence_score) = match self.age_multiplier(property, as_of_year) {
            Some(multiplier) => (multiplier, self.table.confidence_with_age),
            None => (1.0, self.table.confidence_without_age),
        };

        let total_cost = round_to_step(
            square_feet * cost_per_square_foot * age_multiplier,
            self.table.rounding_step,
        );

        Ok(RepairEstimate {
            total_cost,
            renovation_level,
            confidence_score,
            cost_per_square_foot,
            age_multiplier,
        })
    }
}
