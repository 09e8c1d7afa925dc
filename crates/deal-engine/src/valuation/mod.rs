//! After-repair valuation: comparable adjustment, ARV aggregation, and repair costs.

mod adjustment;
mod arv;
mod confidence;
mod config;
mod import;
mod premium;
mod repair;

pub use adjustment::{adjust, ComparableAdjustment};
pub use arv::{ArvEstimator, ArvResult, NO_COMPARABLES};
pub use confidence::{recency, similarity, ConfidenceBreakdown};
pub use config::{AdjustmentFactors, ArvPolicy, ConfidenceWeights, MarketPremiumRules, ValuationConfig};
pub use import::{comparables_from_path, comparables_from_reader, ComparableImportError};
pub use premium::market_premium;
pub use repair::{
    CostRange, HeuristicRepairModel, RenovationLevel, RepairCostModel, RepairCostTable,
    RepairEstimate,
};
