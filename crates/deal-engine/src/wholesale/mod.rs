//! Wholesale deal economics layered on the valuation chain.

mod analyzer;
mod config;
mod ladder;

pub use analyzer::{DealCosts, ScoreBreakdown, WholesaleDealAnalyzer, WholesaleDealResult};
pub use config::{DealScoreWeights, HoldingTimeTable, WholesaleParameters};
pub use ladder::{DealCategory, ScoreLadder, ScoreTier};
