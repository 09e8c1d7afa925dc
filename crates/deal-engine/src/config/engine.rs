use super::ConfigError;
use crate::valuation::{ArvEstimator, HeuristicRepairModel, RepairCostTable, ValuationConfig};
use crate::wholesale::{DealScoreWeights, ScoreLadder, WholesaleDealAnalyzer, WholesaleParameters};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Every injectable table the engines read. Missing keys fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub valuation: ValuationConfig,
    pub repair: RepairCostTable,
    pub wholesale: WholesaleParameters,
    pub deal_score: DealScoreWeights,
    pub ladder: ScoreLadder,
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::read_file(path, source))?;
        let config =
            serde_json::from_str(&raw).map_err(|source| ConfigError::parse_file(path, source))?;
        debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn arv_estimator(&self) -> ArvEstimator {
        ArvEstimator::new(self.valuation.clone())
    }

    pub fn repair_model(&self) -> HeuristicRepairModel {
        HeuristicRepairModel::new(self.repair.clone())
    }

    pub fn wholesale_analyzer(&self) -> WholesaleDealAnalyzer {
        WholesaleDealAnalyzer::new(
            self.arv_estimator(),
            self.repair_model(),
            self.wholesale.clone(),
            self.deal_score.clone(),
            self.ladder.clone(),
        )
    }
}
