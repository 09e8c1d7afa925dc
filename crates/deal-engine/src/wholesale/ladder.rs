use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealCategory {
    Exceptional,
    Strong,
    Fair,
    Marginal,
    Poor,
}

impl DealCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exceptional => "Exceptional",
            Self::Strong => "Strong",
            Self::Fair => "Fair",
            Self::Marginal => "Marginal",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for DealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rung of the ladder; applies to scores at or above `min_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    pub min_score: f64,
    pub category: DealCategory,
    /// Share of the spread offered as the assignment fee.
    pub fee_share: f64,
}

/// Ordered threshold table mapping a deal score to a category and fee share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreLadder {
    pub tiers: Vec<ScoreTier>,
    pub floor_category: DealCategory,
    pub floor_fee_share: f64,
}

impl Default for ScoreLadder {
    fn default() -> Self {
        Self {
            tiers: vec![
                ScoreTier {
                    min_score: 80.0,
                    category: DealCategory::Exceptional,
                    fee_share: 0.40,
                },
                ScoreTier {
                    min_score: 70.0,
                    category: DealCategory::Strong,
                    fee_share: 0.35,
                },
                ScoreTier {
                    min_score: 60.0,
                    category: DealCategory::Fair,
                    fee_share: 0.30,
                },
                ScoreTier {
                    min_score: 50.0,
                    category: DealCategory::Marginal,
                    fee_share: 0.25,
                },
            ],
            floor_category: DealCategory::Poor,
            floor_fee_share: 0.25,
        }
    }
}

impl ScoreLadder {
    /// Highest tier whose lower bound the score reaches; the bound is inclusive.
    pub fn tier_for(&self, score: f64) -> Option<&ScoreTier> {
        self.tiers
            .iter()
            .filter(|tier| score >= tier.min_score)
            .max_by(|a, b| a.min_score.total_cmp(&b.min_score))
    }

    pub fn category_for(&self, score: f64) -> DealCategory {
        self.tier_for(score)
            .map(|tier| tier.category)
            .unwrap_or(self.floor_category)
    }

    pub fn fee_share_for(&self, score: f64) -> f64 {
        self.tier_for(score)
            .map(|tier| tier.fee_share)
            .unwrap_or(self.floor_fee_share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bounds_are_closed() {
        let ladder = ScoreLadder::default();
        assert_eq!(ladder.category_for(80.0), DealCategory::Exceptional);
        assert_eq!(ladder.category_for(79.9999), DealCategory::Strong);
        assert_eq!(ladder.category_for(70.0), DealCategory::Strong);
        assert_eq!(ladder.category_for(60.0), DealCategory::Fair);
        assert_eq!(ladder.category_for(50.0), DealCategory::Marginal);
        assert_eq!(ladder.category_for(49.99), DealCategory::Poor);
        assert_eq!(ladder.category_for(0.0), DealCategory::Poor);
    }

    #[test]
    fn fee_share_follows_the_same_thresholds() {
        let ladder = ScoreLadder::default();
        assert_eq!(ladder.fee_share_for(100.0), 0.40);
        assert_eq!(ladder.fee_share_for(75.0), 0.35);
        assert_eq!(ladder.fee_share_for(65.0), 0.30);
        assert_eq!(ladder.fee_share_for(55.0), 0.25);
        assert_eq!(ladder.fee_share_for(10.0), 0.25);
    }

    #[test]
    fn tier_order_in_the_table_does_not_matter() {
        let mut ladder = ScoreLadder::default();
        ladder.tiers.reverse();
        assert_eq!(ladder.category_for(85.0), DealCategory::Exceptional);
        assert_eq!(ladder.category_for(72.0), DealCategory::Strong);
    }
}
