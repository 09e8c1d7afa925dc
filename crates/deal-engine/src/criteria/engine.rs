use super::compile::{compile, CompiledRule, ConfigurationError, RuleSubject};
use super::domain::{Facet, FacetWeights, InvestmentCriteria};
use super::field::FieldValue;
use super::geo::GeoPoint;
use crate::money::round_places;
use crate::property::Property;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Passed,
    Failed,
    /// A required rule whose field was unknown; scored as a failure.
    MissingInput,
    /// An optional rule whose field was unknown; excluded from scoring.
    Skipped,
}

impl RuleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::MissingInput => "missing_input",
            Self::Skipped => "skipped",
        }
    }

    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::MissingInput)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub facet: Facet,
    pub status: RuleStatus,
    pub weight: f64,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetScore {
    pub facet: Facet,
    pub score: f64,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaMatch {
    pub overall_score: f64,
    pub meets_required: bool,
    /// Only facets with at least one applicable rule, in facet order.
    pub facet_scores: Vec<FacetScore>,
    pub failed_required_rules: Vec<String>,
    pub rule_outcomes: Vec<RuleOutcome>,
}

impl CriteriaMatch {
    pub fn facet_score(&self, facet: Facet) -> Option<f64> {
        self.facet_scores
            .iter()
            .find(|score| score.facet == facet)
            .map(|score| score.score)
    }
}

/// Criteria compiled once and evaluated against any number of properties.
#[derive(Debug, Clone)]
pub struct CriteriaMatcher {
    name: Option<String>,
    rules: Vec<CompiledRule>,
    facet_weights: FacetWeights,
}

impl CriteriaMatcher {
    pub fn new(criteria: &InvestmentCriteria) -> Result<Self, ConfigurationError> {
        let rules = compile(criteria)?;
        debug!(
            criteria = criteria.name.as_deref().unwrap_or("unnamed"),
            rules = rules.len(),
            "compiled investment criteria"
        );
        Ok(Self {
            name: criteria.name.clone(),
            rules,
            facet_weights: criteria.facet_weights.clone(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.id.as_str())
    }

    pub fn evaluate(&self, property: &Property) -> CriteriaMatch {
        let rule_outcomes: Vec<RuleOutcome> = self
            .rules
            .iter()
            .map(|rule| RuleOutcome {
                rule_id: rule.id.clone(),
                facet: rule.facet,
                status: status_of(rule, property),
                weight: rule.weight,
                required: rule.required,
            })
            .collect();

        let failed_required_rules: Vec<String> = rule_outcomes
            .iter()
            .filter(|outcome| outcome.required && outcome.status.is_failure())
            .map(|outcome| outcome.rule_id.clone())
            .collect();

        let facet_scores: Vec<FacetScore> = Facet::ordered()
            .into_iter()
            .filter_map(|facet| score_facet(facet, &rule_outcomes))
            .collect();

        let overall_score = overall(&facet_scores, &self.facet_weights);

        debug!(
            address = property.address.as_deref().unwrap_or("unknown"),
            overall_score,
            failed_required = failed_required_rules.len(),
            "evaluated property against criteria"
        );

        CriteriaMatch {
            overall_score,
            meets_required: failed_required_rules.is_empty(),
            facet_scores,
            failed_required_rules,
            rule_outcomes,
        }
    }
}

fn status_of(rule: &CompiledRule, property: &Property) -> RuleStatus {
    let passed = match &rule.subject {
        RuleSubject::Field(field) => field
            .resolve(property)
            .map(|value| rule.check.evaluate(value)),
        RuleSubject::DistanceFrom(center) => GeoPoint::of(property)
            .map(|point| rule.check.evaluate(FieldValue::Number(center.distance_miles(&point)))),
    };

    match passed {
        Some(true) => RuleStatus::Passed,
        Some(false) => RuleStatus::Failed,
        None if rule.required => RuleStatus::MissingInput,
        None => RuleStatus::Skipped,
    }
}

fn score_facet(facet: Facet, outcomes: &[RuleOutcome]) -> Option<FacetScore> {
    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;
    let mut weight_total = 0.0;
    let mut weight_passed = 0.0;

    for outcome in outcomes.iter().filter(|outcome| outcome.facet == facet) {
        match outcome.status {
            RuleStatus::Skipped => skipped += 1,
            RuleStatus::Passed => {
                passed += 1;
                weight_total += outcome.weight;
                weight_passed += outcome.weight;
            }
            RuleStatus::Failed | RuleStatus::MissingInput => {
                failed += 1;
                weight_total += outcome.weight;
            }
        }
    }

    let applicable = passed + failed;
    if applicable == 0 {
        return None;
    }

    let fraction = if weight_total > 0.0 {
        weight_passed / weight_total
    } else {
        passed as f64 / applicable as f64
    };

    Some(FacetScore {
        facet,
        score: round_places(fraction * 100.0, 2),
        passed,
        failed,
        skipped,
    })
}

fn overall(facet_scores: &[FacetScore], weights: &FacetWeights) -> f64 {
    if facet_scores.is_empty() {
        return 0.0;
    }

    let weight_total: f64 = facet_scores
        .iter()
        .map(|score| weights.weight(score.facet))
        .sum();

    let average = if weight_total > 0.0 {
        facet_scores
            .iter()
            .map(|score| score.score * weights.weight(score.facet))
            .sum::<f64>()
            / weight_total
    } else {
        facet_scores.iter().map(|score| score.score).sum::<f64>() / facet_scores.len() as f64
    };

    round_places(average.clamp(0.0, 100.0), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(facet: Facet, status: RuleStatus, weight: f64) -> RuleOutcome {
        RuleOutcome {
            rule_id: format!("{}.{}", facet, status.label()),
            facet,
            status,
            weight,
            required: false,
        }
    }

    #[test]
    fn facet_score_is_weighted_pass_fraction() {
        let outcomes = vec![
            outcome(Facet::Financial, RuleStatus::Passed, 3.0),
            outcome(Facet::Financial, RuleStatus::Failed, 1.0),
            outcome(Facet::Financial, RuleStatus::Skipped, 5.0),
        ];
        let score = score_facet(Facet::Financial, &outcomes).expect("facet applies");
        assert_eq!(score.score, 75.0);
        assert_eq!((score.passed, score.failed, score.skipped), (1, 1, 1));
    }

    #[test]
    fn zero_weight_facet_uses_unweighted_fraction() {
        let outcomes = vec![
            outcome(Facet::Market, RuleStatus::Passed, 0.0),
            outcome(Facet::Market, RuleStatus::Failed, 0.0),
            outcome(Facet::Market, RuleStatus::Failed, 0.0),
        ];
        let score = score_facet(Facet::Market, &outcomes).expect("facet applies");
        assert_eq!(score.score, 33.33);
    }

    #[test]
    fn facet_with_only_skipped_rules_is_not_applicable() {
        let outcomes = vec![outcome(Facet::Property, RuleStatus::Skipped, 1.0)];
        assert!(score_facet(Facet::Property, &outcomes).is_none());
    }

    #[test]
    fn overall_ignores_facets_without_applicable_rules() {
        let scores = vec![
            FacetScore {
                facet: Facet::Geographic,
                score: 100.0,
                passed: 1,
                failed: 0,
                skipped: 0,
            },
            FacetScore {
                facet: Facet::Financial,
                score: 50.0,
                passed: 1,
                failed: 1,
                skipped: 0,
            },
        ];
        let weights = FacetWeights {
            geographic: 3.0,
            ..FacetWeights::default()
        };
        assert_eq!(overall(&scores, &weights), 87.5);
        assert_eq!(overall(&[], &weights), 0.0);
    }
}
